use std::{error::Error, fmt::Debug};

use anyhow::Context;
use diesel::{Connection, ExpressionMethods, QueryDsl, QueryResult, RunQueryDsl};
use thiserror::Error;
use uuid::Uuid;

use crate::{models::{User, UserRecord}, schema::users, telemetry::spawn_blocking_with_tracing, utils::{error_fmt_chain, DbConnection}};

#[tracing::instrument(
    "Getting all users from db",
    skip_all
)]
pub async fn get_all_users(
    mut conn: DbConnection
) -> Result<Vec<UserRecord>, anyhow::Error>{
    let res = spawn_blocking_with_tracing(move || {
        users::table
            .select((users::id, users::name, users::email, users::role))
            .load::<UserRecord>(&mut conn)
            .context("Failed to load users")
    })
    .await
    .context("Failed due to threadpool error")??;

    Ok(res)
}

#[tracing::instrument(
    "Getting user by email from db",
    skip(conn)
)]
pub async fn get_user_by_email(
    mut conn: DbConnection,
    email: String
) -> Result<Option<User>, anyhow::Error>{
    let res: QueryResult<User> = spawn_blocking_with_tracing(move || {
        users::table
            .filter(users::email.eq(email))
            .get_result::<User>(&mut conn)
    })
    .await
    .context("Failed due to threadpool error")?;

    match res {
        Ok(user) => Ok(Some(user)),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(e).context("Failed to query user by email")
    }
}

#[derive(Error)]
pub enum UserInsertError{
    #[error("email is already registered")]
    EmailNotUnique(#[source] anyhow::Error),
    #[error("unexpected database error occured")]
    UnexpectedError(#[from] anyhow::Error)
}

impl Debug for UserInsertError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

#[tracing::instrument(
    "Inserting user into db",
    skip_all
)]
pub async fn insert_user(
    mut conn: DbConnection,
    user: User
) -> Result<UserRecord, UserInsertError>{
    let record = UserRecord::from(user.clone());

    spawn_blocking_with_tracing(move || {
        diesel::insert_into(users::table)
            .values(user)
            .execute(&mut conn)
            .map_err(|e| {
                match e {
                    diesel::result::Error::DatabaseError(
                        diesel::result::DatabaseErrorKind::UniqueViolation,
                        info
                    ) => UserInsertError::EmailNotUnique(anyhow::anyhow!(info.message().to_string())),
                    other => UserInsertError::UnexpectedError(
                        anyhow::Error::from(other).context("Failed to insert user")
                    )
                }
            })
    })
    .await
    .context("Failed due to threadpool error")
    .map_err(UserInsertError::UnexpectedError)??;

    Ok(record)
}

#[derive(Error)]
pub enum UserDeleteError{
    #[error("user not found")]
    NotFound,
    #[error("admin users cannot be deleted")]
    AdminRole,
    #[error("unexpected database error occured")]
    UnexpectedError(#[from] anyhow::Error)
}

impl Debug for UserDeleteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

impl From<diesel::result::Error> for UserDeleteError {
    fn from(e: diesel::result::Error) -> Self {
        UserDeleteError::UnexpectedError(anyhow::Error::from(e))
    }
}

// Role check and delete run in one transaction so the target cannot be
// promoted between the two statements.
#[tracing::instrument(
    "Deleting user from db",
    skip(conn)
)]
pub async fn delete_user(
    mut conn: DbConnection,
    user_id: Uuid
) -> Result<(), UserDeleteError>{
    spawn_blocking_with_tracing(move || {
        conn.transaction::<_, UserDeleteError, _>(|conn| {
            let role: String = users::table
                .filter(users::id.eq(user_id))
                .select(users::role)
                .get_result(conn)
                .map_err(|e| {
                    match e {
                        diesel::result::Error::NotFound => UserDeleteError::NotFound,
                        other => UserDeleteError::UnexpectedError(
                            anyhow::Error::from(other).context("Failed to look up user role")
                        )
                    }
                })?;

            if role == "admin" {
                return Err(UserDeleteError::AdminRole)
            }

            diesel::delete(users::table.filter(users::id.eq(user_id)))
                .execute(conn)
                .map_err(|e| UserDeleteError::UnexpectedError(
                    anyhow::Error::from(e).context("Failed to delete user")
                ))?;

            Ok(())
        })
    })
    .await
    .context("Failed due to threadpool error")
    .map_err(UserDeleteError::UnexpectedError)??;

    Ok(())
}
