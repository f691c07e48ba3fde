use std::{error::Error, fmt::Debug};

use actix_web::{http::StatusCode, web, HttpResponse, ResponseError};
use anyhow::Context;
use serde::Deserialize;
use thiserror::Error;
use uuid::Uuid;

use crate::{auth::extractors::IsAdmin, db_interaction::{delete_user as delete_user_row, UserDeleteError}, envelope::Envelope, utils::{error_fmt_chain, get_pooled_connection, DbPool}};

#[derive(Deserialize, Debug)]
pub struct DeleteUserForm{
    pub id: Uuid
}

#[derive(Error)]
pub enum DeleteUserError{
    #[error("user not found")]
    NotFound(#[source] UserDeleteError),
    #[error("admin users cannot be deleted")]
    AdminRole(#[source] UserDeleteError),
    #[error("unexpected error occured")]
    UnexpectedError(#[from] anyhow::Error)
}

impl Debug for DeleteUserError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

impl ResponseError for DeleteUserError {
    fn status_code(&self) -> StatusCode {
        match self {
            DeleteUserError::NotFound(_) => StatusCode::NOT_FOUND,
            DeleteUserError::AdminRole(_) => StatusCode::FORBIDDEN,
            DeleteUserError::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR
        }
    }

    fn error_response(&self) -> HttpResponse<actix_web::body::BoxBody> {
        HttpResponse::build(self.status_code()).json(Envelope::error(format!("{}", self)))
    }
}

#[tracing::instrument(
    "Deleting user account",
    skip(pool)
)]
pub async fn delete_user(
    pool: web::Data<DbPool>,
    form: web::Json<DeleteUserForm>,
    _: IsAdmin
) -> Result<HttpResponse, DeleteUserError> {
    let conn = get_pooled_connection(&pool)
        .await
        .context("Failed to get connection from pool")?;

    delete_user_row(conn, form.id)
        .await
        .map_err(|e| {
            match e {
                UserDeleteError::NotFound => DeleteUserError::NotFound(e),
                UserDeleteError::AdminRole => DeleteUserError::AdminRole(e),
                UserDeleteError::UnexpectedError(_) => DeleteUserError::UnexpectedError(e.into())
            }
        })?;

    Ok(HttpResponse::Ok().json(Envelope::empty()))
}
