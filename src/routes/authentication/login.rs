use std::{error::Error, fmt::Debug};

use actix_web::{http::StatusCode, web, HttpResponse, ResponseError};
use anyhow::Context;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{auth::jwt::Tokenizer, db_interaction::get_user_by_email, domain::user_role::UserRole, envelope::Envelope, models::UserRecord, password::verify_password, utils::{error_fmt_chain, get_pooled_connection, DbPool}};

// Argon2 hash of a throwaway password. Unknown emails verify against it so
// that path costs the same as a real credential check.
const FALLBACK_PASSWORD_HASH: &str =
    "$argon2id$v=19$m=15000,t=2,p=1$gZiV/M1gPc22ElAH/Jh1Hw$CWOrkoo7oJBQ/iyh7uJ0LO2aLEfrHwTWllSAxT0zRno";

#[derive(Deserialize, Debug)]
pub struct LoginForm{
    pub email: String,
    pub password: SecretString
}

#[derive(Serialize, Debug)]
pub struct LoginResponse{
    pub user: UserRecord,
    pub token: String
}

#[derive(Error)]
pub enum LoginError{
    // Wrong email and wrong password answer identically
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("unexpected error occured")]
    UnexpectedError(#[from] anyhow::Error)
}

impl Debug for LoginError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

impl ResponseError for LoginError {
    fn status_code(&self) -> StatusCode {
        match self {
            LoginError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            LoginError::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR
        }
    }

    fn error_response(&self) -> HttpResponse<actix_web::body::BoxBody> {
        HttpResponse::build(self.status_code()).json(Envelope::error(format!("{}", self)))
    }
}

#[tracing::instrument(
    "Logging in user",
    skip(pool, tokenizer, form)
)]
pub async fn login(
    pool: web::Data<DbPool>,
    tokenizer: web::Data<Tokenizer>,
    form: web::Json<LoginForm>
) -> Result<HttpResponse, LoginError> {
    let form = form.into_inner();

    let conn = get_pooled_connection(&pool)
        .await
        .context("Failed to get connection from pool")?;

    let user = get_user_by_email(conn, form.email)
        .await
        .context("Failed to query user")?;

    let stored_hash = user
        .as_ref()
        .map(|user| user.password.clone())
        .unwrap_or_else(|| FALLBACK_PASSWORD_HASH.to_string());

    let password_matched = verify_password(form.password, stored_hash)
        .await
        .context("Failed to verify password")?;

    let user = user.ok_or(LoginError::InvalidCredentials)?;

    if !password_matched {
        tracing::info!("Passwords did not match");
        return Err(LoginError::InvalidCredentials)
    }

    let role = UserRole::parse(&user.role)
        .map_err(|e| anyhow::anyhow!(e))
        .context("Stored role is not a known role")?;

    let record = UserRecord::from(user);
    let token = tokenizer.generate_key(&record, role)
        .context("Failed to sign token")?;

    Ok(HttpResponse::Ok().json(Envelope::ok(LoginResponse{
        user: record,
        token
    })))
}
