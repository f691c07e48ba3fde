use std::{error::Error, fmt::Debug};

use actix_web::{http::StatusCode, web, HttpResponse, ResponseError};
use anyhow::Context;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use thiserror::Error;
use uuid::Uuid;

use crate::{db_interaction::{insert_user, UserInsertError}, domain::{user_email::UserEmail, user_role::UserRole}, envelope::Envelope, models::User, password::compute_password_hash, telemetry::spawn_blocking_with_tracing, utils::{error_fmt_chain, get_pooled_connection, DbPool}};

#[derive(Deserialize, Debug)]
pub struct RegistrationForm{
    pub name: String,
    pub email: String,
    pub password: SecretString,
    pub role: Option<String>
}

#[derive(Error)]
pub enum RegisterError{
    #[error("{0}")]
    ValidationError(String),
    #[error("email is already registered")]
    EmailNotUnique(#[source] UserInsertError),
    #[error("unexpected error occured")]
    UnexpectedError(#[from] anyhow::Error)
}

impl Debug for RegisterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

impl ResponseError for RegisterError {
    fn status_code(&self) -> StatusCode {
        match self {
            RegisterError::ValidationError(_) => StatusCode::BAD_REQUEST,
            RegisterError::EmailNotUnique(_) => StatusCode::CONFLICT,
            RegisterError::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR
        }
    }

    fn error_response(&self) -> HttpResponse<actix_web::body::BoxBody> {
        HttpResponse::build(self.status_code()).json(Envelope::error(format!("{}", self)))
    }
}

#[tracing::instrument(
    "User registration started",
    skip(pool, form)
)]
pub async fn register(
    pool: web::Data<DbPool>,
    form: web::Json<RegistrationForm>
) -> Result<HttpResponse, RegisterError> {
    let form = form.into_inner();

    if form.name.trim().is_empty() {
        return Err(RegisterError::ValidationError("name is required".to_string()))
    }

    let email = UserEmail::parse(form.email)
        .map_err(RegisterError::ValidationError)?;

    let role = match form.role.as_deref() {
        None | Some("") => UserRole::Customer,
        Some(raw) => UserRole::parse(raw)
            .map_err(RegisterError::ValidationError)?
    };

    let password_hash = spawn_blocking_with_tracing(move || {
        compute_password_hash(form.password)
    })
    .await
    .context("Failed due to threadpool error")??;

    let user = User{
        id: Uuid::new_v4(),
        name: form.name,
        email: email.inner(),
        password: password_hash.expose_secret().to_string(),
        role: role.as_str().to_string()
    };

    let conn = get_pooled_connection(&pool)
        .await
        .context("Failed to get connection from pool")?;

    let record = insert_user(conn, user)
        .await
        .map_err(|e| {
            match e {
                UserInsertError::EmailNotUnique(_) => RegisterError::EmailNotUnique(e),
                UserInsertError::UnexpectedError(_) => RegisterError::UnexpectedError(e.into())
            }
        })?;

    Ok(HttpResponse::Created().json(Envelope::ok(record)))
}
