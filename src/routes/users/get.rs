use actix_web::{web, HttpResponse};
use anyhow::Context;

use crate::{auth::extractors::IsAdmin, db_interaction::get_all_users, envelope::Envelope, utils::{get_pooled_connection, DbPool, UnexpectedError}};

#[tracing::instrument(
    "Get user listing",
    skip(pool)
)]
pub async fn get_users(
    pool: web::Data<DbPool>,
    _: IsAdmin
) -> Result<HttpResponse, UnexpectedError> {
    let conn = get_pooled_connection(&pool)
        .await
        .context("Failed to get connection from pool")?;

    let users = get_all_users(conn)
        .await
        .context("Failed to load users")?;

    Ok(HttpResponse::Ok().json(Envelope::ok(users)))
}
