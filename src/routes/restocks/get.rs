use actix_web::{web, HttpResponse};
use anyhow::Context;

use crate::{db_interaction::get_all_restocks, envelope::Envelope, utils::{get_pooled_connection, DbPool, UnexpectedError}};

#[tracing::instrument(
    "Get restock listing",
    skip(pool)
)]
pub async fn get_restocks(
    pool: web::Data<DbPool>
) -> Result<HttpResponse, UnexpectedError> {
    let conn = get_pooled_connection(&pool)
        .await
        .context("Failed to get connection from pool")?;

    let restocks = get_all_restocks(conn)
        .await
        .context("Failed to load restocks")?;

    Ok(HttpResponse::Ok().json(Envelope::ok(restocks)))
}
