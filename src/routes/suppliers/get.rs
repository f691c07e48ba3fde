use actix_web::{web, HttpResponse};
use anyhow::Context;

use crate::{db_interaction::get_all_suppliers, envelope::Envelope, utils::{get_pooled_connection, DbPool, UnexpectedError}};

#[tracing::instrument(
    "Get supplier listing",
    skip(pool)
)]
pub async fn get_suppliers(
    pool: web::Data<DbPool>
) -> Result<HttpResponse, UnexpectedError> {
    let conn = get_pooled_connection(&pool)
        .await
        .context("Failed to get connection from pool")?;

    let suppliers = get_all_suppliers(conn)
        .await
        .context("Failed to load suppliers")?;

    Ok(HttpResponse::Ok().json(Envelope::ok(suppliers)))
}
