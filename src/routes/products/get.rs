use actix_web::{web, HttpResponse};
use anyhow::Context;
use serde::Deserialize;

use crate::{db_interaction::{get_product_page, ProductListing}, envelope::Envelope, utils::{get_pooled_connection, DbPool, UnexpectedError}};

#[derive(Deserialize, Debug)]
pub struct GetProductsQuery {
    pub q: Option<String>,
    pub category: Option<String>,
    pub min_stock: Option<i32>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub sort_by: Option<String>,
    pub sort_dir: Option<String>
}

#[tracing::instrument(
    "Get product listing",
    skip(pool)
)]
pub async fn get_products(
    pool: web::Data<DbPool>,
    query: web::Query<GetProductsQuery>
) -> Result<HttpResponse, UnexpectedError> {
    let query = query.into_inner();

    let listing = ProductListing::new(
        query.q,
        query.category,
        query.min_stock,
        query.page,
        query.page_size,
        query.sort_by.as_deref(),
        query.sort_dir.as_deref()
    );

    let conn = get_pooled_connection(&pool)
        .await
        .context("Failed to get connection from pool")?;

    let page = get_product_page(conn, listing)
        .await
        .context("Failed to load product page")?;

    Ok(HttpResponse::Ok().json(Envelope::ok(page)))
}
