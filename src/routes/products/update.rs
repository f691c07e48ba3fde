use std::{error::Error, fmt::Debug};

use actix_web::{http::StatusCode, web, HttpResponse, ResponseError};
use anyhow::Context;
use serde::Deserialize;
use thiserror::Error;
use uuid::Uuid;

use crate::{auth::extractors::IsAdmin, db_interaction::update_product_price_and_stock, envelope::Envelope, utils::{error_fmt_chain, get_pooled_connection, DbPool}};

#[derive(Deserialize, Debug)]
pub struct UpdateProductForm{
    pub id: Uuid,
    pub price: f64,
    pub stock_quantity: i32
}

#[derive(Error)]
pub enum UpdateProductError{
    #[error("{0}")]
    ValidationError(String),
    #[error("product not found")]
    NotFound,
    #[error("unexpected error occured")]
    UnexpectedError(#[from] anyhow::Error)
}

impl Debug for UpdateProductError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

impl ResponseError for UpdateProductError {
    fn status_code(&self) -> StatusCode {
        match self {
            UpdateProductError::ValidationError(_) => StatusCode::BAD_REQUEST,
            UpdateProductError::NotFound => StatusCode::NOT_FOUND,
            UpdateProductError::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR
        }
    }

    fn error_response(&self) -> HttpResponse<actix_web::body::BoxBody> {
        HttpResponse::build(self.status_code()).json(Envelope::error(format!("{}", self)))
    }
}

// Narrow contract on purpose: the admin form only edits price and stock.
#[tracing::instrument(
    "Updating product price and stock",
    skip(pool)
)]
pub async fn update_product(
    pool: web::Data<DbPool>,
    form: web::Json<UpdateProductForm>,
    _: IsAdmin
) -> Result<HttpResponse, UpdateProductError> {
    let form = form.into_inner();

    if !form.price.is_finite() || form.price < 0.0 {
        return Err(UpdateProductError::ValidationError("price must be a non-negative number".to_string()))
    }
    if form.stock_quantity < 0 {
        return Err(UpdateProductError::ValidationError("stock_quantity must be a non-negative number".to_string()))
    }

    let conn = get_pooled_connection(&pool)
        .await
        .context("Failed to get connection from pool")?;

    let affected = update_product_price_and_stock(conn, form.id, form.price, form.stock_quantity)
        .await
        .context("Failed to update product")?;

    if affected == 0 {
        return Err(UpdateProductError::NotFound)
    }

    Ok(HttpResponse::Ok().json(Envelope::empty()))
}
