use std::{error::Error, fmt::Debug};

use actix_web::{http::StatusCode, web, HttpResponse, ResponseError};
use anyhow::Context;
use serde::Deserialize;
use thiserror::Error;
use uuid::Uuid;

use crate::{auth::extractors::IsAdmin, db_interaction::insert_product, envelope::Envelope, models::Product, utils::{error_fmt_chain, get_pooled_connection, DbPool}};

#[derive(Deserialize, Debug)]
pub struct ProductForm{
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub stock_quantity: i32,
    pub category: String
}

#[derive(Error)]
pub enum PostProductError{
    #[error("{0}")]
    ValidationError(String),
    #[error("unexpected error occured")]
    UnexpectedError(#[from] anyhow::Error)
}

impl Debug for PostProductError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

impl ResponseError for PostProductError {
    fn status_code(&self) -> StatusCode {
        match self {
            PostProductError::ValidationError(_) => StatusCode::BAD_REQUEST,
            PostProductError::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR
        }
    }

    fn error_response(&self) -> HttpResponse<actix_web::body::BoxBody> {
        HttpResponse::build(self.status_code()).json(Envelope::error(format!("{}", self)))
    }
}

pub fn validate_product_fields(name: &str, category: &str, price: f64, stock_quantity: i32) -> Result<(), String>{
    if name.trim().is_empty() {
        return Err("name is required".to_string())
    }
    if category.trim().is_empty() {
        return Err("category is required".to_string())
    }
    if !price.is_finite() || price < 0.0 {
        return Err("price must be a non-negative number".to_string())
    }
    if stock_quantity < 0 {
        return Err("stock_quantity must be a non-negative number".to_string())
    }
    Ok(())
}

#[tracing::instrument(
    "Adding product to catalog",
    skip(pool)
)]
pub async fn post_product(
    pool: web::Data<DbPool>,
    form: web::Json<ProductForm>,
    _: IsAdmin
) -> Result<HttpResponse, PostProductError> {
    let form = form.into_inner();

    validate_product_fields(&form.name, &form.category, form.price, form.stock_quantity)
        .map_err(PostProductError::ValidationError)?;

    let product = Product{
        id: Uuid::new_v4(),
        name: form.name,
        description: form.description,
        price: form.price,
        stock_quantity: form.stock_quantity,
        category: form.category
    };
    let product_id = product.id;

    let conn = get_pooled_connection(&pool)
        .await
        .context("Failed to get connection from pool")?;

    insert_product(conn, product)
        .await
        .context("Failed to insert product")?;

    Ok(HttpResponse::Created().json(Envelope::ok(serde_json::json!({ "id": product_id }))))
}
