use std::{error::Error, fmt::Debug};

use actix_web::{http::StatusCode, web, HttpResponse, ResponseError};
use anyhow::Context;
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use thiserror::Error;
use uuid::Uuid;

use crate::{auth::extractors::IsStaff, db_interaction::{insert_restock_with_link, RestockInsertError}, envelope::Envelope, models::Restock, utils::{error_fmt_chain, get_pooled_connection, DbPool}};

pub const DEFAULT_RESTOCK_STATUS: &str = "Processing";

#[derive(Deserialize, Debug)]
pub struct RestockForm{
    pub product_id: Uuid,
    pub supplier_id: Uuid,
    pub quantity: i32,
    pub delivery_date: NaiveDate,
    pub status: Option<String>
}

#[derive(Error)]
pub enum PostRestockError{
    #[error("{0}")]
    ValidationError(String),
    #[error("product or supplier not found")]
    MissingReference(#[source] RestockInsertError),
    #[error("unexpected error occured")]
    UnexpectedError(#[from] anyhow::Error)
}

impl Debug for PostRestockError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

impl ResponseError for PostRestockError {
    fn status_code(&self) -> StatusCode {
        match self {
            PostRestockError::ValidationError(_) => StatusCode::BAD_REQUEST,
            PostRestockError::MissingReference(_) => StatusCode::NOT_FOUND,
            PostRestockError::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR
        }
    }

    fn error_response(&self) -> HttpResponse<actix_web::body::BoxBody> {
        HttpResponse::build(self.status_code()).json(Envelope::error(format!("{}", self)))
    }
}

#[tracing::instrument(
    "Placing restock order",
    skip(pool)
)]
pub async fn post_restock(
    pool: web::Data<DbPool>,
    form: web::Json<RestockForm>,
    _: IsStaff
) -> Result<HttpResponse, PostRestockError> {
    let form = form.into_inner();

    if form.quantity <= 0 {
        return Err(PostRestockError::ValidationError(
            "quantity must be greater than zero".to_string()
        ))
    }

    let status = form.status
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_RESTOCK_STATUS.to_string());

    let restock = Restock{
        id: Uuid::new_v4(),
        product_id: form.product_id,
        supplier_id: form.supplier_id,
        quantity: form.quantity,
        delivery_date: form.delivery_date,
        status,
        created_at: Utc::now()
    };
    let restock_id = restock.id;

    let conn = get_pooled_connection(&pool)
        .await
        .context("Failed to get connection from pool")?;

    insert_restock_with_link(conn, restock)
        .await
        .map_err(|e| {
            match e {
                RestockInsertError::MissingProduct | RestockInsertError::MissingSupplier =>
                    PostRestockError::MissingReference(e),
                RestockInsertError::UnexpectedError(_) => PostRestockError::UnexpectedError(e.into())
            }
        })?;

    Ok(HttpResponse::Created().json(Envelope::ok(serde_json::json!({ "id": restock_id }))))
}
