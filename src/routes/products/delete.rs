use std::{error::Error, fmt::Debug};

use actix_web::{http::StatusCode, web, HttpResponse, ResponseError};
use anyhow::Context;
use serde::Deserialize;
use thiserror::Error;
use uuid::Uuid;

use crate::{auth::extractors::IsAdmin, db_interaction::delete_product as delete_product_row, envelope::Envelope, utils::{error_fmt_chain, get_pooled_connection, DbPool}};

#[derive(Deserialize, Debug)]
pub struct DeleteProductForm{
    pub id: Uuid
}

#[derive(Error)]
pub enum DeleteProductError{
    #[error("product not found")]
    NotFound,
    #[error("unexpected error occured")]
    UnexpectedError(#[from] anyhow::Error)
}

impl Debug for DeleteProductError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

impl ResponseError for DeleteProductError {
    fn status_code(&self) -> StatusCode {
        match self {
            DeleteProductError::NotFound => StatusCode::NOT_FOUND,
            DeleteProductError::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR
        }
    }

    fn error_response(&self) -> HttpResponse<actix_web::body::BoxBody> {
        HttpResponse::build(self.status_code()).json(Envelope::error(format!("{}", self)))
    }
}

#[tracing::instrument(
    "Deleting product from catalog",
    skip(pool)
)]
pub async fn delete_product(
    pool: web::Data<DbPool>,
    form: web::Json<DeleteProductForm>,
    _: IsAdmin
) -> Result<HttpResponse, DeleteProductError> {
    let conn = get_pooled_connection(&pool)
        .await
        .context("Failed to get connection from pool")?;

    let affected = delete_product_row(conn, form.id)
        .await
        .context("Failed to delete product")?;

    if affected == 0 {
        return Err(DeleteProductError::NotFound)
    }

    Ok(HttpResponse::Ok().json(Envelope::empty()))
}
