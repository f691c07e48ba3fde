use std::{error::Error, fmt::Debug};

use actix_web::{http::StatusCode, web, HttpResponse, ResponseError};
use anyhow::Context;
use serde::Deserialize;
use thiserror::Error;
use uuid::Uuid;

use crate::{auth::extractors::IsStaff, db_interaction::insert_supplier_with_links, envelope::Envelope, models::Supplier, utils::{error_fmt_chain, get_pooled_connection, DbPool}};

#[derive(Deserialize, Debug)]
pub struct SupplierForm{
    pub name: String,
    pub contact_info: String,
    pub payment_terms: Option<String>,
    pub lead_time_days: Option<i32>,
    #[serde(default)]
    pub product_ids: Vec<Uuid>
}

#[derive(Error)]
pub enum PostSupplierError{
    #[error("{0}")]
    ValidationError(String),
    #[error("unexpected error occured")]
    UnexpectedError(#[from] anyhow::Error)
}

impl Debug for PostSupplierError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

impl ResponseError for PostSupplierError {
    fn status_code(&self) -> StatusCode {
        match self {
            PostSupplierError::ValidationError(_) => StatusCode::BAD_REQUEST,
            PostSupplierError::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR
        }
    }

    fn error_response(&self) -> HttpResponse<actix_web::body::BoxBody> {
        HttpResponse::build(self.status_code()).json(Envelope::error(format!("{}", self)))
    }
}

#[tracing::instrument(
    "Creating supplier",
    skip(pool)
)]
pub async fn post_supplier(
    pool: web::Data<DbPool>,
    form: web::Json<SupplierForm>,
    _: IsStaff
) -> Result<HttpResponse, PostSupplierError> {
    let form = form.into_inner();

    if form.name.trim().is_empty() || form.contact_info.trim().is_empty() {
        return Err(PostSupplierError::ValidationError(
            "name and contact_info are required".to_string()
        ))
    }

    if let Some(lead_time) = form.lead_time_days {
        if lead_time < 0 {
            return Err(PostSupplierError::ValidationError(
                "lead_time_days must be a non-negative number".to_string()
            ))
        }
    }

    let supplier = Supplier{
        id: Uuid::new_v4(),
        name: form.name,
        contact_info: form.contact_info,
        payment_terms: form.payment_terms,
        lead_time_days: form.lead_time_days
    };

    let conn = get_pooled_connection(&pool)
        .await
        .context("Failed to get connection from pool")?;

    let supplier_id = insert_supplier_with_links(conn, supplier, form.product_ids)
        .await
        .context("Failed to create supplier")?;

    Ok(HttpResponse::Created().json(Envelope::ok(serde_json::json!({ "id": supplier_id }))))
}
