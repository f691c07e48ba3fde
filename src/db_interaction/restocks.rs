use std::{error::Error, fmt::Debug};

use anyhow::Context;
use diesel::{Connection, ExpressionMethods, QueryDsl, RunQueryDsl};
use thiserror::Error;

use crate::{models::{ProductSupplier, Restock}, schema::{product_suppliers, products, restocks, suppliers}, telemetry::spawn_blocking_with_tracing, utils::{error_fmt_chain, DbConnection}};

#[tracing::instrument(
    "Getting all restocks from db",
    skip_all
)]
pub async fn get_all_restocks(
    mut conn: DbConnection
) -> Result<Vec<Restock>, anyhow::Error>{
    let res = spawn_blocking_with_tracing(move || {
        restocks::table
            .order(restocks::created_at.desc())
            .load::<Restock>(&mut conn)
            .context("Failed to load restocks")
    })
    .await
    .context("Failed due to threadpool error")??;

    Ok(res)
}

#[derive(Error)]
pub enum RestockInsertError{
    #[error("product not found")]
    MissingProduct,
    #[error("supplier not found")]
    MissingSupplier,
    #[error("unexpected database error occured")]
    UnexpectedError(#[from] anyhow::Error)
}

impl Debug for RestockInsertError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

impl From<diesel::result::Error> for RestockInsertError {
    fn from(e: diesel::result::Error) -> Self {
        RestockInsertError::UnexpectedError(anyhow::Error::from(e))
    }
}

// Inserts the restock and makes sure the product-supplier link exists,
// creating it when missing, all in one transaction.
#[tracing::instrument(
    "Creating restock in db",
    skip_all
)]
pub async fn insert_restock_with_link(
    mut conn: DbConnection,
    restock: Restock
) -> Result<(), RestockInsertError>{
    spawn_blocking_with_tracing(move || {
        conn.transaction::<_, RestockInsertError, _>(|conn| {
            let product_exists: i64 = products::table
                .filter(products::id.eq(restock.product_id))
                .count()
                .get_result(conn)
                .map_err(|e| RestockInsertError::UnexpectedError(
                    anyhow::Error::from(e).context("Failed to look up product")
                ))?;

            if product_exists == 0 {
                return Err(RestockInsertError::MissingProduct)
            }

            let supplier_exists: i64 = suppliers::table
                .filter(suppliers::id.eq(restock.supplier_id))
                .count()
                .get_result(conn)
                .map_err(|e| RestockInsertError::UnexpectedError(
                    anyhow::Error::from(e).context("Failed to look up supplier")
                ))?;

            if supplier_exists == 0 {
                return Err(RestockInsertError::MissingSupplier)
            }

            let link = ProductSupplier{
                product_id: restock.product_id,
                supplier_id: restock.supplier_id
            };

            diesel::insert_into(product_suppliers::table)
                .values(link)
                .on_conflict_do_nothing()
                .execute(conn)
                .map_err(|e| RestockInsertError::UnexpectedError(
                    anyhow::Error::from(e).context("Failed to ensure product-supplier link")
                ))?;

            diesel::insert_into(restocks::table)
                .values(restock)
                .execute(conn)
                .map_err(|e| RestockInsertError::UnexpectedError(
                    anyhow::Error::from(e).context("Failed to insert restock")
                ))?;

            Ok(())
        })
    })
    .await
    .context("Failed due to threadpool error")
    .map_err(RestockInsertError::UnexpectedError)??;

    Ok(())
}
