use anyhow::Context;
use diesel::{Connection, ExpressionMethods, QueryDsl, RunQueryDsl};
use uuid::Uuid;

use crate::{models::{ProductSupplier, Supplier}, schema::{product_suppliers, products, suppliers}, telemetry::spawn_blocking_with_tracing, utils::DbConnection};

#[tracing::instrument(
    "Getting all suppliers from db",
    skip_all
)]
pub async fn get_all_suppliers(
    mut conn: DbConnection
) -> Result<Vec<Supplier>, anyhow::Error>{
    let res = spawn_blocking_with_tracing(move || {
        suppliers::table
            .order(suppliers::name.asc())
            .load::<Supplier>(&mut conn)
            .context("Failed to load suppliers")
    })
    .await
    .context("Failed due to threadpool error")??;

    Ok(res)
}

// Supplier insert plus its product links in one transaction. Links to
// product ids that do not exist are skipped, duplicate links ignored.
#[tracing::instrument(
    "Creating supplier and product links in db",
    skip_all
)]
pub async fn insert_supplier_with_links(
    mut conn: DbConnection,
    supplier: Supplier,
    product_ids: Vec<Uuid>
) -> Result<Uuid, anyhow::Error>{
    let supplier_id = supplier.id;

    spawn_blocking_with_tracing(move || {
        conn.transaction::<_, anyhow::Error, _>(|conn| {
            diesel::insert_into(suppliers::table)
                .values(&supplier)
                .execute(conn)
                .context("Failed to insert supplier")?;

            if !product_ids.is_empty() {
                let known_ids: Vec<Uuid> = products::table
                    .filter(products::id.eq_any(&product_ids))
                    .select(products::id)
                    .load(conn)
                    .context("Failed to resolve product ids for linking")?;

                let links: Vec<ProductSupplier> = known_ids
                    .into_iter()
                    .map(|product_id| ProductSupplier{
                        product_id,
                        supplier_id: supplier.id
                    })
                    .collect();

                diesel::insert_into(product_suppliers::table)
                    .values(links)
                    .on_conflict_do_nothing()
                    .execute(conn)
                    .context("Failed to link products to supplier")?;
            }

            Ok(())
        })
    })
    .await
    .context("Failed due to threadpool error")??;

    Ok(supplier_id)
}
