use std::{error::Error, fmt::Debug};

use anyhow::Context;
use diesel::{BoolExpressionMethods, ExpressionMethods, NullableExpressionMethods, PgTextExpressionMethods, QueryDsl, RunQueryDsl};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::{models::Product, schema::products, telemetry::spawn_blocking_with_tracing, utils::{error_fmt_chain, DbConnection}};

pub const DEFAULT_PAGE_SIZE: i64 = 50;
pub const MAX_PAGE_SIZE: i64 = 200;

// Columns the listing may be sorted by. Anything else falls back to Id,
// which keeps user input out of ORDER BY entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn{
    Id,
    Name,
    Price,
    StockQuantity,
    Category
}

impl SortColumn{
    pub fn parse(raw: Option<&str>) -> SortColumn{
        match raw {
            Some("name") => SortColumn::Name,
            Some("price") => SortColumn::Price,
            Some("stock_quantity") => SortColumn::StockQuantity,
            Some("category") => SortColumn::Category,
            _ => SortColumn::Id
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection{
    Asc,
    Desc
}

impl SortDirection{
    pub fn parse(raw: Option<&str>) -> SortDirection{
        match raw {
            Some("asc") => SortDirection::Asc,
            _ => SortDirection::Desc
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProductListing{
    pub search: Option<String>,
    pub category: Option<String>,
    pub min_stock: Option<i32>,
    pub page: i64,
    pub page_size: i64,
    pub sort_by: SortColumn,
    pub sort_dir: SortDirection
}

impl ProductListing{
    pub fn new(
        search: Option<String>,
        category: Option<String>,
        min_stock: Option<i32>,
        page: Option<i64>,
        page_size: Option<i64>,
        sort_by: Option<&str>,
        sort_dir: Option<&str>
    ) -> Self{
        // Empty strings behave like absent filters
        let search = search.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());
        let category = category.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());

        ProductListing{
            search,
            category,
            min_stock,
            page: page.unwrap_or(1).max(1),
            page_size: page_size.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE),
            sort_by: SortColumn::parse(sort_by),
            sort_dir: SortDirection::parse(sort_dir)
        }
    }

    // Saturates instead of overflowing for absurdly large page numbers;
    // Postgres answers a past-the-end OFFSET with an empty page either way.
    pub fn offset(&self) -> i64{
        (self.page - 1).saturating_mul(self.page_size)
    }
}

#[derive(Serialize, Debug)]
pub struct ProductPage{
    pub products: Vec<Product>,
    pub page: i64,
    pub page_size: i64,
    pub total: i64,
    pub total_pages: i64
}

fn filtered(listing: &ProductListing) -> products::BoxedQuery<'static, diesel::pg::Pg>{
    let mut query = products::table.into_boxed();

    if let Some(search) = &listing.search {
        let pattern = format!("%{}%", search);
        query = query.filter(
            products::name.ilike(pattern.clone())
                .or(products::description.assume_not_null().ilike(pattern))
        );
    }

    if let Some(category) = &listing.category {
        query = query.filter(products::category.eq(category.clone()));
    }

    if let Some(min_stock) = listing.min_stock {
        query = query.filter(products::stock_quantity.ge(min_stock));
    }

    query
}

#[tracing::instrument(
    "Getting a page of products from db",
    skip(conn)
)]
pub async fn get_product_page(
    mut conn: DbConnection,
    listing: ProductListing
) -> Result<ProductPage, anyhow::Error>{
    let offset_value = listing.offset();

    let page = spawn_blocking_with_tracing(move || -> Result<ProductPage, anyhow::Error> {
        let total: i64 = filtered(&listing)
            .count()
            .get_result(&mut conn)
            .context("Failed to count products")?;

        let query = filtered(&listing);
        let query = match (listing.sort_by, listing.sort_dir) {
            (SortColumn::Id, SortDirection::Asc) => query.order(products::id.asc()),
            (SortColumn::Id, SortDirection::Desc) => query.order(products::id.desc()),
            (SortColumn::Name, SortDirection::Asc) => query.order(products::name.asc()),
            (SortColumn::Name, SortDirection::Desc) => query.order(products::name.desc()),
            (SortColumn::Price, SortDirection::Asc) => query.order(products::price.asc()),
            (SortColumn::Price, SortDirection::Desc) => query.order(products::price.desc()),
            (SortColumn::StockQuantity, SortDirection::Asc) => query.order(products::stock_quantity.asc()),
            (SortColumn::StockQuantity, SortDirection::Desc) => query.order(products::stock_quantity.desc()),
            (SortColumn::Category, SortDirection::Asc) => query.order(products::category.asc()),
            (SortColumn::Category, SortDirection::Desc) => query.order(products::category.desc())
        };

        let page_rows = query
            .limit(listing.page_size)
            .offset(offset_value)
            .load::<Product>(&mut conn)
            .context("Failed to load products page")?;

        let total_pages = (total + listing.page_size - 1) / listing.page_size;

        Ok(ProductPage{
            products: page_rows,
            page: listing.page,
            page_size: listing.page_size,
            total,
            total_pages
        })
    })
    .await
    .context("Failed due to threadpool error")??;

    Ok(page)
}

#[derive(Error)]
pub enum ProductInsertError{
    #[error("Failed due to threadpool error")]
    ThreadpoolError(#[from] tokio::task::JoinError),
    #[error("Failed to insert into products table")]
    InsertError(#[from] diesel::result::Error)
}

impl Debug for ProductInsertError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

#[tracing::instrument(
    "Inserting a product into db",
    skip_all
)]
pub async fn insert_product(
    mut conn: DbConnection,
    product: Product
) -> Result<(), ProductInsertError>{
    spawn_blocking_with_tracing(move || {
        diesel::insert_into(products::table)
            .values(product)
            .execute(&mut conn)
    })
    .await??;

    Ok(())
}

#[tracing::instrument(
    "Updating product price and stock in db",
    skip(conn)
)]
pub async fn update_product_price_and_stock(
    mut conn: DbConnection,
    product_id: Uuid,
    price: f64,
    stock_quantity: i32
) -> Result<usize, anyhow::Error>{
    let affected = spawn_blocking_with_tracing(move || {
        diesel::update(products::table.filter(products::id.eq(product_id)))
            .set((
                products::price.eq(price),
                products::stock_quantity.eq(stock_quantity)
            ))
            .execute(&mut conn)
            .context("Failed to update product")
    })
    .await
    .context("Failed due to threadpool error")??;

    Ok(affected)
}

#[tracing::instrument(
    "Deleting product from db",
    skip(conn)
)]
pub async fn delete_product(
    mut conn: DbConnection,
    product_id: Uuid
) -> Result<usize, anyhow::Error>{
    let affected = spawn_blocking_with_tracing(move || {
        diesel::delete(products::table.filter(products::id.eq(product_id)))
            .execute(&mut conn)
            .context("Failed to delete product")
    })
    .await
    .context("Failed due to threadpool error")??;

    Ok(affected)
}
