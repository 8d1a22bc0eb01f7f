//! Store stock and batch pricing documents
//!
//! Stock is kept per store and product as a document holding the available
//! quantity and the batches it is made of. Prices are kept per batch. The
//! [`InventoryStore`] trait is the seam the pricing logic is written against;
//! [`PgInventoryStore`] keeps the documents in JSONB columns.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};

use crate::error::{DatabaseError, DatabaseResult};

/// One batch inside a stock document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockBatch {
    pub batch_number: String,
    pub batch_quantity: i32,
    /// `MM/YYYY`
    pub expiry_date: String,
    pub is_active: i16,
}

impl StockBatch {
    /// First day of the expiry month, `None` when the date is not `MM/YYYY`
    pub fn expiry(&self) -> Option<NaiveDate> {
        let (month, year) = self.expiry_date.trim().split_once('/')?;
        let month: u32 = month.trim().parse().ok()?;
        let year: i32 = year.trim().parse().ok()?;
        NaiveDate::from_ymd_opt(year, month, 1)
    }

    /// Active and not expiring within `guard_days` of `today`.
    ///
    /// Batches with an unreadable expiry date are never sold.
    pub fn is_sellable(&self, today: NaiveDate, guard_days: u32) -> bool {
        if self.is_active != 1 || self.batch_quantity <= 0 {
            return false;
        }
        let Some(expiry) = self.expiry() else {
            return false;
        };
        (expiry - today).num_days() > i64::from(guard_days)
    }
}

/// Stock document for one product in one store
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct StockDocument {
    pub store_id: String,
    pub product_id: String,
    pub available_stock: i32,
    pub active_flag: i16,
    pub batch_details: Json<Vec<StockBatch>>,
}

impl StockDocument {
    pub fn batches(&self) -> &[StockBatch] {
        &self.batch_details.0
    }
}

/// Pricing document for one batch
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct BatchPricing {
    pub store_id: String,
    pub product_id: String,
    pub batch_number: String,
    pub net_rate: f64,
    pub mrp: Option<f64>,
}

#[async_trait]
pub trait InventoryStore: Send + Sync {
    /// Active stock document with at least `min_quantity` available
    async fn find_stock(
        &self,
        store_id: &str,
        product_id: &str,
        min_quantity: i32,
    ) -> DatabaseResult<Option<StockDocument>>;

    async fn find_batch_pricing(
        &self,
        store_id: &str,
        product_id: &str,
        batch_number: &str,
    ) -> DatabaseResult<Option<BatchPricing>>;
}

#[derive(Debug, Clone)]
pub struct PgInventoryStore {
    pool: PgPool,
}

impl PgInventoryStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InventoryStore for PgInventoryStore {
    async fn find_stock(
        &self,
        store_id: &str,
        product_id: &str,
        min_quantity: i32,
    ) -> DatabaseResult<Option<StockDocument>> {
        sqlx::query_as::<_, StockDocument>(
            r#"
            SELECT store_id, product_id, available_stock, active_flag, batch_details
            FROM store_stocks
            WHERE store_id = $1 AND product_id = $2
              AND available_stock >= $3 AND active_flag = 1
            LIMIT 1
            "#,
        )
        .bind(store_id)
        .bind(product_id)
        .bind(min_quantity)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::query("Database error while checking store stock"))
    }

    async fn find_batch_pricing(
        &self,
        store_id: &str,
        product_id: &str,
        batch_number: &str,
    ) -> DatabaseResult<Option<BatchPricing>> {
        sqlx::query_as::<_, BatchPricing>(
            r#"
            SELECT store_id, product_id, batch_number, net_rate, mrp
            FROM batch_pricing
            WHERE store_id = $1 AND product_id = $2 AND batch_number = $3
            LIMIT 1
            "#,
        )
        .bind(store_id)
        .bind(product_id)
        .bind(batch_number)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::query("Database error in fetching pricing by batch"))
    }
}
