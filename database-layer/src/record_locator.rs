//! Generic record lookup by a single field/value pair
//!
//! Three flavours are offered, differing only in how absence is reported:
//! [`RecordLocator::exists`] returns [`Existence::Unique`], [`RecordLocator::get_one`]
//! returns `None` and [`RecordLocator::get_all`] returns an empty vector.
//! None of them treats absence as an error.

use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool};
use tracing::debug;

use crate::error::{DatabaseError, DatabaseResult};
use crate::models::{MedicinePrescribed, Order, Product, Store, Subscriber};

/// A table that can be searched through the [`RecordLocator`].
///
/// Only the columns listed in [`Locatable::LOOKUP_FIELDS`] may be used as
/// lookup fields; the column name is spliced into SQL, the value is bound.
pub trait Locatable: for<'r> FromRow<'r, PgRow> + Send + Unpin {
    const TABLE: &'static str;
    const LOOKUP_FIELDS: &'static [&'static str];
}

impl Locatable for Store {
    const TABLE: &'static str = "tbl_store";
    const LOOKUP_FIELDS: &'static [&'static str] = &["store_id", "mobile", "email", "store_name"];
}

impl Locatable for Subscriber {
    const TABLE: &'static str = "tbl_subscriber";
    const LOOKUP_FIELDS: &'static [&'static str] = &["subscriber_id", "mobile", "email_id"];
}

impl Locatable for Product {
    const TABLE: &'static str = "tbl_product";
    const LOOKUP_FIELDS: &'static [&'static str] = &["product_id", "product_name", "product_type"];
}

impl Locatable for Order {
    const TABLE: &'static str = "tbl_orders";
    const LOOKUP_FIELDS: &'static [&'static str] = &["order_id", "subscriber_id", "store_id"];
}

impl Locatable for MedicinePrescribed {
    const TABLE: &'static str = "tbl_medicineprescribed";
    const LOOKUP_FIELDS: &'static [&'static str] =
        &["medicine_prescribed_id", "prescription_id", "medicine_name"];
}

/// Outcome of a uniqueness check
#[derive(Debug, Clone, PartialEq)]
pub enum Existence<T> {
    /// A record with the value already exists
    Existing(T),
    /// No record carries the value
    Unique,
}

impl<T> Existence<T> {
    pub fn is_unique(&self) -> bool {
        matches!(self, Existence::Unique)
    }
}

#[derive(Debug, Clone)]
pub struct RecordLocator {
    pool: PgPool,
}

impl RecordLocator {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// First record whose `field` equals `value`, or [`Existence::Unique`].
    ///
    /// # Errors
    ///
    /// `Validation` for a field outside the table's lookup list,
    /// `QueryFailed`/`ConnectionFailed` when the query fails.
    pub async fn exists<T: Locatable>(&self, field: &str, value: &str) -> DatabaseResult<Existence<T>> {
        let record = self
            .fetch_first::<T>(field, value, "checking data existence")
            .await?;
        Ok(record.map_or(Existence::Unique, Existence::Existing))
    }

    /// First record whose `field` equals `value`.
    ///
    /// # Errors
    ///
    /// Same as [`RecordLocator::exists`].
    pub async fn get_one<T: Locatable>(&self, field: &str, value: &str) -> DatabaseResult<Option<T>> {
        self.fetch_first::<T>(field, value, "fetching data by id").await
    }

    /// Every record whose `field` equals `value`.
    ///
    /// # Errors
    ///
    /// Same as [`RecordLocator::exists`].
    pub async fn get_all<T: Locatable>(&self, field: &str, value: &str) -> DatabaseResult<Vec<T>> {
        let sql = select_by_field::<T>(field)?;
        debug!(table = T::TABLE, field, "Listing records");
        sqlx::query_as::<_, T>(&sql)
            .bind(value)
            .fetch_all(&self.pool)
            .await
            .map_err(DatabaseError::query(format!(
                "Database error while fetching entity data from {}",
                T::TABLE
            )))
    }

    async fn fetch_first<T: Locatable>(
        &self,
        field: &str,
        value: &str,
        operation: &str,
    ) -> DatabaseResult<Option<T>> {
        let sql = format!("{} LIMIT 1", select_by_field::<T>(field)?);
        debug!(table = T::TABLE, field, "Looking up record");
        sqlx::query_as::<_, T>(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(DatabaseError::query(format!(
                "Database error while {operation} in {}",
                T::TABLE
            )))
    }
}

/// `SELECT * FROM <table> WHERE <field> = $1`, with `field` checked against the whitelist
pub(crate) fn select_by_field<T: Locatable>(field: &str) -> DatabaseResult<String> {
    if !T::LOOKUP_FIELDS.contains(&field) {
        return Err(DatabaseError::Validation(format!(
            "{field} is not a lookup field of {}",
            T::TABLE
        )));
    }
    Ok(format!("SELECT * FROM {} WHERE {} = $1", T::TABLE, field))
}
