use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::{debug, info};

use crate::error::{DatabaseError, DatabaseResult};
use crate::id_generator::SequenceGenerator;
use crate::models::{CatalogueProduct, MedicinePrescribed, NewOrder, OrderLine, OrderSummaryRow, Prescription};

/// Entity names registered in `icare_elementid_lookup`
pub mod entities {
    pub const ORDER: &str = "ORDER";
    pub const ORDER_ITEM: &str = "ORDERITEM";
}

pub const MEDICINE_PRODUCT_TYPE: &str = "medicine";
pub const INITIAL_ORDER_STATUS: &str = "Listed";
pub const INITIAL_PAYMENT_STATUS: &str = "Pending";
pub const COMPLETED_APPOINTMENT_STATUS: &str = "Completed";

/// Which half of the catalogue to list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductFilter {
    Medicine,
    Healthcare,
}

/// Repository for catalogue, order and prescription queries
#[derive(Debug, Clone)]
pub struct StoreRepository {
    pool: PgPool,
}

impl StoreRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Active products of one catalogue half, manufacturer and category resolved
    ///
    /// # Errors
    ///
    /// Storage failures while querying.
    pub async fn list_products(&self, filter: ProductFilter) -> DatabaseResult<Vec<CatalogueProduct>> {
        let mut query: QueryBuilder<Postgres> = QueryBuilder::new(
            r#"
            SELECT p.product_id, p.product_name, p.product_type,
                   p.hsn_code AS product_hsn_code, p.product_form, p.unit_of_measure,
                   p.composition AS product_composition,
                   p.manufacturer_id, m.manufacturer_name,
                   p.category_id, c.category_name,
                   p.remarks AS product_remarks
            FROM tbl_product p
            LEFT JOIN tbl_manufacturer m ON m.manufacturer_id = p.manufacturer_id
            LEFT JOIN tbl_category c ON c.category_id = p.category_id
            WHERE p.active_flag = 1 AND p.product_type "#,
        );
        query.push(match filter {
            ProductFilter::Medicine => "= ",
            ProductFilter::Healthcare => "<> ",
        });
        query.push_bind(MEDICINE_PRODUCT_TYPE);
        query.push(" ORDER BY p.product_name ASC");

        let products = query
            .build_query_as::<CatalogueProduct>()
            .fetch_all(&self.pool)
            .await
            .map_err(DatabaseError::query(match filter {
                ProductFilter::Medicine => "Database error while fetching medicine products",
                ProductFilter::Healthcare => "Database error while fetching healthcare products",
            }))?;

        debug!(?filter, count = products.len(), "Listed catalogue products");
        Ok(products)
    }

    /// # Errors
    ///
    /// Storage failures while querying.
    pub async fn count_stores(&self) -> DatabaseResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM tbl_store")
            .fetch_one(&self.pool)
            .await
            .map_err(DatabaseError::query("Database error while counting stores"))
    }

    /// Insert an order, its initial status and its lines atomically.
    ///
    /// Order and line identifiers come from the sequential ID generator on
    /// the same transaction, so a failed insert leaves no code consumed.
    ///
    /// # Errors
    ///
    /// `SequenceNotFound` when the ORDER or ORDERITEM entity is missing,
    /// storage failures otherwise.
    pub async fn create_order(&self, order: &NewOrder) -> DatabaseResult<String> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(DatabaseError::query("Database error while starting order transaction"))?;

        let order_id = SequenceGenerator::issue_next_id_in(&mut tx, entities::ORDER).await?;

        sqlx::query(
            r#"
            INSERT INTO tbl_orders (
                order_id, store_id, subscriber_id, order_total_amount, payment_type,
                prescription_reference, delivery_type, payment_status, doctor,
                created_at, updated_at, active_flag
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, now(), now(), 1)
            "#,
        )
        .bind(&order_id)
        .bind(&order.store_id)
        .bind(&order.subscriber_id)
        .bind(order.order_total_amount)
        .bind(&order.payment_type)
        .bind(order.prescription_reference.as_deref())
        .bind(&order.delivery_type)
        .bind(INITIAL_PAYMENT_STATUS)
        .bind(order.doctor.as_deref())
        .execute(&mut *tx)
        .await
        .map_err(DatabaseError::query("Database error while creating order"))?;

        sqlx::query(
            r#"
            INSERT INTO tbl_orderstatus (order_id, order_status, store_id, created_at, updated_at, active_flag)
            VALUES ($1, $2, $3, now(), now(), 1)
            "#,
        )
        .bind(&order_id)
        .bind(INITIAL_ORDER_STATUS)
        .bind(&order.store_id)
        .execute(&mut *tx)
        .await
        .map_err(DatabaseError::query("Database error while creating order status"))?;

        for item in &order.items {
            let item_id = SequenceGenerator::issue_next_id_in(&mut tx, entities::ORDER_ITEM).await?;
            sqlx::query(
                r#"
                INSERT INTO tbl_orderitem (
                    order_item_id, order_id, product_id, product_quantity, product_amount,
                    product_type, created_at, updated_at, active_flag
                ) VALUES ($1, $2, $3, $4, $5, $6, now(), now(), 1)
                "#,
            )
            .bind(&item_id)
            .bind(&order_id)
            .bind(&item.product_id)
            .bind(item.product_quantity)
            .bind(item.product_amount)
            .bind(&item.product_type)
            .execute(&mut *tx)
            .await
            .map_err(DatabaseError::query("Database error while creating order item"))?;
        }

        tx.commit()
            .await
            .map_err(DatabaseError::query("Database error while committing order"))?;

        info!(order_id = %order_id, items = order.items.len(), "Order created");
        Ok(order_id)
    }

    /// Orders of a subscriber, newest first, each with its latest status and store
    ///
    /// # Errors
    ///
    /// Storage failures while querying.
    pub async fn orders_for_subscriber(&self, subscriber_id: &str) -> DatabaseResult<Vec<OrderSummaryRow>> {
        sqlx::query_as::<_, OrderSummaryRow>(
            r#"
            SELECT o.order_id, o.store_id, o.order_total_amount, o.payment_type,
                   o.prescription_reference, o.delivery_type, o.payment_status, o.created_at,
                   s.orderstatus_id, s.order_status, s.updated_at AS status_updated_at,
                   st.store_name, st.address AS store_address, st.mobile AS store_mobile,
                   st.latitude AS store_latitude, st.longitude AS store_longitude,
                   st.store_image
            FROM tbl_orders o
            LEFT JOIN LATERAL (
                SELECT orderstatus_id, order_status, updated_at
                FROM tbl_orderstatus
                WHERE order_id = o.order_id
                ORDER BY updated_at DESC, orderstatus_id DESC
                LIMIT 1
            ) s ON TRUE
            LEFT JOIN tbl_store st ON st.store_id = o.store_id
            WHERE o.subscriber_id = $1 AND o.active_flag = 1
            ORDER BY o.created_at DESC
            "#,
        )
        .bind(subscriber_id)
        .fetch_all(&self.pool)
        .await
        .map_err(DatabaseError::query("Database error while fetching orders list"))
    }

    /// Lines of the given orders with product names resolved
    ///
    /// # Errors
    ///
    /// Storage failures while querying.
    pub async fn order_lines(&self, order_ids: &[String]) -> DatabaseResult<Vec<OrderLine>> {
        if order_ids.is_empty() {
            return Ok(Vec::new());
        }
        sqlx::query_as::<_, OrderLine>(
            r#"
            SELECT oi.order_item_id, oi.order_id, oi.product_id, p.product_name,
                   oi.product_quantity, oi.product_amount, oi.product_type
            FROM tbl_orderitem oi
            LEFT JOIN tbl_product p ON p.product_id = oi.product_id
            WHERE oi.order_id = ANY($1)
            ORDER BY oi.order_item_id ASC
            "#,
        )
        .bind(order_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(DatabaseError::query("Database error while fetching order items"))
    }

    /// Prescriptions written during the subscriber's completed appointments
    ///
    /// # Errors
    ///
    /// Storage failures while querying.
    pub async fn completed_prescriptions(&self, subscriber_id: &str) -> DatabaseResult<Vec<Prescription>> {
        sqlx::query_as::<_, Prescription>(
            r#"
            SELECT p.*
            FROM tbl_prescription p
            JOIN tbl_doctorappointments a ON a.appointment_id = p.appointment_id
            WHERE a.subscriber_id = $1 AND a.status = $2
            ORDER BY p.created_at DESC
            "#,
        )
        .bind(subscriber_id)
        .bind(COMPLETED_APPOINTMENT_STATUS)
        .fetch_all(&self.pool)
        .await
        .map_err(DatabaseError::query("Database error while fetching prescribed products"))
    }

    /// Medicines of the given prescriptions
    ///
    /// # Errors
    ///
    /// Storage failures while querying.
    pub async fn medicines_for_prescriptions(
        &self,
        prescription_ids: &[String],
    ) -> DatabaseResult<Vec<MedicinePrescribed>> {
        if prescription_ids.is_empty() {
            return Ok(Vec::new());
        }
        sqlx::query_as::<_, MedicinePrescribed>(
            r#"
            SELECT *
            FROM tbl_medicineprescribed
            WHERE prescription_id = ANY($1)
            ORDER BY medicine_prescribed_id ASC
            "#,
        )
        .bind(prescription_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(DatabaseError::query("Database error while fetching prescribed medicines"))
    }
}
