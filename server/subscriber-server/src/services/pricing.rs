//! Cart availability and batch pricing for one store
//!
//! A store can serve a cart when every line has an active stock document
//! with enough units. The cart is then priced batch by batch: sellable
//! batches are consumed in document order, each slice billed at that
//! batch's net rate, until the line quantity is covered.
//!
//! Lines naming the same product are merged first so their combined
//! quantity is checked against one set of batches.

use chrono::NaiveDate;
use database_layer::{DatabaseResult, InventoryStore};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::types::{CartProduct, CartQuote, PricedProduct};

#[derive(Clone)]
pub struct CartPricer {
    inventory: Arc<dyn InventoryStore>,
    expiry_guard_days: u32,
}

impl CartPricer {
    pub fn new(inventory: Arc<dyn InventoryStore>, expiry_guard_days: u32) -> Self {
        Self {
            inventory,
            expiry_guard_days,
        }
    }

    /// Price `cart` in `store_id` as of `today`.
    ///
    /// Duplicate product lines are summed before pricing.
    /// Returns `None` when the store lacks a stock document for some line, or
    /// when its sellable batches cannot cover a line. Batches without a
    /// pricing document are skipped. Product names are left unset.
    ///
    /// # Errors
    ///
    /// Storage failures from the inventory store.
    pub async fn quote(
        &self,
        store_id: &str,
        cart: &[CartProduct],
        today: NaiveDate,
    ) -> DatabaseResult<Option<CartQuote>> {
        let mut total_amount = 0.0;
        let mut product_list = Vec::new();

        for item in &merge_cart_lines(cart) {
            let Some(stock) = self
                .inventory
                .find_stock(store_id, &item.product_id, item.quantity)
                .await?
            else {
                debug!(store_id, product_id = %item.product_id, "Store lacks stock for cart line");
                return Ok(None);
            };

            let mut remaining = item.quantity;
            for batch in stock
                .batches()
                .iter()
                .filter(|batch| batch.is_sellable(today, self.expiry_guard_days))
            {
                if remaining == 0 {
                    break;
                }
                let Some(pricing) = self
                    .inventory
                    .find_batch_pricing(store_id, &item.product_id, &batch.batch_number)
                    .await?
                else {
                    warn!(
                        store_id,
                        product_id = %item.product_id,
                        batch_number = %batch.batch_number,
                        "No pricing for batch, skipping"
                    );
                    continue;
                };

                let taken = remaining.min(batch.batch_quantity);
                total_amount += pricing.net_rate * f64::from(taken);
                product_list.push(PricedProduct {
                    product_id: item.product_id.clone(),
                    product_name: None,
                    quantity: taken,
                    batch_number: batch.batch_number.clone(),
                    price: pricing.net_rate,
                });
                remaining -= taken;
            }

            if remaining > 0 {
                debug!(
                    store_id,
                    product_id = %item.product_id,
                    short_by = remaining,
                    "Sellable batches cannot cover cart line"
                );
                return Ok(None);
            }
        }

        Ok(Some(CartQuote {
            total_amount,
            product_list,
        }))
    }
}

/// Collapse lines for the same product into one, keeping first-seen order.
fn merge_cart_lines(cart: &[CartProduct]) -> Vec<CartProduct> {
    let mut merged: Vec<CartProduct> = Vec::with_capacity(cart.len());
    for item in cart {
        match merged.iter_mut().find(|line| line.product_id == item.product_id) {
            Some(line) => line.quantity = line.quantity.saturating_add(item.quantity),
            None => merged.push(item.clone()),
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use database_layer::{BatchPricing, DatabaseError, StockBatch, StockDocument};
    use mockall::mock;
    use mockall::predicate::eq;
    use sqlx::types::Json;

    mock! {
        pub Inventory {}

        #[async_trait]
        impl InventoryStore for Inventory {
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
    }

    // =============================================================================
    // HELPER FUNCTIONS
    // =============================================================================

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn batch(number: &str, quantity: i32, expiry: &str) -> StockBatch {
        StockBatch {
            batch_number: number.to_string(),
            batch_quantity: quantity,
            expiry_date: expiry.to_string(),
            is_active: 1,
        }
    }

    fn stock(product_id: &str, batches: Vec<StockBatch>) -> StockDocument {
        StockDocument {
            store_id: "ICSTR0001".to_string(),
            product_id: product_id.to_string(),
            available_stock: batches.iter().map(|b| b.batch_quantity).sum(),
            active_flag: 1,
            batch_details: Json(batches),
        }
    }

    fn pricing(batch_number: &str, net_rate: f64) -> BatchPricing {
        BatchPricing {
            store_id: "ICSTR0001".to_string(),
            product_id: "ICPRD0001".to_string(),
            batch_number: batch_number.to_string(),
            net_rate,
            mrp: None,
        }
    }

    fn cart(quantity: i32) -> Vec<CartProduct> {
        vec![CartProduct {
            product_id: "ICPRD0001".to_string(),
            quantity,
        }]
    }

    fn expect_pricing(mock: &mut MockInventory, batch_number: &'static str, net_rate: f64) {
        mock.expect_find_batch_pricing()
            .withf(move |_, _, number| number == batch_number)
            .returning(move |_, _, number| Ok(Some(pricing(number, net_rate))));
    }

    // =============================================================================
    // QUOTES
    // =============================================================================

    #[tokio::test]
    async fn test_single_batch_covers_line() {
        let mut mock = MockInventory::new();
        mock.expect_find_stock()
            .with(eq("ICSTR0001"), eq("ICPRD0001"), eq(3))
            .returning(|_, product, _| Ok(Some(stock(product, vec![batch("B1", 10, "12/2025")]))));
        expect_pricing(&mut mock, "B1", 12.5);

        let quote = CartPricer::new(Arc::new(mock), 30)
            .quote("ICSTR0001", &cart(3), today())
            .await
            .unwrap()
            .unwrap();

        assert!((quote.total_amount - 37.5).abs() < 1e-9);
        assert_eq!(quote.product_list.len(), 1);
        assert_eq!(quote.product_list[0].quantity, 3);
        assert_eq!(quote.product_list[0].batch_number, "B1");
    }

    #[tokio::test]
    async fn test_line_spans_batches() {
        let mut mock = MockInventory::new();
        mock.expect_find_stock().returning(|_, product, _| {
            Ok(Some(stock(
                product,
                vec![batch("B1", 4, "12/2025"), batch("B2", 10, "03/2026")],
            )))
        });
        expect_pricing(&mut mock, "B1", 10.0);
        expect_pricing(&mut mock, "B2", 11.0);

        let quote = CartPricer::new(Arc::new(mock), 30)
            .quote("ICSTR0001", &cart(6), today())
            .await
            .unwrap()
            .unwrap();

        // 4 x 10.0 + 2 x 11.0
        assert!((quote.total_amount - 62.0).abs() < 1e-9);
        let slices: Vec<(&str, i32)> = quote
            .product_list
            .iter()
            .map(|p| (p.batch_number.as_str(), p.quantity))
            .collect();
        assert_eq!(slices, vec![("B1", 4), ("B2", 2)]);
    }

    #[tokio::test]
    async fn test_expiring_and_inactive_batches_skipped() {
        let mut mock = MockInventory::new();
        mock.expect_find_stock().returning(|_, product, _| {
            let mut inactive = batch("B0", 50, "12/2030");
            inactive.is_active = 0;
            Ok(Some(stock(
                product,
                vec![
                    inactive,
                    batch("EXPIRED", 50, "01/2024"),
                    batch("SOON", 50, "07/2024"),
                    batch("GOOD", 50, "12/2025"),
                ],
            )))
        });
        expect_pricing(&mut mock, "GOOD", 5.0);

        let quote = CartPricer::new(Arc::new(mock), 30)
            .quote("ICSTR0001", &cart(2), today())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(quote.product_list.len(), 1);
        assert_eq!(quote.product_list[0].batch_number, "GOOD");
        assert!((quote.total_amount - 10.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_missing_stock_drops_store() {
        let mut mock = MockInventory::new();
        mock.expect_find_stock().returning(|_, _, _| Ok(None));
        mock.expect_find_batch_pricing().never();

        let quote = CartPricer::new(Arc::new(mock), 30)
            .quote("ICSTR0001", &cart(1), today())
            .await
            .unwrap();
        assert!(quote.is_none());
    }

    #[tokio::test]
    async fn test_uncovered_line_drops_store() {
        let mut mock = MockInventory::new();
        // Document claims enough stock but most of it is about to expire
        mock.expect_find_stock().returning(|_, product, _| {
            Ok(Some(stock(
                product,
                vec![batch("SOON", 20, "06/2024"), batch("GOOD", 2, "12/2025")],
            )))
        });
        expect_pricing(&mut mock, "GOOD", 5.0);

        let quote = CartPricer::new(Arc::new(mock), 30)
            .quote("ICSTR0001", &cart(5), today())
            .await
            .unwrap();
        assert!(quote.is_none());
    }

    #[tokio::test]
    async fn test_unpriced_batch_skipped() {
        let mut mock = MockInventory::new();
        mock.expect_find_stock().returning(|_, product, _| {
            Ok(Some(stock(
                product,
                vec![batch("NOPRICE", 10, "12/2025"), batch("B2", 10, "12/2025")],
            )))
        });
        mock.expect_find_batch_pricing()
            .withf(|_, _, number| number == "NOPRICE")
            .returning(|_, _, _| Ok(None));
        expect_pricing(&mut mock, "B2", 3.0);

        let quote = CartPricer::new(Arc::new(mock), 30)
            .quote("ICSTR0001", &cart(4), today())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(quote.product_list.len(), 1);
        assert_eq!(quote.product_list[0].batch_number, "B2");
    }

    #[test]
    fn test_merge_cart_lines() {
        let line = |id: &str, quantity| CartProduct {
            product_id: id.to_string(),
            quantity,
        };
        let merged = merge_cart_lines(&[line("A", 2), line("B", 1), line("A", 3)]);
        let lines: Vec<(&str, i32)> = merged
            .iter()
            .map(|l| (l.product_id.as_str(), l.quantity))
            .collect();
        assert_eq!(lines, vec![("A", 5), ("B", 1)]);
    }

    #[tokio::test]
    async fn test_repeated_product_lines_cannot_share_a_batch() {
        let mut mock = MockInventory::new();
        mock.expect_find_stock()
            .with(eq("ICSTR0001"), eq("ICPRD0001"), eq(4))
            .times(1)
            .returning(|_, product, _| Ok(Some(stock(product, vec![batch("B1", 3, "12/2025")]))));
        expect_pricing(&mut mock, "B1", 10.0);

        let mut repeated = cart(2);
        repeated.extend(cart(2));
        let quote = CartPricer::new(Arc::new(mock), 30)
            .quote("ICSTR0001", &repeated, today())
            .await
            .unwrap();
        assert!(quote.is_none());
    }

    #[tokio::test]
    async fn test_repeated_product_lines_priced_once() {
        let mut mock = MockInventory::new();
        mock.expect_find_stock()
            .with(eq("ICSTR0001"), eq("ICPRD0001"), eq(4))
            .times(1)
            .returning(|_, product, _| Ok(Some(stock(product, vec![batch("B1", 10, "12/2025")]))));
        expect_pricing(&mut mock, "B1", 10.0);

        let mut repeated = cart(2);
        repeated.extend(cart(2));
        let quote = CartPricer::new(Arc::new(mock), 30)
            .quote("ICSTR0001", &repeated, today())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(quote.product_list.len(), 1);
        assert_eq!(quote.product_list[0].quantity, 4);
        assert!((quote.total_amount - 40.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_storage_failure_propagates() {
        let mut mock = MockInventory::new();
        mock.expect_find_stock().returning(|_, _, _| {
            Err(DatabaseError::QueryFailed {
                context: "Database error while checking store stock".to_string(),
                message: "connection reset".to_string(),
            })
        });

        let result = CartPricer::new(Arc::new(mock), 30)
            .quote("ICSTR0001", &cart(1), today())
            .await;
        assert!(matches!(result, Err(DatabaseError::QueryFailed { .. })));
    }
}
