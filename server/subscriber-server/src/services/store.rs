//! Store business logic
//!
//! Orchestrates the repositories behind the `/app` endpoints: catalogue
//! listings, the cart store search, order creation and the order and
//! prescription views of a subscriber.

use chrono::{DateTime, NaiveDate, Utc};
use database_layer::{
    CatalogueProduct, GeoPoint, GeographicRepository, InventoryStore, NewOrder, NewOrderItem,
    OrderLine, OrderSummaryRow, Product, ProductFilter, RecordLocator, Store, StoreRepository,
    Subscriber,
};
use lazy_static::lazy_static;
use logger_redacted::PiiRedactor;
use regex::Regex;
use sqlx::PgPool;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::SearchSettings;
use crate::error::{ApiError, ApiResult};
use crate::services::pricing::CartPricer;
use crate::types::{
    CartQuote, CreateOrderRequest, OrderListResponse, OrderSummary, PrescribedMedicine,
    PrescribedProducts, PrescriptionProduct, StoreOffer, StoreSearchResponse,
    SubscriberStoreSearch,
};

pub const ORDER_CREATED_MESSAGE: &str = "Order Created Successfully";
pub const DELIVERED_STATUS: &str = "Delivered";
pub const DATE_FORMAT: &str = "%d-%m-%Y";

lazy_static! {
    static ref FIRST_NUMBER: Option<Regex> = Regex::new(r"\d+").ok();
}

/// Units to dispense for a prescribed medicine.
///
/// `medication_timing` marks each daily dose with a `'1'` (`"101"` is morning
/// and night); the first integer in `treatment_duration` is the number of
/// days, 0 when there is none.
///
/// ```
/// use subscriber_server::services::prescribed_quantity;
///
/// assert_eq!(prescribed_quantity("101", "5 days"), 10);
/// assert_eq!(prescribed_quantity("111", "for 1 week"), 3);
/// assert_eq!(prescribed_quantity("101", "until review"), 0);
/// ```
pub fn prescribed_quantity(medication_timing: &str, treatment_duration: &str) -> i32 {
    let doses = i32::try_from(medication_timing.matches('1').count()).unwrap_or(i32::MAX);
    let days = FIRST_NUMBER
        .as_ref()
        .and_then(|re| re.find(treatment_duration))
        .and_then(|m| m.as_str().parse::<i32>().ok())
        .unwrap_or(0);
    doses.saturating_mul(days)
}

pub fn format_date(timestamp: DateTime<Utc>) -> String {
    timestamp.format(DATE_FORMAT).to_string()
}

fn format_day(day: NaiveDate) -> String {
    day.format(DATE_FORMAT).to_string()
}

#[derive(Clone)]
pub struct StoreService {
    locator: RecordLocator,
    geographic_repo: GeographicRepository,
    store_repo: StoreRepository,
    pricer: CartPricer,
    search: SearchSettings,
    redactor: Arc<PiiRedactor>,
}

impl StoreService {
    pub fn new(
        pool: PgPool,
        inventory: Arc<dyn InventoryStore>,
        search: SearchSettings,
        redactor: Arc<PiiRedactor>,
    ) -> Self {
        Self {
            locator: RecordLocator::new(pool.clone()),
            geographic_repo: GeographicRepository::new(pool.clone()),
            store_repo: StoreRepository::new(pool),
            pricer: CartPricer::new(inventory, search.expiry_guard_days),
            search,
            redactor,
        }
    }

    /// # Errors
    ///
    /// `NotFound` when the catalogue has no active medicine, storage failures
    /// otherwise.
    pub async fn medicine_products(&self) -> ApiResult<Vec<CatalogueProduct>> {
        let products = self.store_repo.list_products(ProductFilter::Medicine).await?;
        if products.is_empty() {
            return Err(ApiError::not_found("No medicine products found"));
        }
        Ok(products)
    }

    /// # Errors
    ///
    /// `NotFound` when the catalogue has no active non-medicine product.
    pub async fn healthcare_products(&self) -> ApiResult<Vec<CatalogueProduct>> {
        let products = self.store_repo.list_products(ProductFilter::Healthcare).await?;
        if products.is_empty() {
            return Err(ApiError::not_found("No healthcare products found"));
        }
        Ok(products)
    }

    /// Nearby stores that can fill the cart, priced, split by delivery option.
    ///
    /// # Errors
    ///
    /// Validation failures for bad coordinates or radius, storage failures
    /// from any repository.
    pub async fn search_stores_for_cart(
        &self,
        request: &SubscriberStoreSearch,
    ) -> ApiResult<StoreSearchResponse> {
        let origin = GeoPoint::new(request.subscriber_latitude, request.subscriber_longitude)?;
        let radius_km = request.radius_km.unwrap_or(self.search.default_radius_km);
        let nearby = self.geographic_repo.search_nearby(origin, radius_km).await?;
        let today = Utc::now().date_naive();

        let mut response = StoreSearchResponse::default();
        let mut names: HashMap<String, Option<String>> = HashMap::new();

        for candidate in nearby {
            let Some(store) = self.locator.get_one::<Store>("mobile", &candidate.mobile).await? else {
                warn!(
                    store_mobile = %self.redactor.redact(&candidate.mobile),
                    "Nearby store has no store record"
                );
                continue;
            };

            let Some(mut quote) = self
                .pricer
                .quote(&store.store_id, &request.cart_products, today)
                .await?
            else {
                continue;
            };
            self.fill_product_names(&mut quote, &mut names).await?;

            let offer = StoreOffer {
                store_id: store.store_id.clone(),
                store_name: store.store_name.clone(),
                store_image: store.store_image.clone(),
                store_address: store.address.clone(),
                store_latitude: store.latitude,
                store_longitude: store.longitude,
                store_mobile: store.mobile.clone(),
                store_delivery_options: store.delivery_options.clone(),
                distance_km: candidate.distance_km,
                store_product_price: quote,
            };
            if store.offers_home_delivery() {
                response.home_delivery_stores.push(offer);
            } else {
                response.in_stores.push(offer);
            }
        }

        info!(
            subscriber_id = %request.subscriber_id,
            radius_km,
            home_delivery = response.home_delivery_stores.len(),
            in_store = response.in_stores.len(),
            "Store search completed"
        );
        Ok(response)
    }

    async fn fill_product_names(
        &self,
        quote: &mut CartQuote,
        names: &mut HashMap<String, Option<String>>,
    ) -> ApiResult<()> {
        for line in &mut quote.product_list {
            if !names.contains_key(&line.product_id) {
                let name = self
                    .locator
                    .get_one::<Product>("product_id", &line.product_id)
                    .await?
                    .map(|product| product.product_name);
                names.insert(line.product_id.clone(), name);
            }
            line.product_name = names.get(&line.product_id).cloned().flatten();
        }
        Ok(())
    }

    /// Create the order and its lines; returns the new order id.
    ///
    /// # Errors
    ///
    /// `NotFound` when the subscriber or store does not exist, or when the
    /// ORDER/ORDERITEM sequences are not registered.
    pub async fn create_order(&self, request: &CreateOrderRequest) -> ApiResult<String> {
        if self
            .locator
            .exists::<Subscriber>("subscriber_id", &request.subscriber_id)
            .await?
            .is_unique()
        {
            return Err(ApiError::not_found(format!(
                "Subscriber {} not found",
                request.subscriber_id
            )));
        }
        if self
            .locator
            .exists::<Store>("store_id", &request.store_id)
            .await?
            .is_unique()
        {
            return Err(ApiError::not_found(format!("Store {} not found", request.store_id)));
        }

        let order = NewOrder {
            store_id: request.store_id.clone(),
            subscriber_id: request.subscriber_id.clone(),
            order_total_amount: request.order_total_amount,
            delivery_type: request.delivery_type.clone(),
            payment_type: request.payment_type.clone(),
            prescription_reference: request.prescription.clone().filter(|p| !p.trim().is_empty()),
            doctor: request.doctor.clone().filter(|d| !d.trim().is_empty()),
            items: request
                .order_items
                .iter()
                .map(|item| NewOrderItem {
                    product_id: item.product_id.clone(),
                    product_quantity: item.product_quantity,
                    product_amount: item.product_amount,
                    product_type: item.product_type.clone(),
                })
                .collect(),
        };

        Ok(self.store_repo.create_order(&order).await?)
    }

    /// Products and quantities to order for a prescription
    ///
    /// # Errors
    ///
    /// Storage failures while reading medicines or products.
    pub async fn prescription_products(
        &self,
        prescription_id: &str,
    ) -> ApiResult<Vec<PrescriptionProduct>> {
        let medicines = self
            .store_repo
            .medicines_for_prescriptions(&[prescription_id.to_string()])
            .await?;

        let mut products = Vec::with_capacity(medicines.len());
        for medicine in medicines {
            let product_id = self
                .locator
                .get_one::<Product>("product_name", &medicine.medicine_name)
                .await?
                .map(|product| product.product_id);
            if product_id.is_none() {
                debug!(medicine = %medicine.medicine_name, "Prescribed medicine not in catalogue");
            }
            products.push(PrescriptionProduct {
                product_id,
                quantity: prescribed_quantity(&medicine.medication_timing, &medicine.treatment_duration),
                product_name: medicine.medicine_name,
            });
        }
        Ok(products)
    }

    /// # Errors
    ///
    /// Storage failures while counting.
    pub async fn hub_store_count(&self) -> ApiResult<i64> {
        Ok(self.store_repo.count_stores().await?)
    }

    async fn subscriber_by_mobile(&self, mobile: &str) -> ApiResult<Subscriber> {
        self.locator
            .get_one::<Subscriber>("mobile", mobile)
            .await?
            .ok_or_else(|| {
                debug!(subscriber_mobile = %self.redactor.redact(mobile), "Unknown subscriber mobile");
                ApiError::not_found("Subscriber not found")
            })
    }

    /// Orders of the subscriber split into on-going and delivered
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown mobile, storage failures otherwise.
    pub async fn order_list(&self, subscriber_mobile: &str) -> ApiResult<OrderListResponse> {
        let subscriber = self.subscriber_by_mobile(subscriber_mobile).await?;
        let orders = self.store_repo.orders_for_subscriber(&subscriber.subscriber_id).await?;

        let order_ids: Vec<String> = orders.iter().map(|o| o.order_id.clone()).collect();
        let mut lines_by_order: HashMap<String, Vec<OrderLine>> = HashMap::new();
        for line in self.store_repo.order_lines(&order_ids).await? {
            lines_by_order.entry(line.order_id.clone()).or_default().push(line);
        }

        Ok(split_orders(orders, &mut lines_by_order))
    }

    /// Prescriptions of the subscriber's completed appointments
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown mobile or when there is no prescription.
    pub async fn prescribed_products(&self, subscriber_mobile: &str) -> ApiResult<Vec<PrescribedProducts>> {
        let subscriber = self.subscriber_by_mobile(subscriber_mobile).await?;
        let prescriptions = self
            .store_repo
            .completed_prescriptions(&subscriber.subscriber_id)
            .await?;
        if prescriptions.is_empty() {
            return Err(ApiError::not_found("No Prescription found for this Subscriber"));
        }

        let ids: Vec<String> = prescriptions.iter().map(|p| p.prescription_id.clone()).collect();
        let mut medicines: HashMap<String, Vec<PrescribedMedicine>> = HashMap::new();
        for medicine in self.store_repo.medicines_for_prescriptions(&ids).await? {
            medicines
                .entry(medicine.prescription_id)
                .or_default()
                .push(PrescribedMedicine {
                    medicine_name: medicine.medicine_name,
                    dosage_timing: medicine.dosage_timing,
                    medication_timing: medicine.medication_timing,
                    treatment_duration: medicine.treatment_duration,
                });
        }

        let mut seen = HashSet::new();
        Ok(prescriptions
            .into_iter()
            .filter(|p| seen.insert(p.prescription_id.clone()))
            .map(|p| PrescribedProducts {
                medicine_prescribed: medicines.remove(&p.prescription_id).unwrap_or_default(),
                prescription_id: p.prescription_id,
                appointment_id: p.appointment_id,
                blood_pressure: p.blood_pressure,
                temperature: p.temperature,
                pulse: p.pulse,
                weight: p.weight,
                drug_allergy: p.drug_allergy,
                history: p.history,
                complaints: p.complaints,
                diagnosis: p.diagnosis,
                specialist_type: p.specialist_type,
                consulting_doctor: p.consulting_doctor,
                next_visit_date: p.next_visit_date.map(format_day),
                procedure_name: p.procedure_name,
                home_care_service: p.home_care_service,
                created_at: format_date(p.created_at),
                updated_at: format_date(p.updated_at),
            })
            .collect())
    }
}

/// Shape order rows into summaries and split them on the delivered status
fn split_orders(
    orders: Vec<OrderSummaryRow>,
    lines_by_order: &mut HashMap<String, Vec<OrderLine>>,
) -> OrderListResponse {
    let mut response = OrderListResponse::default();
    for row in orders {
        let delivered = row.order_status.as_deref() == Some(DELIVERED_STATUS);
        let summary = OrderSummary {
            order_items: lines_by_order.remove(&row.order_id).unwrap_or_default(),
            store_id: row.store_id,
            store_name: row.store_name,
            store_address: row.store_address,
            store_mobile: row.store_mobile,
            store_latitude: row.store_latitude,
            store_longitude: row.store_longitude,
            store_image: row.store_image,
            order_id: row.order_id,
            order_total_amount: row.order_total_amount,
            prescription_reference: row.prescription_reference,
            payment_status: row.payment_status,
            payment_type: row.payment_type,
            delivery_type: row.delivery_type,
            order_date: format_date(row.created_at),
            order_status: row.order_status,
            order_status_id: row.orderstatus_id,
            order_status_updated: row.status_updated_at.map(format_date),
        };
        if delivered {
            response.delivered_orders.push(summary);
        } else {
            response.on_going_orders.push(summary);
        }
    }
    response
}
