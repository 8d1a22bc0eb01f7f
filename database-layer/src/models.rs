// Database models
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Row of `icare_elementid_lookup`: the latest code issued for an entity
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SequenceRecord {
    pub generator_id: i32,
    pub entity_name: String,
    pub starting_code: String,
    pub last_code: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub active_flag: i16,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Product {
    pub product_id: String,
    pub product_name: String,
    pub product_type: String,
    pub hsn_code: Option<String>,
    pub product_form: Option<String>,
    pub unit_of_measure: Option<String>,
    pub composition: Option<String>,
    pub manufacturer_id: Option<String>,
    pub category_id: Option<String>,
    pub remarks: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub active_flag: i16,
}

/// Catalogue entry with manufacturer and category names resolved
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct CatalogueProduct {
    #[schema(example = "ICPRD0001")]
    pub product_id: String,
    #[schema(example = "Paracetamol 500mg")]
    pub product_name: String,
    #[schema(example = "medicine")]
    pub product_type: String,
    pub product_hsn_code: Option<String>,
    pub product_form: Option<String>,
    pub unit_of_measure: Option<String>,
    pub product_composition: Option<String>,
    pub manufacturer_id: Option<String>,
    pub manufacturer_name: Option<String>,
    pub category_id: Option<String>,
    pub category_name: Option<String>,
    pub product_remarks: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Store {
    pub store_id: String,
    pub store_name: String,
    pub address: Option<String>,
    pub email: Option<String>,
    pub mobile: String,
    pub owner_name: Option<String>,
    pub is_main_store: bool,
    pub latitude: f64,
    pub longitude: f64,
    pub store_image: Option<String>,
    pub delivery_options: Option<String>,
    pub remarks: Option<String>,
    pub verification_status: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub active_flag: i16,
}

impl Store {
    pub const HOME_DELIVERY: &'static str = "Home Delivery";

    pub fn offers_home_delivery(&self) -> bool {
        self.delivery_options.as_deref() == Some(Self::HOME_DELIVERY)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Subscriber {
    pub subscriber_id: String,
    pub first_name: String,
    pub last_name: Option<String>,
    pub mobile: String,
    pub email_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub active_flag: i16,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Order {
    pub order_id: String,
    pub store_id: String,
    pub subscriber_id: String,
    pub order_total_amount: f64,
    pub payment_type: String,
    pub prescription_reference: Option<String>,
    pub delivery_type: String,
    pub payment_status: String,
    pub doctor: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub active_flag: i16,
}

/// Order header joined with its latest status and the store that serves it
#[derive(Debug, Clone, FromRow)]
pub struct OrderSummaryRow {
    pub order_id: String,
    pub store_id: String,
    pub order_total_amount: f64,
    pub payment_type: String,
    pub prescription_reference: Option<String>,
    pub delivery_type: String,
    pub payment_status: String,
    pub created_at: DateTime<Utc>,
    pub orderstatus_id: Option<i32>,
    pub order_status: Option<String>,
    pub status_updated_at: Option<DateTime<Utc>>,
    pub store_name: Option<String>,
    pub store_address: Option<String>,
    pub store_mobile: Option<String>,
    pub store_latitude: Option<f64>,
    pub store_longitude: Option<f64>,
    pub store_image: Option<String>,
}

/// Order line with the product name resolved
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct OrderLine {
    pub order_item_id: String,
    pub order_id: String,
    pub product_id: String,
    pub product_name: Option<String>,
    pub product_quantity: i32,
    pub product_amount: f64,
    pub product_type: String,
}

/// Values needed to insert an order and its lines
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub store_id: String,
    pub subscriber_id: String,
    pub order_total_amount: f64,
    pub delivery_type: String,
    pub payment_type: String,
    pub prescription_reference: Option<String>,
    pub doctor: Option<String>,
    pub items: Vec<NewOrderItem>,
}

#[derive(Debug, Clone)]
pub struct NewOrderItem {
    pub product_id: String,
    pub product_quantity: i32,
    pub product_amount: f64,
    pub product_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Prescription {
    pub prescription_id: String,
    pub appointment_id: String,
    pub blood_pressure: Option<String>,
    pub temperature: Option<String>,
    pub pulse: Option<String>,
    pub weight: Option<String>,
    pub drug_allergy: Option<String>,
    pub history: Option<String>,
    pub complaints: Option<String>,
    pub diagnosis: Option<String>,
    pub specialist_type: Option<String>,
    pub consulting_doctor: Option<String>,
    pub next_visit_date: Option<NaiveDate>,
    pub procedure_name: Option<String>,
    pub home_care_service: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub active_flag: i16,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MedicinePrescribed {
    pub medicine_prescribed_id: String,
    pub prescription_id: String,
    pub medicine_name: String,
    pub dosage_timing: Option<String>,
    pub medication_timing: String,
    pub treatment_duration: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub active_flag: i16,
}
