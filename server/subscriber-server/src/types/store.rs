//! Request and response bodies of the store endpoints

use database_layer::OrderLine;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::error::ApiError;
use crate::validation::RequestValidation;
use crate::{validate_field, validate_range, validate_required};

// =============================================================================
// STORE SEARCH
// =============================================================================

/// One cart line: a product and the quantity wanted
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CartProduct {
    #[schema(example = "ICPRD0001")]
    pub product_id: String,
    #[schema(example = 2, minimum = 1)]
    pub quantity: i32,
}

/// Find stores near the subscriber that can fill the cart
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SubscriberStoreSearch {
    #[schema(example = "ICSUB0001")]
    pub subscriber_id: String,
    #[schema(example = 12.9716)]
    pub subscriber_latitude: f64,
    #[schema(example = 77.5946)]
    pub subscriber_longitude: f64,
    /// Search radius; the configured default applies when omitted
    #[serde(default)]
    #[schema(example = 5.0)]
    pub radius_km: Option<f64>,
    pub cart_products: Vec<CartProduct>,
}

impl RequestValidation for SubscriberStoreSearch {
    fn validate(&self) -> Result<(), ApiError> {
        validate_required!(self.subscriber_id, "subscriber_id is required");
        validate_range!(
            self.subscriber_latitude,
            -90.0,
            90.0,
            "subscriber_latitude must be between -90 and 90"
        );
        validate_range!(
            self.subscriber_longitude,
            -180.0,
            180.0,
            "subscriber_longitude must be between -180 and 180"
        );
        if let Some(radius_km) = self.radius_km {
            validate_field!(
                radius_km,
                radius_km.is_finite() && radius_km >= 0.0,
                "radius_km must be a finite, non-negative number"
            );
        }
        validate_field!(
            self.cart_products,
            !self.cart_products.is_empty(),
            "cart_products must contain at least one product"
        );
        for item in &self.cart_products {
            validate_required!(item.product_id, "cart product_id is required");
            validate_field!(item.quantity, item.quantity > 0, "cart quantity must be positive");
        }
        Ok(())
    }
}

/// Slice of a cart line served from one batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PricedProduct {
    pub product_id: String,
    pub product_name: Option<String>,
    pub quantity: i32,
    pub batch_number: String,
    /// Net rate of the batch, per unit
    pub price: f64,
}

/// What the cart costs in one store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CartQuote {
    pub total_amount: f64,
    pub product_list: Vec<PricedProduct>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StoreOffer {
    pub store_id: String,
    pub store_name: String,
    pub store_image: Option<String>,
    pub store_address: Option<String>,
    pub store_latitude: f64,
    pub store_longitude: f64,
    pub store_mobile: String,
    pub store_delivery_options: Option<String>,
    pub distance_km: f64,
    pub store_product_price: CartQuote,
}

/// Stores able to fill the cart, nearest first within each list
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct StoreSearchResponse {
    pub home_delivery_stores: Vec<StoreOffer>,
    pub in_stores: Vec<StoreOffer>,
}

// =============================================================================
// ORDERS
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderItemRequest {
    #[schema(example = "ICPRD0001")]
    pub product_id: String,
    #[schema(example = 2, minimum = 1)]
    pub product_quantity: i32,
    #[schema(example = 45.5)]
    pub product_amount: f64,
    #[schema(example = "medicine")]
    pub product_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateOrderRequest {
    #[schema(example = "ICSTR0001")]
    pub store_id: String,
    #[schema(example = "ICSUB0001")]
    pub subscriber_id: String,
    #[schema(example = 91.0)]
    pub order_total_amount: f64,
    #[schema(example = "Home Delivery")]
    pub delivery_type: String,
    #[schema(example = "Cash on Delivery")]
    pub payment_type: String,
    /// Prescription the order was placed against
    pub prescription: Option<String>,
    pub doctor: Option<String>,
    pub order_items: Vec<OrderItemRequest>,
}

impl RequestValidation for CreateOrderRequest {
    fn validate(&self) -> Result<(), ApiError> {
        validate_required!(self.store_id, "store_id is required");
        validate_required!(self.subscriber_id, "subscriber_id is required");
        validate_required!(self.delivery_type, "delivery_type is required");
        validate_required!(self.payment_type, "payment_type is required");
        validate_field!(
            self.order_total_amount,
            self.order_total_amount.is_finite() && self.order_total_amount >= 0.0,
            "order_total_amount must be a non-negative number"
        );
        validate_field!(
            self.order_items,
            !self.order_items.is_empty(),
            "order_items must contain at least one item"
        );
        for item in &self.order_items {
            validate_required!(item.product_id, "order item product_id is required");
            validate_required!(item.product_type, "order item product_type is required");
            validate_field!(
                item.product_quantity,
                item.product_quantity > 0,
                "order item product_quantity must be positive"
            );
            validate_field!(
                item.product_amount,
                item.product_amount.is_finite() && item.product_amount >= 0.0,
                "order item product_amount must be a non-negative number"
            );
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderCreatedResponse {
    #[schema(example = "Order Created Successfully")]
    pub message: String,
    #[schema(example = "ICORD0001")]
    pub order_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderSummary {
    pub store_id: String,
    pub store_name: Option<String>,
    pub store_address: Option<String>,
    pub store_mobile: Option<String>,
    pub store_latitude: Option<f64>,
    pub store_longitude: Option<f64>,
    pub store_image: Option<String>,
    pub order_id: String,
    pub order_total_amount: f64,
    pub prescription_reference: Option<String>,
    pub payment_status: String,
    pub payment_type: String,
    pub delivery_type: String,
    /// `DD-MM-YYYY`
    #[schema(example = "05-06-2024")]
    pub order_date: String,
    pub order_status: Option<String>,
    pub order_status_id: Option<i32>,
    pub order_status_updated: Option<String>,
    pub order_items: Vec<OrderLine>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct OrderListResponse {
    pub on_going_orders: Vec<OrderSummary>,
    pub delivered_orders: Vec<OrderSummary>,
}

// =============================================================================
// PRESCRIPTIONS
// =============================================================================

/// Product to order for one prescribed medicine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PrescriptionProduct {
    /// `None` when no catalogue product carries the medicine name
    pub product_id: Option<String>,
    pub product_name: String,
    pub quantity: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PrescribedMedicine {
    pub medicine_name: String,
    pub dosage_timing: Option<String>,
    #[schema(example = "101")]
    pub medication_timing: String,
    #[schema(example = "5 days")]
    pub treatment_duration: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PrescribedProducts {
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
    pub next_visit_date: Option<String>,
    pub procedure_name: Option<String>,
    pub home_care_service: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub medicine_prescribed: Vec<PrescribedMedicine>,
}

// =============================================================================
// MISC
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HubStoreResponse {
    #[schema(example = 12)]
    pub stores: i64,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct PrescriptionQuery {
    #[param(example = "ICPRE0001")]
    pub prescription_id: String,
}

impl RequestValidation for PrescriptionQuery {
    fn validate(&self) -> Result<(), ApiError> {
        validate_required!(self.prescription_id, "prescription_id is required");
        Ok(())
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct SubscriberMobileQuery {
    #[param(example = "9876543210")]
    pub subscriber_mobile: String,
}

impl RequestValidation for SubscriberMobileQuery {
    fn validate(&self) -> Result<(), ApiError> {
        validate_required!(self.subscriber_mobile, "subscriber_mobile is required");
        Ok(())
    }
}
