//! Centralized API route path constants
//!
//! Runtime routes are built from these constants. Handler `#[utoipa::path]`
//! attributes use the full literal path and must match `APP` + the constant.

/// Prefix of every subscriber store endpoint
pub const APP: &str = "/app";

/// Health check endpoints
pub mod health {
    pub const HEALTH: &str = "/health";
    pub const ROOT: &str = "/";
}

/// Catalogue endpoints
pub mod products {
    pub const MEDICINE_LIST: &str = "/subscriber/icmedicinelist";
    pub const HEALTHCARE_LIST: &str = "/products/healthcare/";
}

/// Store search endpoints
pub mod stores {
    // Spelling kept for client compatibility
    pub const STORE_LIST_FOR_ORDER: &str = "/subscriber/storelistforoder/";
    pub const HUB_BY_STORE: &str = "/subscriber/hubbystore/";
}

/// Order endpoints
pub mod orders {
    pub const CREATE: &str = "/order/create/";
    pub const BY_PRESCRIPTION: &str = "/order/prescription/";
    pub const LIST: &str = "/subscriber/orderlist/";
}

/// Prescription endpoints
pub mod prescriptions {
    pub const PRESCRIBED_PRODUCTS: &str = "/subscriber/viewprescribedproduct/";
}

/// Documentation endpoints
pub mod docs {
    pub const SWAGGER_UI: &str = "/docs";
    pub const OPENAPI_JSON: &str = "/api-docs/openapi.json";
}
