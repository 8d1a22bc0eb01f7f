pub mod paths;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::{
    handlers::{health, store},
    openapi,
    server::SubscriberServer,
};

/// Create health check routes
pub fn health_routes() -> Router<SubscriberServer> {
    Router::new()
        .route(paths::health::HEALTH, get(health::health_check))
        .route(paths::health::ROOT, get(health::welcome))
}

/// Create product catalogue routes
pub fn product_routes() -> Router<SubscriberServer> {
    Router::new()
        .route(paths::products::MEDICINE_LIST, get(store::list_medicine_products))
        .route(paths::products::HEALTHCARE_LIST, get(store::list_healthcare_products))
}

/// Create store search routes
pub fn store_routes() -> Router<SubscriberServer> {
    Router::new()
        .route(paths::stores::STORE_LIST_FOR_ORDER, put(store::search_stores_for_cart))
        .route(paths::stores::HUB_BY_STORE, get(store::hub_store_count))
}

/// Create order routes
pub fn order_routes() -> Router<SubscriberServer> {
    Router::new()
        .route(paths::orders::CREATE, post(store::create_order))
        .route(paths::orders::BY_PRESCRIPTION, get(store::order_by_prescription))
        .route(paths::orders::LIST, get(store::list_orders))
        .route(
            paths::prescriptions::PRESCRIBED_PRODUCTS,
            get(store::view_prescribed_products),
        )
}

/// Routes served under the `/app` prefix
pub fn app_routes() -> Router<SubscriberServer> {
    Router::new()
        .merge(product_routes())
        .merge(store_routes())
        .merge(order_routes())
}

/// Create all application routes
pub fn create_routes() -> Router<SubscriberServer> {
    Router::new()
        .merge(health_routes())
        .merge(openapi::create_docs_routes())
        .nest(paths::APP, app_routes())
}
