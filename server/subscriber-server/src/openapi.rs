use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::routes::paths;
use crate::server::SubscriberServer;

/// Main OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health endpoints
        crate::handlers::health::health_check,
        crate::handlers::health::welcome,

        // Store endpoints
        crate::handlers::store::list_medicine_products,
        crate::handlers::store::list_healthcare_products,
        crate::handlers::store::search_stores_for_cart,
        crate::handlers::store::hub_store_count,

        // Order endpoints
        crate::handlers::store::create_order,
        crate::handlers::store::order_by_prescription,
        crate::handlers::store::list_orders,

        // Prescription endpoints
        crate::handlers::store::view_prescribed_products,
    ),
    components(
        schemas(
            crate::handlers::health::HealthResponse,
            crate::handlers::health::WelcomeResponse,
            crate::error::ApiErrorResponse,

            // Store schemas
            database_layer::CatalogueProduct,
            database_layer::OrderLine,
            crate::types::CartProduct,
            crate::types::SubscriberStoreSearch,
            crate::types::PricedProduct,
            crate::types::CartQuote,
            crate::types::StoreOffer,
            crate::types::StoreSearchResponse,
            crate::types::HubStoreResponse,

            // Order schemas
            crate::types::OrderItemRequest,
            crate::types::CreateOrderRequest,
            crate::types::OrderCreatedResponse,
            crate::types::OrderSummary,
            crate::types::OrderListResponse,

            // Prescription schemas
            crate::types::PrescriptionProduct,
            crate::types::PrescribedMedicine,
            crate::types::PrescribedProducts,
        )
    ),
    tags(
        (name = "health", description = "System health endpoints"),
        (name = "store", description = "Catalogue and nearby store search"),
        (name = "orders", description = "Order placement and history"),
        (name = "prescriptions", description = "Prescriptions written for the subscriber"),
    ),
    info(
        title = "iCare Subscriber API",
        version = "0.1.0",
        description = "Subscriber-facing pharmacy API: find nearby stores that stock a cart, place orders and review prescriptions.",
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server"),
    ),
)]
pub struct ApiDoc;

/// Swagger UI and the OpenAPI document
pub fn create_docs_routes() -> Router<SubscriberServer> {
    Router::new()
        .merge(SwaggerUi::new(paths::docs::SWAGGER_UI).url(paths::docs::OPENAPI_JSON, ApiDoc::openapi()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_every_store_path() {
        let doc = ApiDoc::openapi();
        let documented: Vec<&String> = doc.paths.paths.keys().collect();

        for path in [
            format!("{}{}", paths::APP, paths::products::MEDICINE_LIST),
            format!("{}{}", paths::APP, paths::products::HEALTHCARE_LIST),
            format!("{}{}", paths::APP, paths::stores::STORE_LIST_FOR_ORDER),
            format!("{}{}", paths::APP, paths::stores::HUB_BY_STORE),
            format!("{}{}", paths::APP, paths::orders::CREATE),
            format!("{}{}", paths::APP, paths::orders::BY_PRESCRIPTION),
            format!("{}{}", paths::APP, paths::orders::LIST),
            format!("{}{}", paths::APP, paths::prescriptions::PRESCRIBED_PRODUCTS),
            paths::health::HEALTH.to_string(),
        ] {
            assert!(documented.contains(&&path), "missing {path} in OpenAPI document");
        }
    }

    #[test]
    fn test_document_serializes() {
        let json = ApiDoc::openapi().to_json().expect("OpenAPI serializes");
        assert!(json.contains("iCare Subscriber API"));
    }
}
