//! Subscriber store endpoints: catalogue, store search, orders and prescriptions

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use database_layer::CatalogueProduct;
use tracing::info;

use crate::error::{api_success, api_success_with_count, ApiError, ApiResponse};
use crate::extractors::{ApiJson, ApiQuery};
use crate::server::SubscriberServer;
use crate::services::store::ORDER_CREATED_MESSAGE;
use crate::types::{
    CreateOrderRequest, HubStoreResponse, OrderCreatedResponse, OrderListResponse,
    PrescribedProducts, PrescriptionProduct, PrescriptionQuery, StoreSearchResponse,
    SubscriberMobileQuery, SubscriberStoreSearch,
};
use crate::validation::RequestValidation;

// =============================================================================
// CATALOGUE
// =============================================================================

/// List catalogue products of type medicine
#[utoipa::path(
    get,
    path = "/app/subscriber/icmedicinelist",
    tag = "store",
    responses(
        (status = 200, description = "Medicine products", body = Vec<CatalogueProduct>),
        (status = 404, description = "No medicine product in the catalogue"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_medicine_products(
    State(server): State<SubscriberServer>,
) -> Result<Json<ApiResponse<Vec<CatalogueProduct>>>, ApiError> {
    let products = server.store_service.medicine_products().await?;
    let count = products.len();
    Ok(Json(api_success_with_count(products, count)))
}

/// List catalogue products of type healthcare
#[utoipa::path(
    get,
    path = "/app/products/healthcare/",
    tag = "store",
    responses(
        (status = 200, description = "Healthcare products", body = Vec<CatalogueProduct>),
        (status = 404, description = "No healthcare product in the catalogue"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_healthcare_products(
    State(server): State<SubscriberServer>,
) -> Result<Json<ApiResponse<Vec<CatalogueProduct>>>, ApiError> {
    let products = server.store_service.healthcare_products().await?;
    let count = products.len();
    Ok(Json(api_success_with_count(products, count)))
}

// =============================================================================
// STORE SEARCH
// =============================================================================

/// Stores near the subscriber that can fill the whole cart, priced per batch
#[utoipa::path(
    put,
    path = "/app/subscriber/storelistforoder/",
    tag = "store",
    request_body = SubscriberStoreSearch,
    responses(
        (status = 200, description = "Stores split by delivery option", body = StoreSearchResponse),
        (status = 400, description = "Invalid coordinates, radius or cart"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn search_stores_for_cart(
    State(server): State<SubscriberServer>,
    ApiJson(request): ApiJson<SubscriberStoreSearch>,
) -> Result<Json<ApiResponse<StoreSearchResponse>>, ApiError> {
    request.validate()?;

    let response = server.store_service.search_stores_for_cart(&request).await?;
    Ok(Json(api_success(response)))
}

/// Number of stores registered in the hub
#[utoipa::path(
    get,
    path = "/app/subscriber/hubbystore/",
    tag = "store",
    responses(
        (status = 200, description = "Store count", body = HubStoreResponse),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn hub_store_count(
    State(server): State<SubscriberServer>,
) -> Result<Json<ApiResponse<HubStoreResponse>>, ApiError> {
    let stores = server.store_service.hub_store_count().await?;
    Ok(Json(api_success(HubStoreResponse { stores })))
}

// =============================================================================
// ORDERS
// =============================================================================

/// Place an order with its lines
#[utoipa::path(
    post,
    path = "/app/order/create/",
    tag = "orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created", body = OrderCreatedResponse),
        (status = 400, description = "Invalid order"),
        (status = 404, description = "Unknown subscriber or store"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn create_order(
    State(server): State<SubscriberServer>,
    ApiJson(request): ApiJson<CreateOrderRequest>,
) -> Result<(StatusCode, Json<ApiResponse<OrderCreatedResponse>>), ApiError> {
    request.validate()?;

    let order_id = server.store_service.create_order(&request).await?;
    info!(
        order_id = %order_id,
        store_id = %request.store_id,
        items = request.order_items.len(),
        "Order created"
    );

    Ok((
        StatusCode::CREATED,
        Json(api_success(OrderCreatedResponse {
            message: ORDER_CREATED_MESSAGE.to_string(),
            order_id,
        })),
    ))
}

/// Products and quantities to order for a prescription
#[utoipa::path(
    get,
    path = "/app/order/prescription/",
    tag = "orders",
    params(PrescriptionQuery),
    responses(
        (status = 200, description = "Products for the prescribed medicines", body = Vec<PrescriptionProduct>),
        (status = 400, description = "Missing prescription_id"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn order_by_prescription(
    State(server): State<SubscriberServer>,
    ApiQuery(query): ApiQuery<PrescriptionQuery>,
) -> Result<Json<ApiResponse<Vec<PrescriptionProduct>>>, ApiError> {
    query.validate()?;

    let products = server
        .store_service
        .prescription_products(query.prescription_id.trim())
        .await?;
    let count = products.len();
    Ok(Json(api_success_with_count(products, count)))
}

/// Orders of a subscriber, split into on-going and delivered
#[utoipa::path(
    get,
    path = "/app/subscriber/orderlist/",
    tag = "orders",
    params(SubscriberMobileQuery),
    responses(
        (status = 200, description = "Orders of the subscriber", body = OrderListResponse),
        (status = 400, description = "Missing subscriber_mobile"),
        (status = 404, description = "Unknown subscriber"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_orders(
    State(server): State<SubscriberServer>,
    ApiQuery(query): ApiQuery<SubscriberMobileQuery>,
) -> Result<Json<ApiResponse<OrderListResponse>>, ApiError> {
    query.validate()?;

    let orders = server
        .store_service
        .order_list(query.subscriber_mobile.trim())
        .await?;
    Ok(Json(api_success(orders)))
}

// =============================================================================
// PRESCRIPTIONS
// =============================================================================

/// Prescriptions written at the subscriber's completed appointments
#[utoipa::path(
    get,
    path = "/app/subscriber/viewprescribedproduct/",
    tag = "prescriptions",
    params(SubscriberMobileQuery),
    responses(
        (status = 200, description = "Prescriptions with their medicines", body = Vec<PrescribedProducts>),
        (status = 400, description = "Missing subscriber_mobile"),
        (status = 404, description = "Unknown subscriber or no prescription"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn view_prescribed_products(
    State(server): State<SubscriberServer>,
    ApiQuery(query): ApiQuery<SubscriberMobileQuery>,
) -> Result<Json<ApiResponse<Vec<PrescribedProducts>>>, ApiError> {
    query.validate()?;

    let prescriptions = server
        .store_service
        .prescribed_products(query.subscriber_mobile.trim())
        .await?;
    let count = prescriptions.len();
    Ok(Json(api_success_with_count(prescriptions, count)))
}
