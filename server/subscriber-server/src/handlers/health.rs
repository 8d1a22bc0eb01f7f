use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use std::collections::HashMap;
use utoipa::ToSchema;

use crate::error::{api_success, ApiResponse};
use crate::server::SubscriberServer;

/// Health check response
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Overall system health status
    #[schema(example = "healthy")]
    pub status: String,
    /// Current timestamp in RFC3339 format
    #[schema(example = "2024-01-15T10:30:00Z")]
    pub timestamp: String,
    #[schema(example = "0.1.0")]
    pub version: String,
    /// Uptime in seconds
    #[schema(example = 3600)]
    pub uptime: u64,
    /// Individual dependency checks
    pub checks: HashMap<String, String>,
}

/// Welcome response served at the root path
#[derive(Debug, Serialize, ToSchema)]
pub struct WelcomeResponse {
    #[schema(example = "iCare Subscriber Engine")]
    pub name: String,
    #[schema(example = "0.1.0")]
    pub version: String,
    #[schema(example = "/docs")]
    pub docs: String,
}

/// Health check handler
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "System is healthy", body = HealthResponse),
        (status = 503, description = "Database is unreachable", body = HealthResponse)
    )
)]
pub async fn health_check(
    State(server): State<SubscriberServer>,
) -> (StatusCode, Json<ApiResponse<HealthResponse>>) {
    let database_ok = server.db.is_healthy().await;

    let mut checks = HashMap::new();
    checks.insert(
        "database".to_string(),
        if database_ok { "healthy" } else { "unreachable" }.to_string(),
    );

    let (status, label) = if database_ok {
        (StatusCode::OK, "healthy")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    let response = HealthResponse {
        status: label.to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime: server.uptime_secs(),
        checks,
    };

    (status, Json(api_success(response)))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "health",
    responses(
        (status = 200, description = "Service banner", body = WelcomeResponse)
    )
)]
pub async fn welcome(State(server): State<SubscriberServer>) -> Json<ApiResponse<WelcomeResponse>> {
    Json(api_success(WelcomeResponse {
        name: server.config.server.name.clone(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        docs: crate::routes::paths::docs::SWAGGER_UI.to_string(),
    }))
}
