use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
};
use std::time::{Duration, Instant};
use tower_http::cors::CorsLayer;

use crate::server::SubscriberServer;

/// Request timing middleware
pub async fn request_timing_middleware(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let response = next.run(request).await;

    tracing::info!(
        method = %method,
        path = %path,
        duration_ms = start.elapsed().as_millis(),
        status = response.status().as_u16(),
        "Request processed"
    );

    response
}

/// Audit logging middleware.
///
/// Subscriber endpoints take the mobile number in the query string, so the
/// URI is redacted before it is logged.
pub async fn audit_logging_middleware(
    State(server): State<SubscriberServer>,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method().clone();
    let uri = server.redactor.redact(&request.uri().to_string());
    let client = request
        .headers()
        .get("X-Forwarded-For")
        .and_then(|h| h.to_str().ok())
        .unwrap_or("direct")
        .to_string();

    tracing::info!(
        method = %method,
        uri = %uri,
        client = %client,
        "Audit log: Request received"
    );

    let response = next.run(request).await;

    tracing::info!(
        method = %method,
        uri = %uri,
        client = %client,
        status = response.status().as_u16(),
        "Audit log: Response sent"
    );

    response
}

/// Create CORS layer for the configured origins.
///
/// Origins that are not valid header values are logged and ignored.
pub fn create_cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(allowed)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .max_age(Duration::from_secs(3600))
}
