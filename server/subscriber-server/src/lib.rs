//! iCare Subscriber Server - pharmacy store API for subscribers
//!
//! This library provides the HTTP surface of the subscriber engine: the
//! product catalogue, the nearby store search that prices a cart batch by
//! batch, order placement and history, and prescription lookups.

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod logging;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod server;
pub mod services;
pub mod types;
pub mod validation;

// Re-export commonly used types
pub use config::AppConfig;
pub use error::*;
pub use server::SubscriberServer;

use axum::{
    middleware::{from_fn, from_fn_with_state},
    Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

/// Create the main application router with all routes and middleware
pub fn create_app(server: SubscriberServer) -> Router {
    let timeout = Duration::from_secs(server.config.server.request_timeout_secs);

    routes::create_routes()
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::create_cors_layer(&server.config.server.cors_origins))
                .layer(TimeoutLayer::new(timeout))
                .layer(from_fn(middleware::request_timing_middleware))
                .layer(from_fn_with_state(
                    server.clone(),
                    middleware::audit_logging_middleware,
                )),
        )
        .with_state(server)
}
