//! Request extractors that reject with [`ApiError`]
//!
//! axum's own `Json` and `Query` reject with a plain-text body. Wrapping
//! them here routes every malformed body or query string through
//! `ApiError::into_response`, so the caller gets an `ApiErrorResponse`
//! with an `error_id` that matches the logged rejection.

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::ApiError;

/// JSON request body
///
/// Usage:
/// ```rust,ignore
/// pub async fn handler(ApiJson(payload): ApiJson<CreateOrderRequest>) -> ApiResult<...> {
///     payload.validate()?;
/// }
/// ```
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Query string parameters
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);

impl<T> std::ops::Deref for ApiJson<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T> std::ops::Deref for ApiQuery<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request};
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct MobileQuery {
        subscriber_mobile: String,
    }

    #[derive(Debug, Deserialize)]
    struct CartLine {
        product_id: String,
        quantity: i32,
    }

    #[tokio::test]
    async fn test_query_extracts() {
        let request = Request::builder()
            .uri("/orders?subscriber_mobile=9876543210")
            .body(Body::empty())
            .unwrap();
        let (mut parts, _) = request.into_parts();

        let ApiQuery(query) = ApiQuery::<MobileQuery>::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert_eq!(query.subscriber_mobile, "9876543210");
    }

    #[tokio::test]
    async fn test_missing_query_param_is_bad_request() {
        let request = Request::builder().uri("/orders").body(Body::empty()).unwrap();
        let (mut parts, _) = request.into_parts();

        let err = ApiQuery::<MobileQuery>::from_request_parts(&mut parts, &())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::BadRequest { .. }));
        assert!(err.to_string().contains("subscriber_mobile"));
    }

    #[tokio::test]
    async fn test_json_extracts() {
        let request = Request::builder()
            .method("POST")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"product_id":"ICPRD0001","quantity":2}"#))
            .unwrap();

        let line = ApiJson::<CartLine>::from_request(request, &()).await.unwrap();
        assert_eq!(line.product_id, "ICPRD0001");
        assert_eq!(line.quantity, 2);
    }

    #[tokio::test]
    async fn test_truncated_json_is_bad_request() {
        let request = Request::builder()
            .method("POST")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"product_id":"ICPRD0001","#))
            .unwrap();

        let err = ApiJson::<CartLine>::from_request(request, &()).await.unwrap_err();
        assert!(matches!(err, ApiError::BadRequest { .. }));
    }

    #[tokio::test]
    async fn test_missing_content_type_is_bad_request() {
        let request = Request::builder()
            .method("POST")
            .body(Body::from(r#"{"product_id":"ICPRD0001","quantity":2}"#))
            .unwrap();

        let err = ApiJson::<CartLine>::from_request(request, &()).await.unwrap_err();
        assert_eq!(err.status_code(), axum::http::StatusCode::BAD_REQUEST);
    }
}
