//! Request tracking middleware
//!
//! Request id generation and propagation, sensitive header masking and the
//! per-request tracing span.

use http::{header::HeaderName, Request};
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    sensitive_headers::SetSensitiveRequestHeadersLayer,
    trace::{DefaultOnRequest, DefaultOnResponse, HttpMakeClassifier, MakeSpan, TraceLayer},
};
use tracing::{Level, Span};

use crate::ids::{request_id_from_headers, MakeTypedRequestId};

/// Headers masked in logs
pub const SENSITIVE_HEADERS: &[&str] = &["authorization", "cookie", "set-cookie", "x-api-key"];

/// Assigns a `req_...` id to requests that arrive without `x-request-id`
pub fn request_id_layer() -> SetRequestIdLayer<MakeTypedRequestId> {
    SetRequestIdLayer::x_request_id(MakeTypedRequestId)
}

/// Copies `x-request-id` from the request onto the response
pub fn request_id_propagation_layer() -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::x_request_id()
}

pub fn sensitive_headers_layer() -> SetSensitiveRequestHeadersLayer {
    SetSensitiveRequestHeadersLayer::new(SENSITIVE_HEADERS.iter().map(|h| HeaderName::from_static(*h)))
}

/// Opens one `request` span per request carrying method, path and request id
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestSpan;

impl<B> MakeSpan<B> for RequestSpan {
    fn make_span(&mut self, request: &Request<B>) -> Span {
        let request_id = request_id_from_headers(request.headers()).unwrap_or("-");
        tracing::info_span!(
            "request",
            method = %request.method(),
            uri = %request.uri(),
            request_id = %request_id,
        )
    }
}

pub fn trace_layer() -> TraceLayer<HttpMakeClassifier, RequestSpan, DefaultOnRequest, DefaultOnResponse>
{
    TraceLayer::new_for_http()
        .make_span_with(RequestSpan)
        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
        .on_response(DefaultOnResponse::new().level(Level::INFO))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, routing::get, Router};
    use tower::ServiceExt;

    fn tracked_router() -> Router {
        Router::new()
            .route("/ping", get(|| async { "pong" }))
            .layer(trace_layer())
            .layer(sensitive_headers_layer())
            .layer(request_id_propagation_layer())
            .layer(request_id_layer())
    }

    #[tokio::test]
    async fn test_generated_request_id_is_returned() {
        let response = tracked_router()
            .oneshot(Request::builder().uri("/ping").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let id = response.headers().get("x-request-id").unwrap();
        assert!(id.to_str().unwrap().starts_with("req_"));
    }

    #[tokio::test]
    async fn test_client_request_id_is_propagated() {
        let response = tracked_router()
            .oneshot(
                Request::builder()
                    .uri("/ping")
                    .header("x-request-id", "req_from_client")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response.headers().get("x-request-id").unwrap(),
            "req_from_client"
        );
    }

    #[test]
    fn test_sensitive_headers() {
        assert!(SENSITIVE_HEADERS.contains(&"authorization"));
        for header in SENSITIVE_HEADERS {
            assert!(HeaderName::from_bytes(header.as_bytes()).is_ok());
        }
    }
}
