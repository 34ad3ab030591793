//! Health check handlers

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};

use crate::repository::BookRepository;
use crate::state::AppState;

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Service name
    pub service: String,

    /// Version
    pub version: String,
}

/// Readiness check response
#[derive(Debug, Serialize, Deserialize)]
pub struct ReadinessResponse {
    /// Overall readiness status
    pub ready: bool,

    /// Service name
    pub service: String,

    /// Number of stored books, when the store answered
    #[serde(skip_serializing_if = "Option::is_none")]
    pub books: Option<u64>,

    /// Why the store is not ready
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Liveness probe
///
/// Always returns 200 OK if the process is serving requests.
pub async fn health<R: BookRepository>(State(state): State<AppState<R>>) -> impl IntoResponse {
    let response = HealthResponse {
        status: "healthy".to_string(),
        service: state.config().service.name.clone(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    (StatusCode::OK, Json(response))
}

/// Readiness probe
///
/// Returns 200 OK when the book store answers a count query, 503 otherwise.
pub async fn readiness<R: BookRepository>(State(state): State<AppState<R>>) -> impl IntoResponse {
    let service = state.config().service.name.clone();

    match state.books().count(&[]).await {
        Ok(total) => (
            StatusCode::OK,
            Json(ReadinessResponse {
                ready: true,
                service,
                books: Some(total),
                message: None,
            }),
        ),
        Err(e) => {
            tracing::error!("Book store readiness check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ReadinessResponse {
                    ready: false,
                    service,
                    books: None,
                    message: Some(format!("Book store unavailable: {}", e.kind)),
                }),
            )
        }
    }
}
