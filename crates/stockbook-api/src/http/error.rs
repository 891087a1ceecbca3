//! Application error type mapping to HTTP status codes.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use stockbook_types::error::{AnnotationError, StoreError};

/// Application-level error that maps to HTTP responses.
///
/// Not-found is a first-class outcome here, not an exception: repositories
/// report absence as `None` and handlers turn it into this variant.
#[derive(Debug)]
pub enum AppError {
    /// Identifier did not resolve to an existing record.
    NotFound(&'static str),
    /// Malformed input rejected at the transport boundary.
    Validation(String),
    /// The backing store failed.
    Store(StoreError),
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        AppError::Store(e)
    }
}

impl From<AnnotationError> for AppError {
    fn from(e: AnnotationError) -> Self {
        match e {
            // The original surface rejects an annotation aimed at a missing
            // instrument as a bad request, not a 404.
            AnnotationError::InstrumentMissing => {
                AppError::Validation("instrument does not exist".to_string())
            }
            AnnotationError::Store(e) => AppError::Store(e),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(what) => (StatusCode::NOT_FOUND, "NOT_FOUND", (*what).to_string()),
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::Store(StoreError::Unavailable) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "STORE_UNAVAILABLE",
                "store unavailable".to_string(),
            ),
            AppError::Store(StoreError::Query(msg)) => {
                tracing::error!(error = %msg, "store query failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "STORE_ERROR",
                    "internal store error".to_string(),
                )
            }
        };

        let body = json!({
            "code": code,
            "message": message,
        });

        (
            status,
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            body.to_string(),
        )
            .into_response()
    }
}
