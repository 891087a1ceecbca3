//! HTTP/REST API layer for stockbook.
//!
//! Axum-based REST API at `/api/v1/` with CORS support and request tracing.
//! Handlers validate request shapes, then delegate to the repositories;
//! the repositories never re-validate.

pub mod error;
pub mod handlers;
pub mod router;
