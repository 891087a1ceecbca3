//! Axum router configuration with middleware.
//!
//! All routes are under `/api/v1/`. Middleware: CORS, request tracing.

use axum::Router;
use axum::routing::get;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        // Instrument CRUD
        .route(
            "/instruments",
            get(handlers::instrument::list_instruments).post(handlers::instrument::create_instrument),
        )
        .route(
            "/instruments/{id}",
            get(handlers::instrument::get_instrument)
                .put(handlers::instrument::update_instrument)
                .delete(handlers::instrument::delete_instrument),
        )
        // Annotations
        .route(
            "/instruments/{id}/annotations",
            axum::routing::post(handlers::annotation::create_annotation),
        )
        .route("/annotations", get(handlers::annotation::list_annotations))
        .route(
            "/annotations/{id}",
            get(handlers::annotation::get_annotation)
                .put(handlers::annotation::update_annotation)
                .delete(handlers::annotation::delete_annotation),
        );

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health - Simple health check endpoint.
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
