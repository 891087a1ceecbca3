//! Instrument CRUD handlers for the REST API.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde::Deserialize;

use stockbook_core::store::instrument::InstrumentFilter;
use stockbook_types::instrument::{Instrument, InstrumentFields, InstrumentId};

use crate::http::error::AppError;
use crate::state::AppState;

/// Query parameters for instrument listing. Both are optional substring
/// filters.
#[derive(Debug, Default, Deserialize)]
pub struct InstrumentListQuery {
    pub symbol: Option<String>,
    pub company_name: Option<String>,
}

/// GET /api/v1/instruments - List instruments with optional filters.
///
/// Every returned record carries its annotations; no result-size cap.
pub async fn list_instruments(
    State(state): State<AppState>,
    Query(query): Query<InstrumentListQuery>,
) -> Result<Json<Vec<Instrument>>, AppError> {
    let filter = InstrumentFilter {
        symbol: query.symbol,
        company_name: query.company_name,
    };
    let instruments = state.instruments.list_all(&filter).await?;
    Ok(Json(instruments))
}

/// GET /api/v1/instruments/{id} - Get one instrument with its annotations.
pub async fn get_instrument(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Instrument>, AppError> {
    state
        .instruments
        .get_by_id(InstrumentId(id))
        .await?
        .map(Json)
        .ok_or(AppError::NotFound("instrument not found"))
}

/// POST /api/v1/instruments - Create a new instrument.
pub async fn create_instrument(
    State(state): State<AppState>,
    Json(body): Json<InstrumentFields>,
) -> Result<(StatusCode, Json<Instrument>), AppError> {
    body.validate().map_err(AppError::Validation)?;
    let created = state.instruments.create(body).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /api/v1/instruments/{id} - Replace every mutable field.
///
/// The replacement set is accepted as-is; unlike create, no field-level
/// constraints are checked here.
pub async fn update_instrument(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<InstrumentFields>,
) -> Result<Json<Instrument>, AppError> {
    state
        .instruments
        .update(InstrumentId(id), body)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound("instrument not found"))
}

/// DELETE /api/v1/instruments/{id} - Delete an instrument.
///
/// Returns 204 with no body; attached annotations are left in place.
pub async fn delete_instrument(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state
        .instruments
        .delete(InstrumentId(id))
        .await?
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or(AppError::NotFound("instrument not found"))
}
