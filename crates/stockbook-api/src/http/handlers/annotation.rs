//! Annotation CRUD handlers for the REST API.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use stockbook_types::annotation::{Annotation, AnnotationFields, AnnotationId};
use stockbook_types::instrument::InstrumentId;

use crate::http::error::AppError;
use crate::state::AppState;

/// GET /api/v1/annotations - List every annotation, orphans included.
pub async fn list_annotations(
    State(state): State<AppState>,
) -> Result<Json<Vec<Annotation>>, AppError> {
    let annotations = state.annotations.list_all().await?;
    Ok(Json(annotations))
}

/// GET /api/v1/annotations/{id} - Get one annotation.
pub async fn get_annotation(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Annotation>, AppError> {
    state
        .annotations
        .get_by_id(AnnotationId(id))
        .await?
        .map(Json)
        .ok_or(AppError::NotFound("annotation not found"))
}

/// POST /api/v1/instruments/{id}/annotations - Attach an annotation.
///
/// The target instrument must exist; a missing target is rejected before
/// anything is written.
pub async fn create_annotation(
    State(state): State<AppState>,
    Path(instrument_id): Path<i64>,
    Json(body): Json<AnnotationFields>,
) -> Result<(StatusCode, Json<Annotation>), AppError> {
    body.validate().map_err(AppError::Validation)?;
    let created = state
        .annotations
        .create(InstrumentId(instrument_id), body)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /api/v1/annotations/{id} - Replace title and content.
pub async fn update_annotation(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<AnnotationFields>,
) -> Result<Json<Annotation>, AppError> {
    body.validate().map_err(AppError::Validation)?;
    state
        .annotations
        .update(AnnotationId(id), body)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound("annotation not found"))
}

/// DELETE /api/v1/annotations/{id} - Delete an annotation. 204 on success.
pub async fn delete_annotation(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state
        .annotations
        .delete(AnnotationId(id))
        .await?
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or(AppError::NotFound("annotation not found"))
}
