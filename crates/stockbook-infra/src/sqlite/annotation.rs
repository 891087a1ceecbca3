//! SQLite annotation store implementation.
//!
//! Implements `AnnotationStore` from `stockbook-core` using sqlx with split
//! read/write pools. `created_on` and the instrument back-reference are
//! written once at insert and never appear in an UPDATE column list.

use chrono::{DateTime, Utc};
use sqlx::Row;

use stockbook_core::store::annotation::AnnotationStore;
use stockbook_types::annotation::{Annotation, AnnotationFields, AnnotationId, NewAnnotation};
use stockbook_types::error::StoreError;
use stockbook_types::instrument::InstrumentId;

use super::map_store_err;
use super::pool::DatabasePool;

/// SQLite-backed implementation of `AnnotationStore`.
pub struct SqliteAnnotationStore {
    pool: DatabasePool,
}

impl SqliteAnnotationStore {
    /// Create a new store backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

pub(crate) fn parse_datetime(s: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StoreError::Query(format!("invalid datetime: {e}")))
}

pub(crate) fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

pub(crate) fn row_to_annotation(row: &sqlx::sqlite::SqliteRow) -> Result<Annotation, StoreError> {
    let id: i64 = row
        .try_get("id")
        .map_err(|e| StoreError::Query(e.to_string()))?;
    let title: String = row
        .try_get("title")
        .map_err(|e| StoreError::Query(e.to_string()))?;
    let content: String = row
        .try_get("content")
        .map_err(|e| StoreError::Query(e.to_string()))?;
    let created_on_str: String = row
        .try_get("created_on")
        .map_err(|e| StoreError::Query(e.to_string()))?;
    let instrument_id: Option<i64> = row
        .try_get("instrument_id")
        .map_err(|e| StoreError::Query(e.to_string()))?;

    Ok(Annotation {
        id: AnnotationId(id),
        title,
        content,
        created_on: parse_datetime(&created_on_str)?,
        instrument_id: instrument_id.map(InstrumentId),
    })
}

impl AnnotationStore for SqliteAnnotationStore {
    async fn insert(&self, annotation: &NewAnnotation) -> Result<Annotation, StoreError> {
        let result = sqlx::query(
            "INSERT INTO annotations (title, content, created_on, instrument_id)
             VALUES (?, ?, ?, ?)",
        )
        .bind(&annotation.title)
        .bind(&annotation.content)
        .bind(format_datetime(&annotation.created_on))
        .bind(annotation.instrument_id.map(|id| id.0))
        .execute(&self.pool.writer)
        .await
        .map_err(map_store_err)?;

        Ok(Annotation {
            id: AnnotationId(result.last_insert_rowid()),
            title: annotation.title.clone(),
            content: annotation.content.clone(),
            created_on: annotation.created_on,
            instrument_id: annotation.instrument_id,
        })
    }

    async fn find_by_id(&self, id: AnnotationId) -> Result<Option<Annotation>, StoreError> {
        let row = sqlx::query("SELECT * FROM annotations WHERE id = ?")
            .bind(id.0)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(map_store_err)?;

        match row {
            Some(row) => Ok(Some(row_to_annotation(&row)?)),
            None => Ok(None),
        }
    }

    async fn find_all(&self) -> Result<Vec<Annotation>, StoreError> {
        let rows = sqlx::query("SELECT * FROM annotations")
            .fetch_all(&self.pool.reader)
            .await
            .map_err(map_store_err)?;

        let mut annotations = Vec::with_capacity(rows.len());
        for row in &rows {
            annotations.push(row_to_annotation(row)?);
        }
        Ok(annotations)
    }

    async fn update(
        &self,
        id: AnnotationId,
        fields: &AnnotationFields,
    ) -> Result<Option<Annotation>, StoreError> {
        let result = sqlx::query("UPDATE annotations SET title = ?, content = ? WHERE id = ?")
            .bind(&fields.title)
            .bind(&fields.content)
            .bind(id.0)
            .execute(&self.pool.writer)
            .await
            .map_err(map_store_err)?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        // Re-read for the immutable columns the caller does not supply.
        let row = sqlx::query("SELECT * FROM annotations WHERE id = ?")
            .bind(id.0)
            .fetch_optional(&self.pool.writer)
            .await
            .map_err(map_store_err)?;

        match row {
            Some(row) => Ok(Some(row_to_annotation(&row)?)),
            None => Ok(None),
        }
    }

    async fn delete(&self, id: AnnotationId) -> Result<Option<Annotation>, StoreError> {
        // Snapshot and delete both run on the single-connection writer
        // pool, which serializes them against concurrent mutations.
        let row = sqlx::query("SELECT * FROM annotations WHERE id = ?")
            .bind(id.0)
            .fetch_optional(&self.pool.writer)
            .await
            .map_err(map_store_err)?;

        let Some(row) = row else {
            return Ok(None);
        };
        let snapshot = row_to_annotation(&row)?;

        let result = sqlx::query("DELETE FROM annotations WHERE id = ?")
            .bind(id.0)
            .execute(&self.pool.writer)
            .await
            .map_err(map_store_err)?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        Ok(Some(snapshot))
    }
}
