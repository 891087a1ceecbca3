//! Instrument store trait definition.

use stockbook_types::error::StoreError;
use stockbook_types::instrument::{Instrument, InstrumentFields, InstrumentId};

/// Filter criteria for listing instruments.
///
/// Matching is case-sensitive substring containment. Unset or blank
/// (empty or whitespace-only) fields impose no constraint; either, both,
/// or neither may be set.
#[derive(Debug, Clone, Default)]
pub struct InstrumentFilter {
    pub symbol: Option<String>,
    pub company_name: Option<String>,
}

/// Store trait for instrument persistence.
///
/// Implementations live in stockbook-infra (e.g., SqliteInstrumentStore).
/// Uses native async fn in traits (Rust 2024 edition, no async_trait macro).
/// Absence is reported as `None`, never as an error.
pub trait InstrumentStore: Send + Sync {
    /// Insert a new instrument. The store assigns a fresh id and returns
    /// the persisted record with id populated.
    fn insert(
        &self,
        fields: &InstrumentFields,
    ) -> impl std::future::Future<Output = Result<Instrument, StoreError>> + Send;

    /// Point lookup. When `include_annotations` is set, eagerly loads every
    /// annotation referencing the instrument, in no guaranteed order.
    fn find_by_id(
        &self,
        id: InstrumentId,
        include_annotations: bool,
    ) -> impl std::future::Future<Output = Result<Option<Instrument>, StoreError>> + Send;

    /// Return all instruments matching the filter, each optionally
    /// populated with its annotations.
    fn find_all(
        &self,
        filter: &InstrumentFilter,
        include_annotations: bool,
    ) -> impl std::future::Future<Output = Result<Vec<Instrument>, StoreError>> + Send;

    /// Replace every mutable field of the record in a single conditional
    /// write. Returns `None` when no record has the given id.
    fn update(
        &self,
        id: InstrumentId,
        fields: &InstrumentFields,
    ) -> impl std::future::Future<Output = Result<Option<Instrument>, StoreError>> + Send;

    /// Remove the record and return the pre-deletion snapshot, or `None`
    /// if not found. Annotations referencing the id are left untouched.
    fn delete(
        &self,
        id: InstrumentId,
    ) -> impl std::future::Future<Output = Result<Option<Instrument>, StoreError>> + Send;

    /// Existence probe without materializing the full record.
    fn exists(
        &self,
        id: InstrumentId,
    ) -> impl std::future::Future<Output = Result<bool, StoreError>> + Send;
}
