//! Instrument repository: the query/mutation surface consumed by the
//! transport layer.

use crate::store::instrument::{InstrumentFilter, InstrumentStore};
use stockbook_types::error::StoreError;
use stockbook_types::instrument::{Instrument, InstrumentFields, InstrumentId};

/// Repository mediating transport requests into instrument store
/// operations. Generic over the store trait so the core crate never
/// depends on stockbook-infra.
pub struct InstrumentRepository<S: InstrumentStore> {
    store: S,
}

impl<S: InstrumentStore> InstrumentRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// List instruments matching the filter. Annotations are always loaded
    /// eagerly so list views can show them without a follow-up lookup per
    /// record. No result-size cap is applied at this layer.
    pub async fn list_all(&self, filter: &InstrumentFilter) -> Result<Vec<Instrument>, StoreError> {
        self.store.find_all(filter, true).await
    }

    /// Point lookup with annotations loaded. `None` is a normal outcome the
    /// transport layer turns into a not-found response, never an error.
    pub async fn get_by_id(&self, id: InstrumentId) -> Result<Option<Instrument>, StoreError> {
        self.store.find_by_id(id, true).await
    }

    /// Create an instrument. Identity is assigned by the store; monetary
    /// fields are normalized to exactly 2 fractional digits before the
    /// write.
    pub async fn create(&self, fields: InstrumentFields) -> Result<Instrument, StoreError> {
        let created = self.store.insert(&fields.normalized()).await?;
        tracing::debug!(id = %created.id, symbol = %created.symbol, "instrument created");
        Ok(created)
    }

    /// Replace every mutable field of an existing instrument. All-or-nothing
    /// replacement is the entire contract: there is no partial-field merge.
    /// Returns `None` when the target id does not exist.
    pub async fn update(
        &self,
        id: InstrumentId,
        fields: InstrumentFields,
    ) -> Result<Option<Instrument>, StoreError> {
        self.store.update(id, &fields.normalized()).await
    }

    /// Remove an instrument, returning the pre-deletion snapshot. Attached
    /// annotations survive with their back-reference unchanged.
    pub async fn delete(&self, id: InstrumentId) -> Result<Option<Instrument>, StoreError> {
        let deleted = self.store.delete(id).await?;
        if deleted.is_some() {
            tracing::debug!(%id, "instrument deleted");
        }
        Ok(deleted)
    }

    /// Lightweight existence probe, exposed so the annotation repository
    /// can validate a foreign-key target without a full read.
    pub async fn exists(&self, id: InstrumentId) -> Result<bool, StoreError> {
        self.store.exists(id).await
    }
}
