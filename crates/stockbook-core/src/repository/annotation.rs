//! Annotation repository, peer of the instrument repository against the
//! same backing store.

use std::sync::Arc;

use chrono::Utc;

use crate::repository::instrument::InstrumentRepository;
use crate::store::annotation::AnnotationStore;
use crate::store::instrument::InstrumentStore;
use stockbook_types::annotation::{Annotation, AnnotationFields, AnnotationId, NewAnnotation};
use stockbook_types::error::{AnnotationError, StoreError};
use stockbook_types::instrument::InstrumentId;

/// Repository mediating transport requests into annotation store
/// operations. Holds a shared handle to the instrument repository for the
/// one designed cross-entity coupling point: probing that a foreign-key
/// target exists before attaching a new annotation.
pub struct AnnotationRepository<A: AnnotationStore, S: InstrumentStore> {
    store: A,
    instruments: Arc<InstrumentRepository<S>>,
}

impl<A: AnnotationStore, S: InstrumentStore> AnnotationRepository<A, S> {
    pub fn new(store: A, instruments: Arc<InstrumentRepository<S>>) -> Self {
        Self { store, instruments }
    }

    pub async fn list_all(&self) -> Result<Vec<Annotation>, StoreError> {
        self.store.find_all().await
    }

    pub async fn get_by_id(&self, id: AnnotationId) -> Result<Option<Annotation>, StoreError> {
        self.store.find_by_id(id).await
    }

    /// Attach a new annotation to an instrument. The target is probed via
    /// the instrument repository's `exists` rather than a full read; a
    /// missing target is a distinct failure, not a store error.
    pub async fn create(
        &self,
        instrument_id: InstrumentId,
        fields: AnnotationFields,
    ) -> Result<Annotation, AnnotationError> {
        if !self.instruments.exists(instrument_id).await? {
            return Err(AnnotationError::InstrumentMissing);
        }

        let annotation = NewAnnotation {
            title: fields.title,
            content: fields.content,
            created_on: Utc::now(),
            instrument_id: Some(instrument_id),
        };

        let created = self.store.insert(&annotation).await?;
        tracing::debug!(id = %created.id, instrument = %instrument_id, "annotation created");
        Ok(created)
    }

    /// Replace title and content. `created_on` and the instrument
    /// back-reference stay as they were at creation.
    pub async fn update(
        &self,
        id: AnnotationId,
        fields: AnnotationFields,
    ) -> Result<Option<Annotation>, StoreError> {
        self.store.update(id, &fields).await
    }

    pub async fn delete(&self, id: AnnotationId) -> Result<Option<Annotation>, StoreError> {
        self.store.delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicI64, Ordering};
    use stockbook_types::instrument::{Instrument, InstrumentFields};

    use crate::store::instrument::InstrumentFilter;

    /// Instrument store stub: only the existence probe is exercised by
    /// these tests, everything else reports misuse.
    struct ExistsOnlyInstrumentStore {
        present: Mutex<HashSet<i64>>,
    }

    impl ExistsOnlyInstrumentStore {
        fn with(ids: &[i64]) -> Self {
            Self {
                present: Mutex::new(ids.iter().copied().collect()),
            }
        }
    }

    impl InstrumentStore for ExistsOnlyInstrumentStore {
        async fn insert(&self, _fields: &InstrumentFields) -> Result<Instrument, StoreError> {
            Err(StoreError::Query("not used in this test".to_string()))
        }

        async fn find_by_id(
            &self,
            _id: InstrumentId,
            _include_annotations: bool,
        ) -> Result<Option<Instrument>, StoreError> {
            Err(StoreError::Query("not used in this test".to_string()))
        }

        async fn find_all(
            &self,
            _filter: &InstrumentFilter,
            _include_annotations: bool,
        ) -> Result<Vec<Instrument>, StoreError> {
            Err(StoreError::Query("not used in this test".to_string()))
        }

        async fn update(
            &self,
            _id: InstrumentId,
            _fields: &InstrumentFields,
        ) -> Result<Option<Instrument>, StoreError> {
            Err(StoreError::Query("not used in this test".to_string()))
        }

        async fn delete(&self, _id: InstrumentId) -> Result<Option<Instrument>, StoreError> {
            Err(StoreError::Query("not used in this test".to_string()))
        }

        async fn exists(&self, id: InstrumentId) -> Result<bool, StoreError> {
            Ok(self.present.lock().unwrap().contains(&id.0))
        }
    }

    struct MemoryAnnotationStore {
        records: Mutex<Vec<Annotation>>,
        next_id: AtomicI64,
    }

    impl MemoryAnnotationStore {
        fn new() -> Self {
            Self {
                records: Mutex::new(Vec::new()),
                next_id: AtomicI64::new(1),
            }
        }
    }

    impl AnnotationStore for MemoryAnnotationStore {
        async fn insert(&self, annotation: &NewAnnotation) -> Result<Annotation, StoreError> {
            let id = AnnotationId(self.next_id.fetch_add(1, Ordering::SeqCst));
            let record = Annotation {
                id,
                title: annotation.title.clone(),
                content: annotation.content.clone(),
                created_on: annotation.created_on,
                instrument_id: annotation.instrument_id,
            };
            self.records.lock().unwrap().push(record.clone());
            Ok(record)
        }

        async fn find_by_id(&self, id: AnnotationId) -> Result<Option<Annotation>, StoreError> {
            Ok(self
                .records
                .lock()
                .unwrap()
                .iter()
                .find(|a| a.id == id)
                .cloned())
        }

        async fn find_all(&self) -> Result<Vec<Annotation>, StoreError> {
            Ok(self.records.lock().unwrap().clone())
        }

        async fn update(
            &self,
            id: AnnotationId,
            fields: &AnnotationFields,
        ) -> Result<Option<Annotation>, StoreError> {
            let mut records = self.records.lock().unwrap();
            match records.iter_mut().find(|a| a.id == id) {
                Some(record) => {
                    record.title = fields.title.clone();
                    record.content = fields.content.clone();
                    Ok(Some(record.clone()))
                }
                None => Ok(None),
            }
        }

        async fn delete(&self, id: AnnotationId) -> Result<Option<Annotation>, StoreError> {
            let mut records = self.records.lock().unwrap();
            match records.iter().position(|a| a.id == id) {
                Some(pos) => Ok(Some(records.remove(pos))),
                None => Ok(None),
            }
        }
    }

    fn repo(
        instrument_ids: &[i64],
    ) -> AnnotationRepository<MemoryAnnotationStore, ExistsOnlyInstrumentStore> {
        let instruments = Arc::new(InstrumentRepository::new(ExistsOnlyInstrumentStore::with(
            instrument_ids,
        )));
        AnnotationRepository::new(MemoryAnnotationStore::new(), instruments)
    }

    fn fields(title: &str) -> AnnotationFields {
        AnnotationFields {
            title: title.to_string(),
            content: "Guidance raised for Q3.".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_sets_created_on_and_back_reference() {
        let repo = repo(&[1]);
        let created = repo.create(InstrumentId(1), fields("Earnings call")).await.unwrap();
        assert_eq!(created.instrument_id, Some(InstrumentId(1)));
        assert_eq!(created.title, "Earnings call");
    }

    #[tokio::test]
    async fn test_create_against_missing_instrument_is_rejected() {
        let repo = repo(&[1]);
        let err = repo.create(InstrumentId(2), fields("Earnings call")).await.unwrap_err();
        assert!(matches!(err, AnnotationError::InstrumentMissing));
    }

    #[tokio::test]
    async fn test_update_preserves_created_on_and_back_reference() {
        let repo = repo(&[1]);
        let created = repo.create(InstrumentId(1), fields("Earnings call")).await.unwrap();

        let updated = repo
            .update(created.id, fields("Revised note"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.title, "Revised note");
        assert_eq!(updated.created_on, created.created_on);
        assert_eq!(updated.instrument_id, created.instrument_id);
    }

    #[tokio::test]
    async fn test_update_missing_returns_none() {
        let repo = repo(&[1]);
        let result = repo.update(AnnotationId(404), fields("whatever")).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_delete_then_get_returns_none() {
        let repo = repo(&[1]);
        let created = repo.create(InstrumentId(1), fields("Earnings call")).await.unwrap();

        let deleted = repo.delete(created.id).await.unwrap().unwrap();
        assert_eq!(deleted.id, created.id);
        assert!(repo.get_by_id(created.id).await.unwrap().is_none());
        assert!(repo.delete(created.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_all_returns_every_annotation() {
        let repo = repo(&[1, 2]);
        repo.create(InstrumentId(1), fields("First")).await.unwrap();
        repo.create(InstrumentId(2), fields("Second")).await.unwrap();

        let all = repo.list_all().await.unwrap();
        assert_eq!(all.len(), 2);
    }
}
