//! Annotation store trait definition.

use stockbook_types::annotation::{Annotation, AnnotationFields, AnnotationId, NewAnnotation};
use stockbook_types::error::StoreError;

/// Store trait for annotation persistence.
///
/// Same contracts as the instrument store: `None` for absence, `StoreError`
/// only for genuine failures.
pub trait AnnotationStore: Send + Sync {
    /// Insert a new annotation. The store assigns a fresh id.
    fn insert(
        &self,
        annotation: &NewAnnotation,
    ) -> impl std::future::Future<Output = Result<Annotation, StoreError>> + Send;

    fn find_by_id(
        &self,
        id: AnnotationId,
    ) -> impl std::future::Future<Output = Result<Option<Annotation>, StoreError>> + Send;

    fn find_all(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<Annotation>, StoreError>> + Send;

    /// Replace title and content. `created_on` and the instrument
    /// back-reference are never written after creation.
    fn update(
        &self,
        id: AnnotationId,
        fields: &AnnotationFields,
    ) -> impl std::future::Future<Output = Result<Option<Annotation>, StoreError>> + Send;

    fn delete(
        &self,
        id: AnnotationId,
    ) -> impl std::future::Future<Output = Result<Option<Annotation>, StoreError>> + Send;
}
