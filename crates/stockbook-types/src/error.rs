use thiserror::Error;

/// Errors surfaced by the backing store.
///
/// Absence of a record is deliberately not represented here: lookups return
/// `Option`, and update/delete report a missing target as `None`. Only
/// genuine failures become errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing medium cannot be reached or committed to. Fatal to the
    /// current request; never retried or swallowed.
    #[error("store unavailable")]
    Unavailable,

    /// A query failed for a reason other than connectivity.
    #[error("query error: {0}")]
    Query(String),
}

/// Errors from annotation operations beyond plain store failures.
#[derive(Debug, Error)]
pub enum AnnotationError {
    /// The target instrument of a new annotation does not exist.
    #[error("instrument does not exist")]
    InstrumentMissing,

    #[error(transparent)]
    Store(#[from] StoreError),
}
