//! SQLite storage layer.
//!
//! Store implementations backed by SQLite with WAL mode and split
//! read/write connection pools.

pub mod annotation;
pub mod instrument;
pub mod pool;

use stockbook_types::error::StoreError;

/// Map a sqlx error onto the store taxonomy: connectivity problems become
/// `Unavailable`, everything else is a query failure.
pub(crate) fn map_store_err(err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Io(_) | sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
            StoreError::Unavailable
        }
        other => StoreError::Query(other.to_string()),
    }
}
