//! SQLite connection pools for the instrument and annotation tables.
//!
//! Two pools over one database file: a single-connection writer that
//! serializes every INSERT/UPDATE/DELETE, and a read-only pool that serves
//! SELECTs concurrently. Every mutation in this crate is a single statement,
//! so with writes funneled through one connection a reader sees an
//! instrument either before or after an update, never a half-replaced row.
//! WAL journaling keeps readers from blocking the writer.

use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};

/// How long a connection waits on a locked database before giving up.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Connections kept for concurrent SELECTs.
const READER_CONNECTIONS: u32 = 8;

/// Paired pools over the stockbook database.
#[derive(Clone)]
pub struct DatabasePool {
    /// Read-only pool serving point lookups and list scans.
    pub reader: SqlitePool,
    /// Single connection through which every mutation is funneled.
    pub writer: SqlitePool,
}

impl DatabasePool {
    /// Open both pools against `database_url` and bring the schema up to
    /// date.
    ///
    /// The writer connects first and applies migrations, so the instruments
    /// and annotations tables exist before any reader can touch them. The
    /// schema declares no foreign key from annotations to instruments and
    /// nothing here switches enforcement on, which is what lets an
    /// annotation outlive the instrument it points at.
    pub async fn new(database_url: &str) -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(BUSY_TIMEOUT);

        let writer = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options.clone())
            .await?;
        sqlx::migrate!("../../migrations").run(&writer).await?;

        let reader = SqlitePoolOptions::new()
            .max_connections(READER_CONNECTIONS)
            .connect_with(options.read_only(true))
            .await?;

        Ok(Self { reader, writer })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn open_pool(name: &str) -> DatabasePool {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}?mode=rwc", dir.path().join(name).display());
        // Leak tempdir so the database file outlives this helper
        std::mem::forget(dir);
        DatabasePool::new(&url).await.unwrap()
    }

    #[tokio::test]
    async fn test_migrations_create_both_tables() {
        let pool = open_pool("schema.db").await;

        for table in ["instruments", "annotations"] {
            let found: bool = sqlx::query_scalar(
                "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?)",
            )
            .bind(table)
            .fetch_one(&pool.reader)
            .await
            .unwrap();
            assert!(found, "{table} table missing");
        }
    }

    #[tokio::test]
    async fn test_journal_mode_is_wal() {
        let pool = open_pool("journal.db").await;

        let mode: String = sqlx::query_scalar("PRAGMA journal_mode")
            .fetch_one(&pool.writer)
            .await
            .unwrap();
        assert_eq!(mode.to_lowercase(), "wal");
    }

    #[tokio::test]
    async fn test_reader_pool_rejects_writes() {
        let pool = open_pool("readonly.db").await;

        let result = sqlx::query(
            "INSERT INTO annotations (title, content, created_on) VALUES ('a', 'b', 'c')",
        )
        .execute(&pool.reader)
        .await;
        assert!(result.is_err(), "reader pool accepted a write");
    }
}
