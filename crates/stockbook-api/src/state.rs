//! Application state wiring the repositories together.
//!
//! Repositories are generic over the store traits, but AppState pins them
//! to the concrete SQLite implementations. A single shared database handle
//! is injected into each repository at construction; nothing is global.

use std::path::Path;
use std::sync::Arc;

use stockbook_core::repository::annotation::AnnotationRepository;
use stockbook_core::repository::instrument::InstrumentRepository;
use stockbook_infra::config::load_config;
use stockbook_infra::sqlite::annotation::SqliteAnnotationStore;
use stockbook_infra::sqlite::instrument::SqliteInstrumentStore;
use stockbook_infra::sqlite::pool::DatabasePool;
use stockbook_types::config::AppConfig;

/// Concrete type aliases for the repository generics pinned to the SQLite
/// stores.
pub type ConcreteInstrumentRepository = InstrumentRepository<SqliteInstrumentStore>;
pub type ConcreteAnnotationRepository =
    AnnotationRepository<SqliteAnnotationStore, SqliteInstrumentStore>;

/// Shared application state handed to every request handler.
#[derive(Clone)]
pub struct AppState {
    pub instruments: Arc<ConcreteInstrumentRepository>,
    pub annotations: Arc<ConcreteAnnotationRepository>,
    pub config: AppConfig,
    pub db_pool: DatabasePool,
}

impl AppState {
    /// Initialize the application state: connect to the database, run
    /// migrations, wire the repositories.
    pub async fn init(data_dir: &Path) -> anyhow::Result<Self> {
        tokio::fs::create_dir_all(data_dir).await?;

        let db_url = format!(
            "sqlite://{}?mode=rwc",
            data_dir.join("stockbook.db").display()
        );
        let db_pool = DatabasePool::new(&db_url).await?;

        let instruments = Arc::new(InstrumentRepository::new(SqliteInstrumentStore::new(
            db_pool.clone(),
        )));
        let annotations = Arc::new(AnnotationRepository::new(
            SqliteAnnotationStore::new(db_pool.clone()),
            Arc::clone(&instruments),
        ));

        let config = load_config(data_dir).await;

        Ok(Self {
            instruments,
            annotations,
            config,
            db_pool,
        })
    }
}
