//! Database module - AppState and the maintenance log store
//!
//! - `memory` - process-local store used when no database is configured
//! - `postgres` - PostgreSQL store backed by sqlx

mod memory;
mod postgres;

pub use memory::MemoryLogStore;
pub use postgres::PostgresLogStore;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::AppConfig;
use crate::maintenance_log::models::LogRecord;
use crate::report::{LogoFetcher, ReportComposer};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("log '{0}' already exists")]
    Conflict(String),
    #[error("log '{0}' not found")]
    NotFound(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Keyed storage for maintenance logs.
///
/// `insert` must be atomic with respect to the uniqueness of `id`: of two
/// concurrent inserts with the same id exactly one succeeds.
#[async_trait]
pub trait LogStore: Send + Sync {
    async fn insert(&self, record: LogRecord) -> Result<LogRecord, StoreError>;

    /// All logs, newest `timestamp` first.
    async fn list(&self) -> Result<Vec<LogRecord>, StoreError>;

    async fn delete(&self, id: &str) -> Result<(), StoreError>;

    async fn close(&self) {}

    fn backend(&self) -> &'static str;
}

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn LogStore>,
    pub fetcher: LogoFetcher,
    pub composer: Arc<ReportComposer>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub async fn new_with_config(config: AppConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let store: Arc<dyn LogStore> = match config.database_url.as_deref() {
            Some(url) => Arc::new(
                PostgresLogStore::connect(url, config.database_max_connections).await?,
            ),
            None => {
                log::warn!("DATABASE_URL is not set, maintenance logs are kept in memory only");
                Arc::new(MemoryLogStore::new())
            }
        };

        Self::new_with_store(config, store)
    }

    pub fn new_with_store(
        config: AppConfig,
        store: Arc<dyn LogStore>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let fetcher = LogoFetcher::new(config.logo_fetch_timeout)?;
        let composer = Arc::new(ReportComposer::new(config.report_style.clone()));

        log::info!("Using {} log store", store.backend());

        Ok(AppState {
            store,
            fetcher,
            composer,
            config: Arc::new(config),
        })
    }
}
