use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;
use sqlx::PgPool;

use super::{LogStore, StoreError};
use crate::maintenance_log::models::LogRecord;

const CREATE_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS maintenance_logs (
    id TEXT PRIMARY KEY,
    title TEXT NOT NULL,
    category TEXT NOT NULL,
    location TEXT NOT NULL,
    description TEXT NOT NULL,
    created_by TEXT NOT NULL,
    timestamp TEXT NOT NULL,
    images JSONB NOT NULL DEFAULT '[]'::jsonb,
    logo_url TEXT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#;

const COLUMNS: &str =
    "id, title, category, location, description, created_by, timestamp, images, logo_url";

#[derive(sqlx::FromRow)]
struct LogRow {
    id: String,
    title: String,
    category: String,
    location: String,
    description: String,
    created_by: String,
    timestamp: String,
    images: Json<Vec<String>>,
    logo_url: Option<String>,
}

impl From<LogRow> for LogRecord {
    fn from(row: LogRow) -> Self {
        LogRecord {
            id: row.id,
            title: row.title,
            category: row.category,
            location: row.location,
            description: row.description,
            created_by: row.created_by,
            timestamp: row.timestamp,
            images: row.images.0,
            logo_url: row.logo_url,
        }
    }
}

pub struct PostgresLogStore {
    pool: PgPool,
}

impl PostgresLogStore {
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(900))
            .connect(database_url)
            .await?;

        let store = Self::from_pool(pool);
        store.ensure_schema().await?;
        Ok(store)
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn ensure_schema(&self) -> Result<(), sqlx::Error> {
        sqlx::query(CREATE_TABLE).execute(&self.pool).await?;
        log::info!("maintenance_logs table ready");
        Ok(())
    }
}

#[async_trait]
impl LogStore for PostgresLogStore {
    async fn insert(&self, record: LogRecord) -> Result<LogRecord, StoreError> {
        let sql = format!(
            "INSERT INTO maintenance_logs ({COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             ON CONFLICT (id) DO NOTHING \
             RETURNING {COLUMNS}"
        );

        let inserted = sqlx::query_as::<_, LogRow>(&sql)
            .bind(&record.id)
            .bind(&record.title)
            .bind(&record.category)
            .bind(&record.location)
            .bind(&record.description)
            .bind(&record.created_by)
            .bind(&record.timestamp)
            .bind(Json(record.images.clone()))
            .bind(record.logo_url.as_deref())
            .fetch_optional(&self.pool)
            .await?;

        match inserted {
            Some(row) => Ok(row.into()),
            None => Err(StoreError::Conflict(record.id)),
        }
    }

    async fn list(&self) -> Result<Vec<LogRecord>, StoreError> {
        let sql = format!("SELECT {COLUMNS} FROM maintenance_logs ORDER BY timestamp DESC, id ASC");
        let rows = sqlx::query_as::<_, LogRow>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(LogRecord::from).collect())
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM maintenance_logs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}
