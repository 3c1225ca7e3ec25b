use async_trait::async_trait;
use sqlx::{
    migrate::MigrateDatabase,
    sqlite::SqlitePoolOptions,
    Row, Sqlite, SqlitePool,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::AppConfig;
use crate::error::{AppError, AppResult};
use crate::storage::traits::KeyValueStorage;

/// DbConnection manages the key-value table backing all record collections
#[derive(Clone)]
pub struct DbConnection {
    pool: Arc<SqlitePool>,
    /// Maximum total size in bytes of all keys and values
    quota_bytes: usize,
}

impl DbConnection {
    /// Create a new database connection
    pub async fn new(url: &str, quota_bytes: usize) -> AppResult<Self> {
        // Create database if it doesn't exist
        if !Sqlite::database_exists(url).await.unwrap_or(false) {
            info!("Creating database at {}", url);
            Sqlite::create_database(url).await?;
        }

        let pool = SqlitePool::connect(url).await?;
        Self::setup_schema(&pool).await?;

        Ok(Self {
            pool: Arc::new(pool),
            quota_bytes,
        })
    }

    /// Initialize the configured database
    pub async fn init(config: &AppConfig) -> AppResult<Self> {
        Self::new(&config.database_url, config.storage_quota_bytes).await
    }

    /// Private in-memory database, one per call
    pub async fn init_in_memory(quota_bytes: usize) -> AppResult<Self> {
        // A single connection that never expires keeps the in-memory database alive
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;
        Self::setup_schema(&pool).await?;

        Ok(Self {
            pool: Arc::new(pool),
            quota_bytes,
        })
    }

    /// Initialize a test database with the default quota
    #[cfg(test)]
    pub async fn init_test() -> AppResult<Self> {
        Self::init_in_memory(crate::config::DEFAULT_STORAGE_QUOTA_BYTES).await
    }

    /// Set up the required database schema
    async fn setup_schema(pool: &SqlitePool) -> AppResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS key_values (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }

    pub fn quota_bytes(&self) -> usize {
        self.quota_bytes
    }

    /// Bytes used by every entry except `key`
    async fn bytes_used_excluding(&self, key: &str) -> AppResult<usize> {
        let row = sqlx::query(
            "SELECT COALESCE(SUM(LENGTH(CAST(key AS BLOB)) + LENGTH(CAST(value AS BLOB))), 0) AS used \
             FROM key_values WHERE key != ?",
        )
        .bind(key)
        .fetch_one(&*self.pool)
        .await?;

        let used: i64 = row.get("used");
        Ok(used.max(0) as usize)
    }
}

#[async_trait]
impl KeyValueStorage for DbConnection {
    async fn get_item(&self, key: &str) -> AppResult<Option<String>> {
        let row = sqlx::query("SELECT value FROM key_values WHERE key = ?")
            .bind(key)
            .fetch_optional(&*self.pool)
            .await?;

        Ok(row.map(|r| r.get("value")))
    }

    async fn set_item(&self, key: &str, value: &str) -> AppResult<()> {
        let attempted = self.bytes_used_excluding(key).await? + key.len() + value.len();
        if attempted > self.quota_bytes {
            warn!(
                "Refusing write to '{}': {} bytes exceeds quota of {}",
                key, attempted, self.quota_bytes
            );
            return Err(AppError::StorageFull {
                attempted,
                quota: self.quota_bytes,
            });
        }

        sqlx::query("INSERT OR REPLACE INTO key_values (key, value) VALUES (?, ?)")
            .bind(key)
            .bind(value)
            .execute(&*self.pool)
            .await?;
        debug!("Stored {} bytes under '{}'", value.len(), key);
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM key_values WHERE key = ?")
            .bind(key)
            .execute(&*self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_keys(&self) -> AppResult<Vec<String>> {
        let rows = sqlx::query("SELECT key FROM key_values ORDER BY key")
            .fetch_all(&*self.pool)
            .await?;
        Ok(rows.iter().map(|row| row.get("key")).collect())
    }
}
