//! # Persisted Store
//!
//! Durable key-to-text storage for the named collections.
//!
//! ## Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Persisted Store                                  │
//! │                                                                         │
//! │  load(key)  ──► last-written serialized document, or absent            │
//! │  save(key)  ──► overwrites the ENTIRE document (no partial updates)    │
//! │  remove(key)──► document becomes absent                                │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────┐                           │
//! │  │ collections (SQLite table)              │                           │
//! │  │                                         │                           │
//! │  │ aes_transactions │ [{"id":"..",...}..] │                           │
//! │  │ aes_products     │ [{"id":"..",...}..] │                           │
//! │  │ aes_debts        │ [...]               │                           │
//! │  │ aes_suppliers    │ [...]               │                           │
//! │  │ aes_user_profile │ {"id":"..",...}     │                           │
//! │  └─────────────────────────────────────────┘                           │
//! │                                                                         │
//! │  Last writer wins. No locking, no cross-key transaction: a crash       │
//! │  between two saves can leave collections inconsistent with each        │
//! │  other, but each individual document is always written as one          │
//! │  atomic blob.                                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The store never validates content; a document that fails to decode is
//! the scrubber's problem, not this module's.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};

// =============================================================================
// Configuration
// =============================================================================

/// Persisted Store configuration.
///
/// ## Example
/// ```rust,ignore
/// let config = StoreConfig::new("/path/to/aescompt.db")
///     .max_connections(5);
/// ```
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Path to the SQLite database file.
    pub database_path: PathBuf,

    /// Maximum number of connections in the pool.
    /// Default: 5 (sufficient for a single-terminal app)
    pub max_connections: u32,

    /// Minimum number of connections to keep alive.
    /// Default: 1
    pub min_connections: u32,

    /// Connection timeout duration.
    /// Default: 30 seconds
    pub connect_timeout: Duration,

    /// Idle timeout before closing a connection.
    /// Default: 10 minutes
    pub idle_timeout: Duration,
}

impl StoreConfig {
    /// Creates a new store configuration with the given path.
    ///
    /// The database file is created on open if it doesn't exist.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        StoreConfig {
            database_path: path.into(),
            max_connections: 5,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
        }
    }

    /// Sets the maximum number of connections.
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Sets the minimum number of connections.
    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    /// Sets the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Creates an in-memory store configuration (for testing).
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let kv = KvStore::open(StoreConfig::in_memory()).await?;
    /// // Store is isolated, perfect for tests
    /// ```
    pub fn in_memory() -> Self {
        StoreConfig {
            database_path: PathBuf::from(":memory:"),
            max_connections: 1, // In-memory requires single connection
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(60),
        }
    }
}

// =============================================================================
// Key/Value Store
// =============================================================================

/// Handle to the durable key-to-text store.
///
/// ## Usage
/// ```rust,ignore
/// let kv = KvStore::open(StoreConfig::new("./aescompt.db")).await?;
///
/// kv.save("aes_transactions", "[]").await?;
/// let raw = kv.load("aes_transactions").await?; // Some("[]")
/// ```
#[derive(Debug, Clone)]
pub struct KvStore {
    /// The SQLite connection pool.
    pool: SqlitePool,
}

impl KvStore {
    /// Opens the store, creating the database file and schema if needed.
    ///
    /// ## What This Does
    /// 1. Creates the database file if it doesn't exist
    /// 2. Configures SQLite:
    ///    - WAL mode for crash recovery and concurrent reads
    ///    - NORMAL synchronous (balance of safety/speed)
    /// 3. Creates the connection pool
    /// 4. Ensures the single `collections` table exists
    pub async fn open(config: StoreConfig) -> StoreResult<Self> {
        info!(
            path = %config.database_path.display(),
            "Opening persisted store"
        );

        // Build from the path directly: a URL string would mangle paths
        // containing '?' or '#'
        let connect_options = SqliteConnectOptions::new()
            .filename(&config.database_path)
            // WAL mode: better crash recovery, readers don't block the writer
            .journal_mode(SqliteJournalMode::Wal)
            // NORMAL synchronous: data is safe from corruption, may lose
            // the very last write on a power cut
            .synchronous(SqliteSynchronous::Normal)
            .create_if_missing(true);

        debug!("Connection options configured");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.connect_timeout)
            .idle_timeout(Some(config.idle_timeout))
            .connect_with(connect_options)
            .await
            .map_err(|e| StoreError::ConnectionFailed(e.to_string()))?;

        let store = KvStore { pool };
        store.init_schema().await?;

        info!(max_connections = config.max_connections, "Persisted store ready");
        Ok(store)
    }

    /// Creates the key/value table if it doesn't exist.
    ///
    /// A single two-column table is the whole schema, so there is no
    /// versioned migration machinery here - `IF NOT EXISTS` is enough.
    async fn init_schema(&self) -> StoreResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS collections (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Returns the last-written document for `key`, or `None` if the
    /// key was never written (or was removed).
    pub async fn load(&self, key: &str) -> StoreResult<Option<String>> {
        let value: Option<String> =
            sqlx::query_scalar("SELECT value FROM collections WHERE key = ?1")
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;

        debug!(key = %key, present = value.is_some(), "Loaded collection document");
        Ok(value)
    }

    /// Overwrites the entire document stored under `key`.
    ///
    /// Callers must always supply the complete current state of the
    /// collection, never a delta.
    pub async fn save(&self, key: &str, value: &str) -> StoreResult<()> {
        debug!(key = %key, bytes = value.len(), "Saving collection document");

        sqlx::query(
            r#"
            INSERT INTO collections (key, value) VALUES (?1, ?2)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value
            "#,
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Removes the document stored under `key`. Removing an absent key
    /// is a no-op.
    pub async fn remove(&self, key: &str) -> StoreResult<()> {
        debug!(key = %key, "Removing collection document");

        sqlx::query("DELETE FROM collections WHERE key = ?1")
            .bind(key)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Checks if the store is healthy (can execute queries).
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }

    /// Closes the connection pool.
    ///
    /// After calling close, all store operations will fail.
    pub async fn close(&self) {
        info!("Closing persisted store");
        self.pool.close().await;
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_store() {
        let kv = KvStore::open(StoreConfig::in_memory()).await.unwrap();
        assert!(kv.health_check().await);
    }

    #[tokio::test]
    async fn test_load_absent_key() {
        let kv = KvStore::open(StoreConfig::in_memory()).await.unwrap();
        assert_eq!(kv.load("aes_transactions").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let kv = KvStore::open(StoreConfig::in_memory()).await.unwrap();

        kv.save("aes_products", "[]").await.unwrap();
        assert_eq!(kv.load("aes_products").await.unwrap().as_deref(), Some("[]"));
    }

    #[tokio::test]
    async fn test_save_overwrites_whole_document() {
        let kv = KvStore::open(StoreConfig::in_memory()).await.unwrap();

        kv.save("aes_debts", r#"[{"id":"a"}]"#).await.unwrap();
        kv.save("aes_debts", r#"[{"id":"b"}]"#).await.unwrap();

        // Last writer wins, nothing is merged
        assert_eq!(
            kv.load("aes_debts").await.unwrap().as_deref(),
            Some(r#"[{"id":"b"}]"#)
        );
    }

    #[tokio::test]
    async fn test_remove() {
        let kv = KvStore::open(StoreConfig::in_memory()).await.unwrap();

        kv.save("aes_user_profile", "{}").await.unwrap();
        kv.remove("aes_user_profile").await.unwrap();
        assert_eq!(kv.load("aes_user_profile").await.unwrap(), None);

        // Removing an absent key is fine
        kv.remove("aes_user_profile").await.unwrap();
    }

    #[tokio::test]
    async fn test_open_path_with_url_special_characters() {
        // '?' and '#' are ordinary filename characters on disk; opening
        // must not treat them as URL syntax
        let path = std::env::temp_dir().join("aescompt-kv?check#.db");
        let _ = std::fs::remove_file(&path);

        let kv = KvStore::open(StoreConfig::new(&path)).await.unwrap();
        kv.save("aes_products", "[]").await.unwrap();
        assert_eq!(
            kv.load("aes_products").await.unwrap().as_deref(),
            Some("[]")
        );
        kv.close().await;

        for suffix in ["", "-wal", "-shm"] {
            let _ = std::fs::remove_file(format!("{}{suffix}", path.display()));
        }
    }

    #[test]
    fn test_config_builder() {
        let config = StoreConfig::new("/tmp/test.db")
            .max_connections(10)
            .min_connections(2);

        assert_eq!(config.max_connections, 10);
        assert_eq!(config.min_connections, 2);
    }
}
