//! # Store Error Types
//!
//! Error types for persistence operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  SQLite Error (sqlx::Error)                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreError (this module) ← Adds context and categorization            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Caller (UI shell) displays user-friendly message                      │
//! │                                                                         │
//! │  NOTE: A decode failure of a persisted document is Corrupted, and      │
//! │  is a *repairable* condition handled by the scrubber - it is never     │
//! │  allowed to halt application startup.                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use aescompt_core::CoreError;

/// Persistence operation errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Storage medium could not be opened.
    ///
    /// ## When This Occurs
    /// - Database file doesn't exist and can't be created
    /// - File permissions issue
    /// - Disk full
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// A persisted document failed to decode as its expected shape.
    ///
    /// During normal operation this never escapes: the scrubber runs
    /// before anything else reads the collections and converts it into
    /// a reset-and-count repair.
    #[error("Corrupted collection: {key}")]
    Corrupted { key: String },

    /// Encoding an in-memory collection to JSON failed.
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// A domain rule was violated by the requested mutation.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Internal storage error.
    #[error("Internal store error: {0}")]
    Internal(String),
}

impl StoreError {
    /// Creates a Corrupted error for a given collection key.
    pub fn corrupted(key: impl Into<String>) -> Self {
        StoreError::Corrupted { key: key.into() }
    }
}

/// Convert sqlx errors to StoreError.
impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut => StoreError::PoolExhausted,
            sqlx::Error::PoolClosed => StoreError::ConnectionFailed("Pool is closed".to_string()),
            sqlx::Error::Database(db_err) => StoreError::QueryFailed(db_err.message().to_string()),
            _ => StoreError::Internal(err.to_string()),
        }
    }
}

/// Result type for persistence operations.
pub type StoreResult<T> = Result<T, StoreError>;
