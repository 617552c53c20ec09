//! # AESCOMPT Store
//!
//! Durable storage and canonical application state for the AESCOMPT
//! business management core.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         aescompt-store                                  │
//! │                                                                         │
//! │  ┌───────────────┐     owns      ┌────────────────────────────────┐    │
//! │  │   AppStore    │──────────────►│  in-memory collections         │    │
//! │  │  (store.rs)   │               │  transactions / products /     │    │
//! │  └───────┬───────┘               │  debts / suppliers / profile   │    │
//! │          │ write-through         └────────────────────────────────┘    │
//! │          ▼                                                              │
//! │  ┌───────────────┐    typed      ┌────────────────────────────────┐    │
//! │  │CollectionStore│──────────────►│  KvStore (kv.rs)               │    │
//! │  │(collections.rs)│   codec      │  SQLite, one key/value table   │    │
//! │  └───────────────┘               └────────────────────────────────┘    │
//! │          ▲                                                              │
//! │          │ heals before first load                                      │
//! │  ┌───────────────┐               ┌────────────────────────────────┐    │
//! │  │   Scrubber    │──────────────►│  AuditTrail (audit.rs)         │    │
//! │  │ (scrubber.rs) │  one entry    │  session log, newest first     │    │
//! │  └───────────────┘               └────────────────────────────────┘    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Domain types live in `aescompt-core`; this crate adds everything that
//! touches I/O.

pub mod audit;
pub mod collections;
pub mod error;
pub mod kv;
pub mod scrubber;
pub mod store;

// Re-export the working surface
pub use audit::{AuditSink, AuditTrail};
pub use collections::{
    CollectionStore, DEBTS_KEY, EMPTY_LIST, PRODUCTS_KEY, SUPPLIERS_KEY, TRANSACTIONS_KEY,
    USER_PROFILE_KEY,
};
pub use error::{StoreError, StoreResult};
pub use kv::{KvStore, StoreConfig};
pub use scrubber::{heal, scrub};
pub use store::{AppStore, NewDebt, NewProduct, NewSupplier, NewTransaction, NewUser};
