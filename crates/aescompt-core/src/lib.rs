//! # aescompt-core: Pure Business Logic for AESCOMPT
//!
//! This crate is the **heart** of AESCOMPT, a point-of-sale and
//! small-business management system. It contains all business logic as
//! pure functions and types with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       AESCOMPT Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    UI Shell (out of scope)                      │   │
//! │  │    Dashboard ──► Inventory ──► Debts ──► Suppliers ──► Admin   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    aescompt-store                               │   │
//! │  │    AppStore, Persisted Store (SQLite KV), Scrubber, Audit       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ aescompt-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │    ids    │  │ validation│  │   │
//! │  │   │Transaction│  │   Money   │  │  UUID v4  │  │   rules   │  │   │
//! │  │   │ Debt, ... │  │ (francs)  │  │           │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Transaction, Product, Debt, Supplier, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`ids`] - Record identity generation
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are whole CFA francs (i64)
//! 4. **Explicit Errors**: All errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod ids;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use aescompt_core::Money` instead of
// `use aescompt_core::money::Money`

pub use error::{CoreError, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Default category applied to a transaction recorded without one.
///
/// ## Business Reason
/// Walk-in counter sales are the overwhelmingly common case; cashiers
/// should not have to pick a category for every sale.
pub const DEFAULT_TRANSACTION_CATEGORY: &str = "Vente Directe";

/// Default payment method applied to a transaction recorded without one.
pub const DEFAULT_PAYMENT_METHOD: &str = "Cash";

/// Default category for new products.
pub const DEFAULT_PRODUCT_CATEGORY: &str = "Général";

/// Default unit label for new products.
pub const DEFAULT_PRODUCT_UNIT: &str = "pcs";

/// Default minimum-stock threshold for new products.
///
/// ## Business Reason
/// Small shops restock in small batches; five units is a sensible
/// low-stock alarm level for a product whose owner never set one.
pub const DEFAULT_MIN_STOCK: i64 = 5;

/// Maximum length accepted for names and free-text descriptions.
pub const MAX_TEXT_LEN: usize = 200;
