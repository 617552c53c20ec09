//! # Collection Keys & Typed Codec
//!
//! The fixed collection keys and the central typed encode/decode step.
//!
//! Every load path validates the raw document against its expected shape
//! exactly once, here. Declared serde defaults (on the core types) fill
//! any optional field an older document is missing, so consuming code
//! never has to default-at-use-site.
//!
//! A decode failure surfaces as [`StoreError::Corrupted`] carrying the
//! collection key; the scrubber turns that into a reset-and-count repair
//! at startup, before anything else reads the data.

use serde::de::DeserializeOwned;
use serde::Serialize;

use aescompt_core::{Debt, Product, Supplier, Transaction, UserProfile};

use crate::error::{StoreError, StoreResult};
use crate::kv::KvStore;

// =============================================================================
// Collection Keys
// =============================================================================

/// Ordered sequence of [`Transaction`].
pub const TRANSACTIONS_KEY: &str = "aes_transactions";

/// Ordered sequence of [`Product`].
pub const PRODUCTS_KEY: &str = "aes_products";

/// Ordered sequence of [`Debt`].
pub const DEBTS_KEY: &str = "aes_debts";

/// Ordered sequence of [`Supplier`].
pub const SUPPLIERS_KEY: &str = "aes_suppliers";

/// Single [`UserProfile`], absent if nobody ever signed in.
pub const USER_PROFILE_KEY: &str = "aes_user_profile";

/// The serialized form of an empty collection, used as the repair value.
pub const EMPTY_LIST: &str = "[]";

// =============================================================================
// Typed Collection Store
// =============================================================================

/// Typed access to the named collections.
///
/// Wraps the raw [`KvStore`] and owns all JSON encoding/decoding, so the
/// rest of the crate works with domain types only.
#[derive(Debug, Clone)]
pub struct CollectionStore {
    kv: KvStore,
}

impl CollectionStore {
    /// Creates a typed view over a raw key/value store.
    pub fn new(kv: KvStore) -> Self {
        CollectionStore { kv }
    }

    /// Access to the underlying raw store.
    pub fn kv(&self) -> &KvStore {
        &self.kv
    }

    // -------------------------------------------------------------------------
    // Generic codec helpers
    // -------------------------------------------------------------------------

    /// Loads and decodes a list collection. An absent key decodes as the
    /// empty collection.
    async fn load_list<T: DeserializeOwned>(&self, key: &str) -> StoreResult<Vec<T>> {
        match self.kv.load(key).await? {
            None => Ok(Vec::new()),
            Some(raw) => {
                serde_json::from_str(&raw).map_err(|_| StoreError::corrupted(key))
            }
        }
    }

    /// Encodes and saves a list collection as one whole document.
    async fn save_list<T: Serialize>(&self, key: &str, records: &[T]) -> StoreResult<()> {
        let raw = serde_json::to_string(records)?;
        self.kv.save(key, &raw).await
    }

    // -------------------------------------------------------------------------
    // Transactions
    // -------------------------------------------------------------------------

    pub async fn load_transactions(&self) -> StoreResult<Vec<Transaction>> {
        self.load_list(TRANSACTIONS_KEY).await
    }

    pub async fn save_transactions(&self, records: &[Transaction]) -> StoreResult<()> {
        self.save_list(TRANSACTIONS_KEY, records).await
    }

    // -------------------------------------------------------------------------
    // Products
    // -------------------------------------------------------------------------

    pub async fn load_products(&self) -> StoreResult<Vec<Product>> {
        self.load_list(PRODUCTS_KEY).await
    }

    pub async fn save_products(&self, records: &[Product]) -> StoreResult<()> {
        self.save_list(PRODUCTS_KEY, records).await
    }

    // -------------------------------------------------------------------------
    // Debts
    // -------------------------------------------------------------------------

    pub async fn load_debts(&self) -> StoreResult<Vec<Debt>> {
        self.load_list(DEBTS_KEY).await
    }

    pub async fn save_debts(&self, records: &[Debt]) -> StoreResult<()> {
        self.save_list(DEBTS_KEY, records).await
    }

    // -------------------------------------------------------------------------
    // Suppliers
    // -------------------------------------------------------------------------

    pub async fn load_suppliers(&self) -> StoreResult<Vec<Supplier>> {
        self.load_list(SUPPLIERS_KEY).await
    }

    pub async fn save_suppliers(&self, records: &[Supplier]) -> StoreResult<()> {
        self.save_list(SUPPLIERS_KEY, records).await
    }

    // -------------------------------------------------------------------------
    // User Profile (singleton)
    // -------------------------------------------------------------------------

    /// Loads the singleton profile, `None` when nobody ever signed in.
    pub async fn load_profile(&self) -> StoreResult<Option<UserProfile>> {
        match self.kv.load(USER_PROFILE_KEY).await? {
            None => Ok(None),
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|_| StoreError::corrupted(USER_PROFILE_KEY)),
        }
    }

    pub async fn save_profile(&self, profile: &UserProfile) -> StoreResult<()> {
        let raw = serde_json::to_string(profile)?;
        self.kv.save(USER_PROFILE_KEY, &raw).await
    }

    /// Removes the persisted profile (returns the key to its absent state).
    pub async fn clear_profile(&self) -> StoreResult<()> {
        self.kv.remove(USER_PROFILE_KEY).await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
