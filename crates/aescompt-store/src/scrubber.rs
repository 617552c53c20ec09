//! # Integrity Scrubber
//!
//! One-shot startup routine that restores the Persisted Store to a
//! well-formed state before the rest of the system reads it, and reports
//! what it fixed.
//!
//! ## Algorithm
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Startup Integrity Pass                             │
//! │                                                                         │
//! │  For each collection key:                                              │
//! │       │                                                                 │
//! │       ├── absent? ──────────────► nothing to check                     │
//! │       │                                                                 │
//! │       ├── decodes cleanly? ─────► leave untouched                      │
//! │       │                                                                 │
//! │       └── corrupted? ───────────► reset to empty, repairs += 1         │
//! │                                                                         │
//! │  Then, transactions only:                                              │
//! │       │                                                                 │
//! │       └── duplicate identities? ► deduplicate (last-seen-wins),        │
//! │                                   rewrite, repairs += 1                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  repairs > 0 ──► exactly ONE medium-severity "Système" audit entry     │
//! │  repairs = 0 ──► silence                                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Failure Semantics
//! Nothing here is allowed to halt application startup. A document that
//! fails to decode is converted into the reset-and-count outcome for that
//! collection only; one collection's corruption never blocks scrubbing of
//! the others. Resetting favors availability: losing one unreadable
//! collection is judged safer than refusing to start.
//!
//! ## Idempotence
//! Repeated runs on healthy data are no-ops (the count stays zero), so
//! the pass runs unconditionally on every startup.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use aescompt_core::{Debt, Product, Severity, Supplier, Transaction, UserProfile};

use crate::audit::AuditSink;
use crate::collections::{
    DEBTS_KEY, EMPTY_LIST, PRODUCTS_KEY, SUPPLIERS_KEY, TRANSACTIONS_KEY, USER_PROFILE_KEY,
};
use crate::error::StoreResult;
use crate::kv::KvStore;

// =============================================================================
// Scrub Pass
// =============================================================================

/// Runs the full integrity pass and returns the total repair count.
///
/// Covers every collection key: the four list collections get a shape
/// check with reset-to-empty repair, the profile key gets a shape check
/// with reset-to-absent repair, and the transactions collection
/// additionally gets identity deduplication.
pub async fn scrub(kv: &KvStore) -> StoreResult<u32> {
    debug!("Starting integrity pass");
    let mut repairs: u32 = 0;

    repair_list::<Transaction>(kv, TRANSACTIONS_KEY, &mut repairs).await?;
    repair_list::<Product>(kv, PRODUCTS_KEY, &mut repairs).await?;
    repair_list::<Debt>(kv, DEBTS_KEY, &mut repairs).await?;
    repair_list::<Supplier>(kv, SUPPLIERS_KEY, &mut repairs).await?;
    repair_profile(kv, &mut repairs).await?;

    repair_duplicate_transactions(kv, &mut repairs).await?;

    debug!(repairs, "Integrity pass complete");
    Ok(repairs)
}

/// Runs [`scrub`] and reports the outcome to the audit sink.
///
/// ## Caller Contract
/// Emits exactly one `medium`-severity entry with action `"Système"`
/// when anything was repaired; a fully healthy store produces no entry
/// at all.
pub async fn heal(kv: &KvStore, audit: &mut dyn AuditSink) -> StoreResult<u32> {
    let repaired = scrub(kv).await?;

    if repaired > 0 {
        info!(repaired, "Integrity pass repaired anomalies");
        audit.record(
            "Système",
            &format!("L'audit d'intégrité a réparé {repaired} anomalies structurelles."),
            Severity::Medium,
        );
    }

    Ok(repaired)
}

// =============================================================================
// Repair Steps
// =============================================================================

/// Checks one list collection; resets it to the empty sequence when its
/// document does not decode as a list of `T`.
async fn repair_list<T: DeserializeOwned>(
    kv: &KvStore,
    key: &str,
    repairs: &mut u32,
) -> StoreResult<()> {
    if let Some(raw) = kv.load(key).await? {
        if serde_json::from_str::<Vec<T>>(&raw).is_err() {
            warn!(key = %key, "Corrupted collection detected, resetting to empty");
            kv.save(key, EMPTY_LIST).await?;
            *repairs += 1;
        }
    }

    Ok(())
}

/// Checks the singleton profile; removes the key when its document does
/// not decode (absent is the profile's empty state).
async fn repair_profile(kv: &KvStore, repairs: &mut u32) -> StoreResult<()> {
    if let Some(raw) = kv.load(USER_PROFILE_KEY).await? {
        if serde_json::from_str::<UserProfile>(&raw).is_err() {
            warn!(key = USER_PROFILE_KEY, "Corrupted profile detected, resetting to absent");
            kv.remove(USER_PROFILE_KEY).await?;
            *repairs += 1;
        }
    }

    Ok(())
}

/// Collapses duplicate transaction identities, rewriting the collection
/// only when duplicates were actually found.
async fn repair_duplicate_transactions(kv: &KvStore, repairs: &mut u32) -> StoreResult<()> {
    let Some(raw) = kv.load(TRANSACTIONS_KEY).await? else {
        return Ok(());
    };

    // The shape was repaired above; a residual parse failure here means
    // the reset itself failed to stick, so just leave it alone.
    let Ok(records) = serde_json::from_str::<Vec<Transaction>>(&raw) else {
        return Ok(());
    };

    let before = records.len();
    let unique = dedup_by_id(records);

    if unique.len() != before {
        warn!(
            before,
            after = unique.len(),
            "Duplicate transaction identities collapsed"
        );
        kv.save(TRANSACTIONS_KEY, &serde_json::to_string(&unique)?)
            .await?;
        *repairs += 1;
    }

    Ok(())
}

// =============================================================================
// Deduplication
// =============================================================================

/// Collapses duplicate identities in a transaction sequence.
///
/// ## Policy
/// Last-seen-wins for the record's *values*, first-occurrence order for
/// the record's *position*: walking the input in order, a repeated
/// identity overwrites the earlier record in place instead of moving it.
///
/// ## Example
/// Input `[A1(v1), A1(v2), B2]` becomes `[A1(v2), B2]`.
pub fn dedup_by_id(records: Vec<Transaction>) -> Vec<Transaction> {
    let mut slots: HashMap<String, usize> = HashMap::with_capacity(records.len());
    let mut unique: Vec<Transaction> = Vec::with_capacity(records.len());

    for record in records {
        match slots.get(&record.id) {
            Some(&slot) => unique[slot] = record,
            None => {
                slots.insert(record.id.clone(), unique.len());
                unique.push(record);
            }
        }
    }

    unique
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::AuditTrail;
    use crate::kv::StoreConfig;
    use aescompt_core::{Money, TransactionType};
    use chrono::Utc;

    async fn store() -> KvStore {
        KvStore::open(StoreConfig::in_memory()).await.unwrap()
    }

    fn tx(id: &str, amount: i64) -> Transaction {
        Transaction {
            id: id.to_string(),
            date: Utc::now(),
            kind: TransactionType::Sale,
            amount: Money::from_francs(amount),
            description: "Vente comptoir".to_string(),
            category: "Vente Directe".to_string(),
            payment_method: "Cash".to_string(),
            customer_name: None,
            discount: None,
            tax_amount: None,
        }
    }

    fn encode(records: &[Transaction]) -> String {
        serde_json::to_string(records).unwrap()
    }

    // -------------------------------------------------------------------------
    // Deduplication policy
    // -------------------------------------------------------------------------

    #[test]
    fn test_dedup_keeps_last_seen_in_first_position() {
        let records = vec![tx("A1", 100), tx("A1", 500), tx("B2", 200)];
        let unique = dedup_by_id(records);

        assert_eq!(unique.len(), 2);
        // First-occurrence order, last-seen values
        assert_eq!(unique[0].id, "A1");
        assert_eq!(unique[0].amount, Money::from_francs(500));
        assert_eq!(unique[1].id, "B2");
        assert_eq!(unique[1].amount, Money::from_francs(200));
    }

    #[test]
    fn test_dedup_no_duplicates_is_identity() {
        let records = vec![tx("A1", 100), tx("B2", 200), tx("C3", 300)];
        let unique = dedup_by_id(records.clone());
        assert_eq!(unique, records);
    }

    #[test]
    fn test_dedup_empty() {
        assert!(dedup_by_id(Vec::new()).is_empty());
    }

    // -------------------------------------------------------------------------
    // Corruption recovery
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_corrupted_list_resets_to_empty() {
        let kv = store().await;
        kv.save(PRODUCTS_KEY, "{definitely not json").await.unwrap();

        let repairs = scrub(&kv).await.unwrap();

        assert_eq!(repairs, 1);
        assert_eq!(kv.load(PRODUCTS_KEY).await.unwrap().as_deref(), Some("[]"));
    }

    #[tokio::test]
    async fn test_each_corrupted_key_counts_once() {
        let kv = store().await;
        kv.save(TRANSACTIONS_KEY, "oops").await.unwrap();
        kv.save(DEBTS_KEY, "42").await.unwrap(); // valid JSON, wrong shape
        kv.save(SUPPLIERS_KEY, "{}").await.unwrap();

        let repairs = scrub(&kv).await.unwrap();

        assert_eq!(repairs, 3);
        for key in [TRANSACTIONS_KEY, DEBTS_KEY, SUPPLIERS_KEY] {
            assert_eq!(kv.load(key).await.unwrap().as_deref(), Some("[]"));
        }
    }

    #[tokio::test]
    async fn test_corrupted_profile_resets_to_absent() {
        let kv = store().await;
        kv.save(USER_PROFILE_KEY, r#"["this","is","no","profile"]"#)
            .await
            .unwrap();

        let repairs = scrub(&kv).await.unwrap();

        assert_eq!(repairs, 1);
        assert_eq!(kv.load(USER_PROFILE_KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_one_corruption_does_not_block_others() {
        let kv = store().await;
        kv.save(TRANSACTIONS_KEY, "broken").await.unwrap();
        kv.save(PRODUCTS_KEY, "[]").await.unwrap(); // healthy

        let repairs = scrub(&kv).await.unwrap();

        assert_eq!(repairs, 1);
        // Healthy neighbor untouched
        assert_eq!(kv.load(PRODUCTS_KEY).await.unwrap().as_deref(), Some("[]"));
    }

    // -------------------------------------------------------------------------
    // End-to-end scenario
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_duplicate_identities_collapsed_in_store() {
        let kv = store().await;
        kv.save(
            TRANSACTIONS_KEY,
            &encode(&[tx("A1", 100), tx("A1", 500), tx("B2", 200)]),
        )
        .await
        .unwrap();

        let repairs = scrub(&kv).await.unwrap();
        assert_eq!(repairs, 1);

        let raw = kv.load(TRANSACTIONS_KEY).await.unwrap().unwrap();
        let records: Vec<Transaction> = serde_json::from_str(&raw).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "A1");
        // The later occurrence's values were retained
        assert_eq!(records[0].amount, Money::from_francs(500));
        assert_eq!(records[1].id, "B2");
    }

    #[tokio::test]
    async fn test_scrub_is_idempotent() {
        let kv = store().await;
        kv.save(DEBTS_KEY, "garbage").await.unwrap();
        kv.save(
            TRANSACTIONS_KEY,
            &encode(&[tx("A1", 100), tx("A1", 500)]),
        )
        .await
        .unwrap();

        let first = scrub(&kv).await.unwrap();
        assert_eq!(first, 2);

        // Second run over the now-healthy store is a no-op
        let second = scrub(&kv).await.unwrap();
        assert_eq!(second, 0);
    }

    #[tokio::test]
    async fn test_empty_store_needs_no_repairs() {
        let kv = store().await;
        assert_eq!(scrub(&kv).await.unwrap(), 0);
    }

    // -------------------------------------------------------------------------
    // Healing / audit emission
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_heal_emits_exactly_one_entry() {
        let kv = store().await;
        kv.save(PRODUCTS_KEY, "broken").await.unwrap();
        kv.save(DEBTS_KEY, "also broken").await.unwrap();

        let mut trail = AuditTrail::new();
        let repaired = heal(&kv, &mut trail).await.unwrap();

        assert_eq!(repaired, 2);
        // Two repairs, ONE aggregated entry
        assert_eq!(trail.len(), 1);

        let entry = &trail.entries()[0];
        assert_eq!(entry.action, "Système");
        assert_eq!(entry.severity, Severity::Medium);
        assert!(entry.details.contains("2 anomalies structurelles"));
    }

    #[tokio::test]
    async fn test_heal_on_healthy_store_is_silent() {
        let kv = store().await;
        kv.save(TRANSACTIONS_KEY, &encode(&[tx("A1", 100)]))
            .await
            .unwrap();

        let mut trail = AuditTrail::new();
        let repaired = heal(&kv, &mut trail).await.unwrap();

        assert_eq!(repaired, 0);
        assert!(trail.is_empty());
    }
}
