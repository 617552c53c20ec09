//! # Record Identity Generation
//!
//! Every record (transaction, product, debt, supplier, profile, audit
//! entry) carries an opaque string identity that must be unique within
//! its collection.
//!
//! ## Why UUID v4?
//! A random UUID makes the uniqueness guarantee explicit (collision
//! probability is negligible by construction) and requires no
//! coordination, which matters for an offline-first system. Short random
//! alphanumeric codes look friendlier but their collision odds degrade
//! quickly as a shop's history grows - and a duplicated identity is
//! exactly the anomaly the integrity scrubber exists to repair.

use uuid::Uuid;

/// Generates a fresh record identity.
///
/// ## Example
/// ```rust
/// use aescompt_core::ids::new_record_id;
///
/// let id = new_record_id();
/// assert_eq!(id.len(), 36); // canonical hyphenated UUID
/// ```
pub fn new_record_id() -> String {
    Uuid::new_v4().to_string()
}
