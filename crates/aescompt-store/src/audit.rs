//! # Audit Sink
//!
//! The append-only log of system and user actions surfaced to the end
//! user.
//!
//! Entries come from two producers: user actions (finance entries
//! recorded by the [`crate::store::AppStore`]) and the integrity
//! scrubber's healing step. The trail is held newest-first so the UI can
//! render it without re-sorting. It lives in memory for the session and
//! is deliberately not one of the persisted collections.

use tracing::debug;

use aescompt_core::ids::new_record_id;
use aescompt_core::{AuditEntry, Severity};

// =============================================================================
// Sink Trait
// =============================================================================

/// Anything that can accept audit records.
///
/// The scrubber takes `&mut dyn AuditSink` so its healing step stays
/// decoupled from where the entries end up (the in-memory trail in the
/// app, a plain Vec in tests).
pub trait AuditSink {
    /// Records one audit entry.
    fn record(&mut self, action: &str, details: &str, severity: Severity);
}

// =============================================================================
// In-Memory Trail
// =============================================================================

/// Append-only, newest-first audit trail.
#[derive(Debug, Clone, Default)]
pub struct AuditTrail {
    entries: Vec<AuditEntry>,
}

impl AuditTrail {
    /// Creates an empty trail.
    pub fn new() -> Self {
        AuditTrail::default()
    }

    /// All entries, newest first.
    pub fn entries(&self) -> &[AuditEntry] {
        &self.entries
    }

    /// Number of recorded entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the trail is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl AuditSink for AuditTrail {
    fn record(&mut self, action: &str, details: &str, severity: Severity) {
        debug!(action = %action, ?severity, "Audit entry");

        let entry = AuditEntry {
            id: new_record_id(),
            timestamp: chrono::Utc::now(),
            action: action.to_string(),
            details: details.to_string(),
            severity,
        };

        // Newest-first ordering
        self.entries.insert(0, entry);
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newest_first_ordering() {
        let mut trail = AuditTrail::new();

        trail.record("Finance", "Encaissement: 500 F", Severity::Low);
        trail.record("Système", "Audit terminé", Severity::Medium);

        assert_eq!(trail.len(), 2);
        assert_eq!(trail.entries()[0].action, "Système");
        assert_eq!(trail.entries()[1].action, "Finance");
    }

    #[test]
    fn test_entries_get_identity_and_timestamp() {
        let mut trail = AuditTrail::new();
        trail.record("Finance", "Décaissement: 200 F", Severity::Low);

        let entry = &trail.entries()[0];
        assert!(!entry.id.is_empty());
        assert_eq!(entry.severity, Severity::Low);
        assert_eq!(entry.details, "Décaissement: 200 F");
    }
}
