//! The audit recorder: a thin façade over the audit store.
//!
//! Callers hand it the action metadata after a business operation
//! completes; the recorder stamps the timestamp and a fresh audit id and
//! persists the entry.  The write is fire-and-forget relative to the
//! triggering operation: `record_detached` never propagates failure, it
//! retries transient store outages a bounded number of times and then
//! drops the entry with a logged warning.  Audit loss does not compromise
//! ledger integrity; ledger failure does not suppress the audit record of
//! whatever did happen.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, warn};

use ecoledger_contracts::{ActionRecord, AuditEntry, LedgerError, LedgerResult};
use ecoledger_core::traits::AuditStore;

/// Total store attempts `record_detached` makes before dropping an entry.
const DETACHED_WRITE_ATTEMPTS: usize = 3;

/// Translates completed actions into audit entries and persists them.
///
/// Stateless; safe to share behind an `Arc` across concurrent callers.
pub struct AuditRecorder {
    store: Arc<dyn AuditStore>,
}

impl AuditRecorder {
    pub fn new(store: Arc<dyn AuditStore>) -> Self {
        Self { store }
    }

    /// Persist one audit entry, stamping `occurred_at` (UTC now) and a
    /// fresh v4 `audit_id`.
    ///
    /// Returns the stored entry so callers can paginate from its position.
    /// Store failures propagate — use [`record_detached`](Self::record_detached)
    /// from business code that must not fail on audit loss.
    pub fn record(&self, record: ActionRecord) -> LedgerResult<AuditEntry> {
        let entry = AuditEntry {
            actor_id: record.actor_id,
            occurred_at: Utc::now(),
            audit_id: uuid::Uuid::new_v4(),
            action: record.action,
            target_entity: record.target_entity,
            target_id: record.target_id,
            detail: record.detail,
            origin: record.origin,
            description: record.description,
        };

        self.store.append(entry.clone())?;

        debug!(
            actor_id = %entry.actor_id,
            audit_id = %entry.audit_id,
            action = %entry.action,
            target_entity = %entry.target_entity,
            "audit entry recorded"
        );
        Ok(entry)
    }

    /// Persist one audit entry without letting failure reach the caller.
    ///
    /// Transient outages (`StorageUnavailable`) are retried up to
    /// [`DETACHED_WRITE_ATTEMPTS`] total attempts; any other failure is
    /// final immediately.  A dropped entry is surfaced as a `warn!` event —
    /// the observability channel — and nothing else.
    pub fn record_detached(&self, record: ActionRecord) {
        for attempt in 1..=DETACHED_WRITE_ATTEMPTS {
            match self.record(record.clone()) {
                Ok(_) => return,
                Err(err @ LedgerError::StorageUnavailable { .. })
                    if attempt < DETACHED_WRITE_ATTEMPTS =>
                {
                    debug!(
                        actor_id = %record.actor_id,
                        attempt,
                        error = %err,
                        "audit store unavailable, retrying"
                    );
                }
                Err(err) => {
                    warn!(
                        actor_id = %record.actor_id,
                        action = %record.action,
                        target_entity = %record.target_entity,
                        target_id = %record.target_id,
                        error = %err,
                        "dropping audit entry after failed write"
                    );
                    return;
                }
            }
        }
    }
}
