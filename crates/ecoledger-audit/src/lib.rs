//! # ecoledger-audit
//!
//! Append-only, actor-partitioned audit trail for EcoLedger.
//!
//! Every security-relevant action (login, create, update, delete, verify)
//! is recorded here, independently of the ledger: the two stores share no
//! keys and no transaction.  This crate provides
//! [`memory::InMemoryAuditStore`], the reference implementation of the
//! [`ecoledger_core::traits::AuditStore`] port, and
//! [`recorder::AuditRecorder`], the façade business code calls after each
//! mutating operation.

pub mod memory;
pub mod recorder;

pub use memory::InMemoryAuditStore;
pub use recorder::AuditRecorder;

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use chrono::{Duration, TimeZone, Utc};
    use uuid::Uuid;

    use ecoledger_contracts::{
        ActionRecord, AuditAction, AuditEntry, AuditScan, LedgerError, LedgerResult,
    };
    use ecoledger_core::traits::AuditStore;
    use ecoledger_core::{ActivityDraft, ChainBuilder};
    use ecoledger_ledger::InMemoryChainStore;

    use super::{AuditRecorder, InMemoryAuditStore};

    // ── Helpers ───────────────────────────────────────────────────────────────

    /// An audit entry with an explicit timestamp, for ordering tests.
    fn entry_at(actor: &str, minute: u32, audit_id: Uuid) -> AuditEntry {
        AuditEntry {
            actor_id: actor.to_string(),
            occurred_at: Utc.with_ymd_and_hms(2025, 3, 1, 12, minute, 0).unwrap(),
            audit_id,
            action: AuditAction::Create,
            target_entity: "activity".to_string(),
            target_id: format!("a-{}", minute),
            detail: Default::default(),
            origin: None,
            description: format!("created activity a-{}", minute),
        }
    }

    /// A store that always refuses writes, counting the attempts.
    struct FailingStore {
        attempts: AtomicUsize,
        error: fn() -> LedgerError,
    }

    impl FailingStore {
        fn unavailable() -> Self {
            Self {
                attempts: AtomicUsize::new(0),
                error: || LedgerError::StorageUnavailable {
                    store: "audit".to_string(),
                    reason: "connection refused".to_string(),
                },
            }
        }

        fn rejecting() -> Self {
            Self {
                attempts: AtomicUsize::new(0),
                error: || LedgerError::AuditWriteFailed {
                    reason: "row too large".to_string(),
                },
            }
        }
    }

    impl AuditStore for FailingStore {
        fn append(&self, _entry: AuditEntry) -> LedgerResult<()> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            Err((self.error)())
        }

        fn scan(&self, _scan: &AuditScan) -> LedgerResult<Vec<AuditEntry>> {
            Err((self.error)())
        }
    }

    // ── Recorder ──────────────────────────────────────────────────────────────

    #[test]
    fn record_stamps_id_and_time_and_lands_in_actor_partition() {
        let store = Arc::new(InMemoryAuditStore::new());
        let recorder = AuditRecorder::new(store.clone());

        let before = Utc::now();
        let entry = recorder
            .record(ActionRecord::new(
                "admin",
                AuditAction::Login,
                "user",
                "admin",
                "admin logged in",
            ))
            .unwrap();
        let after = Utc::now();

        assert!(entry.occurred_at >= before && entry.occurred_at <= after);
        assert_eq!(store.partition_len("admin").unwrap(), 1);

        let second = recorder
            .record(ActionRecord::new(
                "admin",
                AuditAction::Logout,
                "user",
                "admin",
                "admin logged out",
            ))
            .unwrap();
        assert_ne!(entry.audit_id, second.audit_id);
    }

    // ── Scan ordering and bounds ──────────────────────────────────────────────

    #[test]
    fn scan_returns_most_recent_first() {
        let store = InMemoryAuditStore::new();
        for minute in [5, 1, 3] {
            store.append(entry_at("u1", minute, Uuid::new_v4())).unwrap();
        }

        let scanned = store.scan(&AuditScan::latest("u1", 10)).unwrap();
        let minutes: Vec<u32> = scanned
            .iter()
            .map(|e| chrono::Timelike::minute(&e.occurred_at))
            .collect();
        assert_eq!(minutes, [5, 3, 1]);
    }

    #[test]
    fn same_timestamp_ties_break_by_audit_id_ascending() {
        let store = InMemoryAuditStore::new();
        let mut ids = [Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4()];
        for id in ids {
            store.append(entry_at("u1", 30, id)).unwrap();
        }
        ids.sort();

        let scanned = store.scan(&AuditScan::latest("u1", 10)).unwrap();
        let scanned_ids: Vec<Uuid> = scanned.iter().map(|e| e.audit_id).collect();
        assert_eq!(scanned_ids, ids);
    }

    #[test]
    fn scan_bounds_are_inclusive() {
        let store = InMemoryAuditStore::new();
        for minute in [10, 20, 30, 40] {
            store.append(entry_at("u1", minute, Uuid::new_v4())).unwrap();
        }

        let scan = AuditScan {
            actor_id: "u1".to_string(),
            since: Some(Utc.with_ymd_and_hms(2025, 3, 1, 12, 20, 0).unwrap()),
            until: Some(Utc.with_ymd_and_hms(2025, 3, 1, 12, 30, 0).unwrap()),
            limit: 10,
        };
        let scanned = store.scan(&scan).unwrap();
        let minutes: Vec<u32> = scanned
            .iter()
            .map(|e| chrono::Timelike::minute(&e.occurred_at))
            .collect();
        assert_eq!(minutes, [30, 20]);
    }

    #[test]
    fn scan_respects_limit_and_partition_isolation() {
        let store = InMemoryAuditStore::new();
        for minute in [1, 2, 3, 4, 5] {
            store.append(entry_at("u1", minute, Uuid::new_v4())).unwrap();
        }
        store.append(entry_at("u2", 59, Uuid::new_v4())).unwrap();

        let scanned = store.scan(&AuditScan::latest("u1", 2)).unwrap();
        assert_eq!(scanned.len(), 2);
        assert!(scanned.iter().all(|e| e.actor_id == "u1"));

        assert_eq!(store.scan(&AuditScan::latest("u2", 10)).unwrap().len(), 1);
        assert!(store.scan(&AuditScan::latest("u3", 10)).unwrap().is_empty());
    }

    #[test]
    fn pagination_tightens_the_until_bound() {
        let store = InMemoryAuditStore::new();
        for minute in [10, 20, 30, 40] {
            store.append(entry_at("u1", minute, Uuid::new_v4())).unwrap();
        }

        let first_page = store.scan(&AuditScan::latest("u1", 2)).unwrap();
        assert_eq!(first_page.len(), 2);
        let last_seen = first_page.last().unwrap().occurred_at;

        // Next page: everything strictly older than the last returned entry.
        let scan = AuditScan {
            actor_id: "u1".to_string(),
            since: None,
            until: Some(last_seen - Duration::microseconds(1)),
            limit: 2,
        };
        let second_page = store.scan(&scan).unwrap();
        assert_eq!(second_page.len(), 2);
        assert!(second_page.iter().all(|e| e.occurred_at < last_seen));
    }

    // ── Detached writes and isolation ─────────────────────────────────────────

    #[test]
    fn detached_record_retries_transient_outage_then_drops() {
        let store = Arc::new(FailingStore::unavailable());
        let recorder = AuditRecorder::new(store.clone());

        recorder.record_detached(ActionRecord::new(
            "u1",
            AuditAction::Create,
            "activity",
            "a-1",
            "recorded car activity",
        ));

        assert_eq!(store.attempts.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn detached_record_does_not_retry_non_transient_failures() {
        let store = Arc::new(FailingStore::rejecting());
        let recorder = AuditRecorder::new(store.clone());

        recorder.record_detached(ActionRecord::new(
            "u1",
            AuditAction::Create,
            "activity",
            "a-1",
            "recorded car activity",
        ));

        assert_eq!(store.attempts.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn audit_failure_does_not_block_a_ledger_append() {
        let chain_store = Arc::new(InMemoryChainStore::new());
        let builder = ChainBuilder::new(chain_store);
        let recorder = AuditRecorder::new(Arc::new(FailingStore::unavailable()));

        // The business operation: append to the ledger, then audit it.
        let entry = builder.append(ActivityDraft::new("u1", "car", 5.0, "kg")).unwrap();
        recorder.record_detached(ActionRecord::new(
            "u1",
            AuditAction::Create,
            "activity",
            entry.id.to_string(),
            "recorded car activity",
        ));

        // The append survived the audit outage; nothing rolled back.
        assert_eq!(entry.kind, "car");
    }
}
