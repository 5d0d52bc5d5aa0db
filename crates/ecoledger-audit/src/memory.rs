//! In-memory implementation of `AuditStore`.
//!
//! `InMemoryAuditStore` is the reference implementation of the audit store
//! port: one `Vec` partition per actor behind a single `Mutex`.  A
//! production deployment would back this with a wide-column store
//! partitioned by actor and clustered `(occurred_at DESC, audit_id ASC)`;
//! the scan contract here matches that layout exactly.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::debug;

use ecoledger_contracts::{AuditEntry, AuditScan, LedgerError, LedgerResult};
use ecoledger_core::traits::AuditStore;

/// An in-memory, append-only audit store partitioned by actor.
///
/// No update or delete path exists.  Entries are kept in append order and
/// sorted into clustering order at scan time — reads are rare relative to
/// writes, so the write path stays a plain push.
pub struct InMemoryAuditStore {
    partitions: Arc<Mutex<HashMap<String, Vec<AuditEntry>>>>,
}

impl InMemoryAuditStore {
    pub fn new() -> Self {
        Self {
            partitions: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Number of entries in `actor_id`'s partition.
    pub fn partition_len(&self, actor_id: &str) -> LedgerResult<usize> {
        let partitions = self.lock()?;
        Ok(partitions.get(actor_id).map_or(0, Vec::len))
    }

    fn lock(&self) -> LedgerResult<MutexGuard<'_, HashMap<String, Vec<AuditEntry>>>> {
        self.partitions.lock().map_err(|e| LedgerError::StorageUnavailable {
            store: "audit".to_string(),
            reason: format!("audit partitions lock poisoned: {}", e),
        })
    }
}

impl Default for InMemoryAuditStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AuditStore for InMemoryAuditStore {
    fn append(&self, entry: AuditEntry) -> LedgerResult<()> {
        let mut partitions = self.lock()?;
        debug!(
            actor_id = %entry.actor_id,
            audit_id = %entry.audit_id,
            action = %entry.action,
            "audit store append"
        );
        partitions.entry(entry.actor_id.clone()).or_default().push(entry);
        Ok(())
    }

    /// Scan one actor's partition: inclusive `since`/`until` bounds,
    /// ordered `occurred_at` DESC then `audit_id` ASC, clamped to the
    /// scan's effective limit.
    fn scan(&self, scan: &AuditScan) -> LedgerResult<Vec<AuditEntry>> {
        let partitions = self.lock()?;
        let mut entries: Vec<AuditEntry> = partitions
            .get(&scan.actor_id)
            .map(|partition| {
                partition
                    .iter()
                    .filter(|e| scan.since.map_or(true, |since| e.occurred_at >= since))
                    .filter(|e| scan.until.map_or(true, |until| e.occurred_at <= until))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        entries.sort_by(|a, b| {
            b.occurred_at
                .cmp(&a.occurred_at)
                .then(a.audit_id.cmp(&b.audit_id))
        });
        entries.truncate(scan.effective_limit());
        Ok(entries)
    }
}
