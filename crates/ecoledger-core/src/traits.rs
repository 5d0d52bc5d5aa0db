//! Storage port definitions.
//!
//! The two stores are deliberately separate traits consumed by separate
//! use-case objects — never one combined repository.  The ledger append and
//! the audit write are not transactionally coupled: failure of one must not
//! roll back the other.
//!
//! - `ChainStore` — per-owner ordered ledger partitions (append, tail,
//!   ordered list)
//! - `AuditStore` — per-actor append-only audit partitions (append, range
//!   scan)
//!
//! Neither trait exposes update or delete.  Any such capability lives
//! outside this contract, and exercising it against ledger entries is a
//! verification-breaking event by design.

use ecoledger_contracts::{AuditEntry, AuditScan, LedgerEntry, LedgerResult, Pagination};

/// Persistence for per-owner hash-linked chains.
///
/// Implementations must be safe for concurrent callers.  They enforce the
/// duplicate-id guard but NOT chain-order correctness — ordering is the
/// builder's and verifier's responsibility, keeping the store a dumb,
/// swappable partition log.
pub trait ChainStore: Send + Sync {
    /// Insert a new entry.
    ///
    /// Must fail with `LedgerError::DuplicateEntry` if an entry with the
    /// same `id` already exists, and must be atomic: either the entry is
    /// fully visible afterwards or nothing is.
    fn append(&self, entry: LedgerEntry) -> LedgerResult<()>;

    /// The most recently appended entry for `owner_id`, or `None` for an
    /// owner with no chain yet.
    fn tail(&self, owner_id: &str) -> LedgerResult<Option<LedgerEntry>>;

    /// Entries for `owner_id` in ascending `occurred_at` order, ties broken
    /// by insertion order.
    fn list(&self, owner_id: &str, page: Pagination) -> LedgerResult<Vec<LedgerEntry>>;
}

/// Persistence for the append-only, actor-partitioned audit trail.
///
/// Write-optimized: single-row appends, single-partition range scans,
/// never cross-partition aggregation in the hot path.
pub trait AuditStore: Send + Sync {
    /// Append one audit entry to its actor's partition.
    fn append(&self, entry: AuditEntry) -> LedgerResult<()>;

    /// Range-scan one actor's partition, most recent first
    /// (`occurred_at` DESC, then `audit_id` ASC for same-timestamp ties).
    ///
    /// Honors `scan.since`/`scan.until` as inclusive bounds and clamps the
    /// result to `scan.effective_limit()`.
    fn scan(&self, scan: &AuditScan) -> LedgerResult<Vec<AuditEntry>>;
}
