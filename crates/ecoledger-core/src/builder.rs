//! The chain builder: constructs and persists the next entry for an owner.
//!
//! Appending is a two-phase optimistic operation:
//!
//!   prepare → read the owner's tail, assign id + timestamp, compute digest
//!   commit  → under the owner's lock, re-check the tail, then append
//!
//! Two concurrent appends for the same owner that prepared against the same
//! tail cannot both commit: the second re-check fails with `ChainConflict`
//! and the caller retries against the fresh tail.  This is the sole
//! coordination point in the core — different owners' chains are appended
//! with no ordering relationship at all.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, FixedOffset, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use ecoledger_contracts::{LedgerEntry, LedgerError, LedgerResult};

use crate::digest::entry_digest;
use crate::traits::ChainStore;

/// How many times `append` retries after losing an optimistic race before
/// surfacing the conflict to the caller.
const MAX_APPEND_ATTEMPTS: usize = 3;

/// The caller-supplied fields of a new activity, before the chain fields
/// are derived.
#[derive(Debug, Clone)]
pub struct ActivityDraft {
    pub owner_id: String,
    pub kind: String,
    /// Emission magnitude (kg CO2e), computed by an external collaborator.
    pub quantity: f64,
    pub unit: String,
    /// When the activity happened. `None` means server-assigned at append
    /// time.
    pub occurred_at: Option<DateTime<FixedOffset>>,
    pub annotation: Option<String>,
    pub supplementary_data: Option<serde_json::Value>,
}

impl ActivityDraft {
    /// A draft with a server-assigned timestamp and no optional payloads.
    pub fn new(
        owner_id: impl Into<String>,
        kind: impl Into<String>,
        quantity: f64,
        unit: impl Into<String>,
    ) -> Self {
        Self {
            owner_id: owner_id.into(),
            kind: kind.into(),
            quantity,
            unit: unit.into(),
            occurred_at: None,
            annotation: None,
            supplementary_data: None,
        }
    }
}

/// A fully constructed entry whose digest was computed against an observed
/// tail, awaiting commit.
///
/// Holding a `PendingEntry` reserves nothing: the tail may move before
/// `commit`, in which case the commit fails with `ChainConflict`.
#[derive(Debug)]
pub struct PendingEntry {
    entry: LedgerEntry,
}

impl PendingEntry {
    /// The tail digest this entry was prepared against.
    pub fn previous_digest(&self) -> &str {
        &self.entry.previous_digest
    }

    /// The entry that `commit` will persist.
    pub fn entry(&self) -> &LedgerEntry {
        &self.entry
    }
}

/// Per-owner mutual-exclusion registry for the commit re-check.
///
/// Lock scope is a single tail-read plus append — microseconds for an
/// in-memory store.  Cross-owner commits never contend.
struct OwnerLocks {
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl OwnerLocks {
    fn new() -> Self {
        Self {
            locks: Mutex::new(HashMap::new()),
        }
    }

    fn for_owner(&self, owner_id: &str) -> LedgerResult<Arc<Mutex<()>>> {
        let mut locks = self.locks.lock().map_err(|e| LedgerError::StorageUnavailable {
            store: "ledger".to_string(),
            reason: format!("owner lock registry poisoned: {}", e),
        })?;
        Ok(locks
            .entry(owner_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone())
    }
}

/// Orchestrates chain construction: tail read, digest computation, and the
/// optimistic conditional append.
///
/// Stateless between calls apart from the owner lock registry; safe to
/// share behind an `Arc` across concurrent callers.
pub struct ChainBuilder {
    store: Arc<dyn ChainStore>,
    locks: OwnerLocks,
}

impl ChainBuilder {
    pub fn new(store: Arc<dyn ChainStore>) -> Self {
        Self {
            store,
            locks: OwnerLocks::new(),
        }
    }

    /// Phase one: read the owner's current tail and construct the next
    /// entry against it.
    ///
    /// Assigns a fresh v4 id, resolves a server timestamp if the draft has
    /// none, and computes `current_digest` with the tail's digest (or
    /// genesis) as the back-link.  Nothing is persisted.
    ///
    /// A draft whose `occurred_at` predates the tail's is rejected: chains
    /// are read back in `occurred_at` order, so a back-dated entry would
    /// land mid-chain on read even though it was appended at the end,
    /// breaking every back-link after it.  Equal timestamps are fine — ties
    /// keep their append order.
    ///
    /// # Errors
    ///
    /// `EncodingError` for a non-finite or negative quantity, NUL bytes in
    /// `owner_id`/`kind`, or an `occurred_at` older than the tail's; store
    /// errors from the tail read.
    pub fn prepare(&self, draft: ActivityDraft) -> LedgerResult<PendingEntry> {
        let (previous_digest, tail_occurred_at) = match self.store.tail(&draft.owner_id)? {
            Some(tail) => (tail.current_digest, Some(tail.occurred_at)),
            None => (LedgerEntry::GENESIS_DIGEST.to_string(), None),
        };

        let occurred_at = draft
            .occurred_at
            .unwrap_or_else(|| Utc::now().fixed_offset());

        if let Some(tail_occurred_at) = tail_occurred_at {
            if occurred_at < tail_occurred_at {
                return Err(LedgerError::EncodingError {
                    reason: format!(
                        "occurred_at {} predates the chain tail's {} for owner '{}'",
                        occurred_at.to_rfc3339(),
                        tail_occurred_at.to_rfc3339(),
                        draft.owner_id
                    ),
                });
            }
        }

        let current_digest = entry_digest(
            &previous_digest,
            &draft.owner_id,
            &draft.kind,
            draft.quantity,
            &occurred_at,
        )?;

        let entry = LedgerEntry {
            id: Uuid::new_v4(),
            owner_id: draft.owner_id,
            kind: draft.kind,
            quantity: draft.quantity,
            unit: draft.unit,
            occurred_at,
            previous_digest,
            current_digest,
            annotation: draft.annotation,
            supplementary_data: draft.supplementary_data,
        };

        debug!(
            owner_id = %entry.owner_id,
            entry_id = %entry.id,
            previous_digest = %entry.previous_digest,
            "prepared ledger entry"
        );

        Ok(PendingEntry { entry })
    }

    /// Phase two: persist a prepared entry, conditional on the tail not
    /// having moved.
    ///
    /// Under the owner's lock, re-reads the tail; if its digest no longer
    /// equals the prepared `previous_digest`, a concurrent append won the
    /// race and this commit fails with `ChainConflict` — the entry is not
    /// persisted and the caller re-prepares against the fresh tail.  The
    /// store append itself is atomic, so a failed commit leaves nothing
    /// partially visible.
    pub fn commit(&self, pending: PendingEntry) -> LedgerResult<LedgerEntry> {
        let entry = pending.entry;
        let owner_lock = self.locks.for_owner(&entry.owner_id)?;
        let _guard = owner_lock.lock().map_err(|e| LedgerError::StorageUnavailable {
            store: "ledger".to_string(),
            reason: format!("owner lock poisoned: {}", e),
        })?;

        let tail_digest = match self.store.tail(&entry.owner_id)? {
            Some(tail) => tail.current_digest,
            None => LedgerEntry::GENESIS_DIGEST.to_string(),
        };

        if tail_digest != entry.previous_digest {
            return Err(LedgerError::ChainConflict {
                owner_id: entry.owner_id,
                expected: entry.previous_digest,
                found: tail_digest,
            });
        }

        self.store.append(entry.clone())?;

        info!(
            owner_id = %entry.owner_id,
            entry_id = %entry.id,
            kind = %entry.kind,
            current_digest = %entry.current_digest,
            "ledger entry appended"
        );

        Ok(entry)
    }

    /// Prepare and commit in one call, retrying a lost optimistic race
    /// against the fresh tail.
    ///
    /// A caller-supplied timestamp is kept across retries; a server
    /// timestamp is resolved fresh on each attempt, since the winning
    /// append may carry a later stamp than the losing attempt took.  After
    /// `MAX_APPEND_ATTEMPTS` consecutive conflicts the last `ChainConflict`
    /// is returned for the caller to handle.
    pub fn append(&self, draft: ActivityDraft) -> LedgerResult<LedgerEntry> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            let pending = self.prepare(draft.clone())?;
            match self.commit(pending) {
                Ok(entry) => return Ok(entry),
                Err(conflict @ LedgerError::ChainConflict { .. }) => {
                    if attempt >= MAX_APPEND_ATTEMPTS {
                        return Err(conflict);
                    }
                    warn!(
                        owner_id = %draft.owner_id,
                        attempt,
                        "append lost optimistic race, retrying with fresh tail"
                    );
                }
                Err(other) => return Err(other),
            }
        }
    }
}
