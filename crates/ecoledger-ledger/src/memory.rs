//! In-memory implementation of `ChainStore`.
//!
//! `InMemoryChainStore` is the reference implementation of the chain store
//! port: one `Vec` partition per owner behind a single `Mutex`, with a
//! global duplicate-id guard.  Suitable for tests, demos, and
//! single-process deployments; a database-backed store would keep the same
//! contract (partition by owner, secondary ordering by `occurred_at`).
//!
//! Per the `ChainStore` contract, this store enforces the duplicate-id
//! guard but no chain-order constraint, and exposes no update or delete
//! path.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::debug;
use uuid::Uuid;

use ecoledger_contracts::{LedgerEntry, LedgerError, LedgerResult, Pagination};
use ecoledger_core::traits::ChainStore;

// ── Internal mutable state ────────────────────────────────────────────────────

/// The mutable interior of an `InMemoryChainStore`.
struct ChainState {
    /// Per-owner partitions, in append order.
    chains: HashMap<String, Vec<LedgerEntry>>,

    /// Every id ever appended, for the duplicate-id guard.
    ids: HashSet<Uuid>,
}

// ── Public store ──────────────────────────────────────────────────────────────

/// An in-memory, append-only chain store partitioned by owner.
///
/// # Thread safety
///
/// All three operations acquire an internal `Mutex`; the store may be
/// shared behind an `Arc` across concurrent builders and verifiers.
pub struct InMemoryChainStore {
    state: Arc<Mutex<ChainState>>,
}

impl InMemoryChainStore {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(ChainState {
                chains: HashMap::new(),
                ids: HashSet::new(),
            })),
        }
    }

    /// Number of entries stored for `owner_id`.
    pub fn len(&self, owner_id: &str) -> LedgerResult<usize> {
        let state = self.lock()?;
        Ok(state.chains.get(owner_id).map_or(0, Vec::len))
    }

    fn lock(&self) -> LedgerResult<MutexGuard<'_, ChainState>> {
        self.state.lock().map_err(|e| LedgerError::StorageUnavailable {
            store: "ledger".to_string(),
            reason: format!("chain state lock poisoned: {}", e),
        })
    }
}

impl Default for InMemoryChainStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ChainStore for InMemoryChainStore {
    /// Insert `entry` into its owner's partition.
    ///
    /// Atomic: the id is registered and the entry pushed under one lock, so
    /// a failed append leaves nothing visible.
    fn append(&self, entry: LedgerEntry) -> LedgerResult<()> {
        let mut state = self.lock()?;

        if !state.ids.insert(entry.id) {
            return Err(LedgerError::DuplicateEntry {
                id: entry.id.to_string(),
            });
        }

        debug!(owner_id = %entry.owner_id, entry_id = %entry.id, "chain store append");
        state.chains.entry(entry.owner_id.clone()).or_default().push(entry);
        Ok(())
    }

    /// The most recently appended entry for `owner_id`.
    fn tail(&self, owner_id: &str) -> LedgerResult<Option<LedgerEntry>> {
        let state = self.lock()?;
        Ok(state.chains.get(owner_id).and_then(|c| c.last().cloned()))
    }

    /// Entries in ascending `occurred_at` order, ties broken by insertion
    /// order (stable sort over the append-ordered partition).
    fn list(&self, owner_id: &str, page: Pagination) -> LedgerResult<Vec<LedgerEntry>> {
        let state = self.lock()?;
        let mut entries = state.chains.get(owner_id).cloned().unwrap_or_default();
        entries.sort_by_key(|e| e.occurred_at);
        Ok(entries.into_iter().skip(page.offset).take(page.limit).collect())
    }
}
