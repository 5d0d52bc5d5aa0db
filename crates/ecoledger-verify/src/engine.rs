//! Chain verification: detect corruption or tampering in a stored chain.
//!
//! `ChainVerifier` walks one owner's full chain oldest-first and checks
//! three rules for every entry:
//!
//! 1. **Ownership** — the entry belongs to the queried owner.  A foreign
//!    entry is a store-layer contract violation and immediately invalid.
//! 2. **Prev-digest linkage** — the stored `previous_digest` equals the
//!    `current_digest` of the preceding entry (genesis for entry 1).
//! 3. **Digest correctness** — the digest recomputed from the entry's
//!    protected fields equals the stored `current_digest`.
//!
//! Verification never mutates state and never auto-repairs: a failing
//! report names the first broken entry and stops, leaving repair to an
//! explicitly authorized administrative action outside this core.

use std::sync::Arc;

use tracing::{debug, info, warn};

use ecoledger_contracts::{LedgerEntry, LedgerResult, Pagination, VerificationReport};

use ecoledger_core::digest::entry_digest;
use ecoledger_core::traits::ChainStore;

/// Default number of entries fetched per `list` call during a walk.
const DEFAULT_PAGE_SIZE: usize = 256;

/// Check a single stored entry against its own back-link.
///
/// Recomputes the digest from the entry's stored `previous_digest` and
/// protected fields.  This does NOT validate the entry's position in the
/// chain — use it to annotate listings with a per-record validity flag
/// without walking the whole chain.
pub fn verify_entry(entry: &LedgerEntry) -> bool {
    match entry_digest(
        &entry.previous_digest,
        &entry.owner_id,
        &entry.kind,
        entry.quantity,
        &entry.occurred_at,
    ) {
        Ok(recomputed) => recomputed == entry.current_digest,
        // A stored entry whose fields cannot even be re-encoded (e.g. a
        // quantity mutated to NaN) is by definition not the entry that was
        // appended.
        Err(_) => false,
    }
}

/// Verify an in-memory sequence of entries as one owner's chain, oldest
/// first.
///
/// Same rules as [`ChainVerifier::verify`], for callers that already hold
/// the full sequence.
pub fn verify_entries(owner_id: &str, entries: &[LedgerEntry]) -> VerificationReport {
    let mut walk = ChainWalk::new(owner_id);
    for entry in entries {
        if let Some(report) = walk.check(entry) {
            return report;
        }
    }
    walk.finish()
}

// ── Incremental walk state ────────────────────────────────────────────────────

/// The rolling state of a chain walk: the digest the next entry must link
/// to, and how many entries have been scanned.
struct ChainWalk {
    owner_id: String,
    expected_previous: String,
    scanned: u64,
}

impl ChainWalk {
    fn new(owner_id: &str) -> Self {
        Self {
            owner_id: owner_id.to_string(),
            expected_previous: LedgerEntry::GENESIS_DIGEST.to_string(),
            scanned: 0,
        }
    }

    /// Check one entry.  Returns `Some(report)` the moment the chain is
    /// found broken, `None` while it holds.
    fn check(&mut self, entry: &LedgerEntry) -> Option<VerificationReport> {
        self.scanned += 1;

        if entry.owner_id != self.owner_id {
            warn!(
                owner_id = %self.owner_id,
                entry_id = %entry.id,
                foreign_owner = %entry.owner_id,
                "foreign entry in owner partition"
            );
            return Some(VerificationReport::invalid(
                self.scanned,
                entry.id,
                format!(
                    "record #{} belongs to owner '{}', not '{}': store contract violation",
                    self.scanned, entry.owner_id, self.owner_id
                ),
            ));
        }

        if entry.previous_digest != self.expected_previous {
            warn!(
                owner_id = %self.owner_id,
                entry_id = %entry.id,
                record = self.scanned,
                "previous digest does not match chain"
            );
            return Some(VerificationReport::invalid(
                self.scanned,
                entry.id,
                format!(
                    "chain broken at record #{}: previous digest does not match",
                    self.scanned
                ),
            ));
        }

        let recomputed = entry_digest(
            &self.expected_previous,
            &entry.owner_id,
            &entry.kind,
            entry.quantity,
            &entry.occurred_at,
        );
        let matches = match &recomputed {
            Ok(digest) => *digest == entry.current_digest,
            Err(_) => false,
        };
        if !matches {
            warn!(
                owner_id = %self.owner_id,
                entry_id = %entry.id,
                record = self.scanned,
                "stored digest does not match recomputation"
            );
            return Some(VerificationReport::invalid(
                self.scanned,
                entry.id,
                format!(
                    "digest mismatch at record #{}: a protected field was modified after append",
                    self.scanned
                ),
            ));
        }

        self.expected_previous = entry.current_digest.clone();
        None
    }

    fn finish(self) -> VerificationReport {
        VerificationReport::valid(self.scanned)
    }
}

// ── Public verifier ───────────────────────────────────────────────────────────

/// Walks chains out of a `ChainStore` and re-derives every digest.
///
/// Reads the chain in pages so verification of a long chain holds one page
/// in memory at a time.  Safe to run concurrently with appends: the
/// builder rejects drafts whose `occurred_at` predates the tail's, so an
/// entry appended mid-walk sorts at the end of the read order, never
/// inside the pages already scanned.
pub struct ChainVerifier {
    store: Arc<dyn ChainStore>,
    page_size: usize,
}

impl ChainVerifier {
    pub fn new(store: Arc<dyn ChainStore>) -> Self {
        Self {
            store,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Override the walk's page size (mainly for tests).
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Verify the full stored chain for `owner_id`.
    ///
    /// An empty chain is trivially valid.  Returns `Err` only for store
    /// failures; a broken chain is a successful verification with a
    /// failing report.
    pub fn verify(&self, owner_id: &str) -> LedgerResult<VerificationReport> {
        let mut walk = ChainWalk::new(owner_id);
        let mut page = Pagination::first(self.page_size);

        loop {
            let entries = self.store.list(owner_id, page)?;
            debug!(owner_id, offset = page.offset, fetched = entries.len(), "verifying page");

            for entry in &entries {
                if let Some(report) = walk.check(entry) {
                    return Ok(report);
                }
            }

            if entries.len() < page.limit {
                break;
            }
            page = page.next();
        }

        let report = walk.finish();
        info!(
            owner_id,
            total_records = report.total_records,
            "chain verification passed"
        );
        Ok(report)
    }
}
