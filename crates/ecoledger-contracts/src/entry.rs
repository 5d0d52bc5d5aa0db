//! Ledger entry types.
//!
//! A `LedgerEntry` is one link in a per-owner, SHA-256 hash-linked chain of
//! recorded activities. Entries are created exactly once (append), read many
//! times, and never updated or deleted by the core — a retroactive edit of
//! any protected field is a chain-breaking event the verifier detects.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One activity record in an owner's hash-linked chain.
///
/// The digest covers `previous_digest`, `owner_id`, `kind`, `quantity`, and
/// `occurred_at`. `unit`, `annotation`, and `supplementary_data` are outside
/// the integrity boundary by design — only the four core fields plus the
/// back-link are protected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Unique identifier, assigned at creation, immutable.
    pub id: Uuid,

    /// The chain this entry belongs to. One chain per owner; chains of
    /// different owners are fully independent.
    pub owner_id: String,

    /// Activity category tag from a bounded vocabulary (e.g. "car", "bus").
    pub kind: String,

    /// Magnitude of the measured value (kg CO2e). Finite and non-negative.
    pub quantity: f64,

    /// Unit-of-measure tag paired with `quantity`.
    pub unit: String,

    /// When the activity happened, with the caller's timezone offset
    /// preserved. Canonical digest form is RFC 3339.
    pub occurred_at: DateTime<FixedOffset>,

    /// The `current_digest` of the immediately preceding entry for the same
    /// owner, or [`LedgerEntry::GENESIS_DIGEST`] for the first entry.
    pub previous_digest: String,

    /// SHA-256 (lowercase hex) over the canonical serialization of
    /// {previous_digest, owner_id, kind, quantity, occurred_at}.
    ///
    /// Never recomputed or mutated after creation.
    pub current_digest: String,

    /// Optional free-text description. Not a digest input.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotation: Option<String>,

    /// Optional structured payload (e.g. the parameters the emission was
    /// computed from). Opaque to the core and not a digest input.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplementary_data: Option<serde_json::Value>,
}

impl LedgerEntry {
    /// The well-known `previous_digest` of the first entry in every chain.
    ///
    /// 64 hex zeros — a value that can never be the SHA-256 of real data,
    /// making genesis detection unambiguous.
    pub const GENESIS_DIGEST: &'static str =
        "0000000000000000000000000000000000000000000000000000000000000000";

    /// True if `digest` is the genesis sentinel.
    pub fn is_genesis(digest: &str) -> bool {
        digest == Self::GENESIS_DIGEST
    }
}

/// Offset/limit pagination for ordered ledger reads.
///
/// `ChainStore::list` returns entries in ascending `occurred_at` order (ties
/// broken by insertion order), so a fixed offset is stable for an
/// append-only chain.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Pagination {
    /// Number of entries to skip from the start of the chain.
    pub offset: usize,

    /// Maximum number of entries to return.
    pub limit: usize,
}

impl Pagination {
    /// A page starting at the beginning of the chain.
    pub fn first(limit: usize) -> Self {
        Self { offset: 0, limit }
    }

    /// The page immediately after this one.
    pub fn next(self) -> Self {
        Self {
            offset: self.offset + self.limit,
            limit: self.limit,
        }
    }
}
