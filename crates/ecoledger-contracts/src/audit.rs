//! Audit trail types.
//!
//! The audit trail is a second, independent append-only log of
//! security-relevant actions, partitioned per actor. It has no foreign-key
//! dependency on the ledger and is never mutated: entries are written once
//! and range-scanned, most recent first.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Hard cap on the number of entries a single audit scan may return.
///
/// Pagination beyond this is by tightening the `until` bound from the last
/// returned entry — never by offset, which is disallowed on a write-heavy
/// partitioned log.
pub const MAX_SCAN_LIMIT: usize = 500;

/// The bounded vocabulary of tracked actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditAction {
    Create,
    Update,
    Delete,
    Login,
    Logout,
    Verify,
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            AuditAction::Create => "create",
            AuditAction::Update => "update",
            AuditAction::Delete => "delete",
            AuditAction::Login => "login",
            AuditAction::Logout => "logout",
            AuditAction::Verify => "verify",
        };
        f.write_str(s)
    }
}

/// One immutable row in an actor's audit partition.
///
/// Partition key is `actor_id`; clustering is `(occurred_at DESC,
/// audit_id ASC)`, which fixes the "most recent first" scan order and makes
/// pagination deterministic for same-timestamp entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// The identity that performed the action (partition key).
    pub actor_id: String,

    /// When the action happened (first clustering component).
    pub occurred_at: DateTime<Utc>,

    /// Unique tiebreaker for same-timestamp entries (second clustering
    /// component).
    pub audit_id: Uuid,

    /// What was done.
    pub action: AuditAction,

    /// Name of the entity type affected (e.g. "activity", "hash_chain").
    pub target_entity: String,

    /// Identifier of the specific affected entity, empty if none.
    pub target_id: String,

    /// Field-name to description-of-change map. BTreeMap keeps the
    /// serialized form deterministic.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub detail: BTreeMap<String, String>,

    /// Caller network origin, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,

    /// Human-readable summary of the action.
    pub description: String,
}

/// The caller-supplied part of an audit entry.
///
/// `AuditRecorder::record` stamps `occurred_at` and a fresh `audit_id` on
/// top of this to produce the stored [`AuditEntry`].
#[derive(Debug, Clone)]
pub struct ActionRecord {
    pub actor_id: String,
    pub action: AuditAction,
    pub target_entity: String,
    pub target_id: String,
    pub detail: BTreeMap<String, String>,
    pub origin: Option<String>,
    pub description: String,
}

impl ActionRecord {
    /// A record with no detail map and no origin.
    pub fn new(
        actor_id: impl Into<String>,
        action: AuditAction,
        target_entity: impl Into<String>,
        target_id: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            actor_id: actor_id.into(),
            action,
            target_entity: target_entity.into(),
            target_id: target_id.into(),
            detail: BTreeMap::new(),
            origin: None,
            description: description.into(),
        }
    }
}

/// A range scan over one actor's audit partition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditScan {
    /// The partition to scan (required — cross-partition scans are not part
    /// of the contract).
    pub actor_id: String,

    /// Inclusive lower time bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub since: Option<DateTime<Utc>>,

    /// Inclusive upper time bound. Pagination tightens this bound from the
    /// last returned entry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub until: Option<DateTime<Utc>>,

    /// Maximum entries to return; clamped to [`MAX_SCAN_LIMIT`].
    pub limit: usize,
}

impl AuditScan {
    /// Scan the most recent `limit` entries for `actor_id`.
    pub fn latest(actor_id: impl Into<String>, limit: usize) -> Self {
        Self {
            actor_id: actor_id.into(),
            since: None,
            until: None,
            limit,
        }
    }

    /// The limit to actually apply: the requested limit capped at
    /// [`MAX_SCAN_LIMIT`], and at least 1.
    pub fn effective_limit(&self) -> usize {
        self.limit.clamp(1, MAX_SCAN_LIMIT)
    }
}
