//! Error types for the EcoLedger core.
//!
//! All fallible operations in the workspace return `LedgerResult<T>`.
//! Variants carry enough context to triage a broken chain or a lost write
//! without re-running the operation.

use thiserror::Error;

/// The unified error type for the EcoLedger core.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// An optimistic append lost the race against a concurrent append for
    /// the same owner.
    ///
    /// Recoverable: re-read the tail and retry. Never user-fatal.
    #[error("chain conflict for owner '{owner_id}': expected tail digest {expected}, found {found}")]
    ChainConflict {
        owner_id: String,
        expected: String,
        found: String,
    },

    /// The verifier found a digest mismatch in a stored chain.
    ///
    /// A security-relevant finding, not a transient error. Never
    /// auto-repaired.
    #[error("chain corruption for owner '{owner_id}' at entry {entry_id}: {reason}")]
    ChainCorruption {
        owner_id: String,
        entry_id: String,
        reason: String,
    },

    /// An entry with the same id already exists in the store.
    #[error("duplicate ledger entry id {id}")]
    DuplicateEntry { id: String },

    /// The underlying store is unreachable or refused the operation.
    ///
    /// Ledger appends should be retried with backoff; audit writes may be
    /// dropped after a bounded retry.
    #[error("storage unavailable ({store}): {reason}")]
    StorageUnavailable { store: String, reason: String },

    /// Malformed input to the digest function, rejected before any store
    /// write (non-finite quantity, embedded NUL delimiter, ...).
    #[error("encoding error: {reason}")]
    EncodingError { reason: String },

    /// An audit entry could not be persisted.
    #[error("audit write failed: {reason}")]
    AuditWriteFailed { reason: String },

    /// An activity kind outside the catalog's bounded vocabulary.
    #[error("unknown activity kind '{kind}'")]
    UnknownActivity { kind: String },

    /// A configuration value is missing or invalid.
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },
}

/// Convenience alias used throughout the EcoLedger crates.
pub type LedgerResult<T> = Result<T, LedgerError>;
