//! Canonical digest computation (the hash engine).
//!
//! A stateless, pure function: the same inputs always produce the same
//! digest, with no I/O and no hidden state.  Both the builder (at append
//! time) and the verifier (at re-derivation time) go through this module,
//! so the encoding below is the integrity contract of the whole system.
//!
//! Digest input layout (bytes, in order, NUL-delimited):
//!   1. previous digest as 64 lowercase ASCII hex chars
//!   2. owner_id as UTF-8 bytes
//!   3. kind as UTF-8 bytes
//!   4. quantity as a fixed 6-decimal string (forced trailing zeros)
//!   5. occurred_at as RFC 3339 with explicit offset
//!
//! The 0x00 delimiter cannot appear inside any field — `entry_digest`
//! rejects inputs containing it — so the encoding is unambiguous without
//! length prefixes.

use chrono::{DateTime, FixedOffset};
use sha2::{Digest, Sha256};

use ecoledger_contracts::{LedgerError, LedgerResult};

/// Field separator in the canonical payload.
const DELIMITER: [u8; 1] = [0x00];

/// Render `quantity` in its canonical fixed-precision form: six decimal
/// places, forced trailing zeros (`5.0` → `"5.000000"`).
///
/// This string — not the raw float — is what the digest commits to, so
/// re-deriving it from a stored `f64` cannot drift across
/// serialize/deserialize round trips.
///
/// # Errors
///
/// `EncodingError` if `quantity` is not finite or is negative.
pub fn format_quantity(quantity: f64) -> LedgerResult<String> {
    if !quantity.is_finite() {
        return Err(LedgerError::EncodingError {
            reason: format!("quantity must be finite, got {}", quantity),
        });
    }
    if quantity < 0.0 {
        return Err(LedgerError::EncodingError {
            reason: format!("quantity must be non-negative, got {}", quantity),
        });
    }
    Ok(format!("{:.6}", quantity))
}

/// Render `occurred_at` in its canonical form: RFC 3339 with the explicit
/// offset the caller supplied (e.g. `2025-01-01T00:00:00+00:00`).
pub fn canonical_timestamp(occurred_at: &DateTime<FixedOffset>) -> String {
    occurred_at.to_rfc3339()
}

/// Compute the SHA-256 digest for one ledger entry.
///
/// Commits to the back-link (`previous_digest`) and the four protected
/// fields: `owner_id`, `kind`, `quantity`, `occurred_at`. `unit`,
/// `annotation`, and `supplementary_data` are deliberately excluded.
///
/// Returns a lowercase 64-character hex string.
///
/// # Errors
///
/// `EncodingError` if `quantity` is non-finite or negative, or if any
/// string field contains the NUL delimiter byte.
pub fn entry_digest(
    previous_digest: &str,
    owner_id: &str,
    kind: &str,
    quantity: f64,
    occurred_at: &DateTime<FixedOffset>,
) -> LedgerResult<String> {
    reject_delimiter("previous_digest", previous_digest)?;
    reject_delimiter("owner_id", owner_id)?;
    reject_delimiter("kind", kind)?;

    let quantity_str = format_quantity(quantity)?;
    let timestamp_str = canonical_timestamp(occurred_at);

    let mut hasher = Sha256::new();
    hasher.update(previous_digest.as_bytes());
    hasher.update(DELIMITER);
    hasher.update(owner_id.as_bytes());
    hasher.update(DELIMITER);
    hasher.update(kind.as_bytes());
    hasher.update(DELIMITER);
    hasher.update(quantity_str.as_bytes());
    hasher.update(DELIMITER);
    hasher.update(timestamp_str.as_bytes());

    Ok(hex::encode(hasher.finalize()))
}

fn reject_delimiter(field: &str, value: &str) -> LedgerResult<()> {
    if value.as_bytes().contains(&0x00) {
        return Err(LedgerError::EncodingError {
            reason: format!("{} must not contain the NUL delimiter byte", field),
        });
    }
    Ok(())
}
