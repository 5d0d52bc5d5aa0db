//! Chain verification report.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The outcome of walking one owner's chain and re-deriving every digest.
///
/// Consumed as-is by callers (e.g. an HTTP handler rendering a verification
/// endpoint). On failure, `total_records` is the number of entries scanned
/// up to and including the first invalid one, so an operator knows how deep
/// the intact prefix runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationReport {
    /// True if every link and every digest checked out.
    pub valid: bool,

    /// Entries scanned. Equal to the chain length when valid.
    pub total_records: u64,

    /// Human-readable summary of the result.
    pub message: String,

    /// The id of the first entry whose stored digests no longer match,
    /// when invalid.
    #[serde(
        rename = "invalid_record_id",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub first_invalid_id: Option<Uuid>,
}

impl VerificationReport {
    /// A passing report over `total_records` entries.
    pub fn valid(total_records: u64) -> Self {
        let message = if total_records == 0 {
            "empty chain, nothing to verify".to_string()
        } else {
            format!("chain intact: all {} records verified", total_records)
        };
        Self {
            valid: true,
            total_records,
            message,
            first_invalid_id: None,
        }
    }

    /// A failing report pointing at the first broken entry.
    pub fn invalid(total_records: u64, first_invalid_id: Uuid, message: impl Into<String>) -> Self {
        Self {
            valid: false,
            total_records,
            message: message.into(),
            first_invalid_id: Some(first_invalid_id),
        }
    }
}
