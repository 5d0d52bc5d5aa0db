//! # ecoledger-contracts
//!
//! Shared types and error contracts for the EcoLedger tamper-evident
//! activity ledger.
//!
//! All crates in the workspace import from here. No business logic lives in
//! this crate — only data definitions and error types.

pub mod audit;
pub mod entry;
pub mod error;
pub mod report;

pub use audit::{ActionRecord, AuditAction, AuditEntry, AuditScan, MAX_SCAN_LIMIT};
pub use entry::{LedgerEntry, Pagination};
pub use error::{LedgerError, LedgerResult};
pub use report::VerificationReport;
