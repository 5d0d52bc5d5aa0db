//! # ecoledger-core
//!
//! The EcoLedger core: storage ports, the canonical digest function, and
//! the chain-building orchestrator.
//!
//! This crate provides:
//! - The two storage traits (`ChainStore`, `AuditStore`)
//! - The `digest` module — the stateless hash engine both builder and
//!   verifier share
//! - The `ChainBuilder` with its per-owner optimistic append protocol
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ecoledger_core::{ChainBuilder, builder::ActivityDraft, traits::ChainStore};
//! ```

pub mod builder;
pub mod digest;
pub mod traits;

pub use builder::{ActivityDraft, ChainBuilder, PendingEntry};
