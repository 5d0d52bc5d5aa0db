//! # ecoledger-verify
//!
//! Chain verification for the EcoLedger tamper-evident ledger.
//!
//! This crate provides [`engine::ChainVerifier`], which walks one owner's
//! chain out of a [`ecoledger_core::traits::ChainStore`] and re-derives
//! every digest, plus the pure helpers [`engine::verify_entries`] (verify a
//! sequence already in memory) and [`engine::verify_entry`] (check a single
//! record against its own back-link).
//!
//! A failed verification is reported, never auto-repaired.

pub mod engine;

pub use engine::{verify_entries, verify_entry, ChainVerifier};
