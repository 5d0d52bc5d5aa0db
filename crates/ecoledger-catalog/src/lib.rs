//! # ecoledger-catalog
//!
//! The bounded activity vocabulary and emission factors for EcoLedger.
//!
//! The ledger core treats emission computation as an opaque external
//! collaborator producing a quantity + unit; this crate is that
//! collaborator's reference implementation. Catalogs load from TOML (see
//! [`engine::ActivityCatalog::from_file`]) or ship built-in
//! ([`engine::ActivityCatalog::builtin`]).

pub mod engine;
pub mod factor;

pub use engine::{ActivityCatalog, EmissionEstimate};
pub use factor::{ActivityParameter, CatalogConfig, EmissionFactor};
