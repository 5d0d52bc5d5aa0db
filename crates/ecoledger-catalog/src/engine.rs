//! TOML-driven activity catalog.
//!
//! `ActivityCatalog` loads a `CatalogConfig` from a TOML string or file and
//! answers the two questions the surrounding system asks before touching
//! the ledger: is this kind in the bounded vocabulary, and how much CO2e
//! does the measured magnitude amount to. The estimate is a pure
//! computation — nothing is persisted — matching its role as the opaque
//! emission collaborator the ledger core consumes.

use std::collections::HashMap;
use std::path::Path;

use tracing::debug;

use ecoledger_contracts::{LedgerError, LedgerResult};

use crate::factor::{ActivityParameter, CatalogConfig, EmissionFactor};

/// The catalog shipped with the crate: the common transport, energy,
/// waste, and spend-based kinds.
const BUILTIN_CATALOG: &str = r#"
[[activities]]
kind = "car"
description = "Passenger car travel"
parameter = "distance-km"
factor = 0.192

[[activities]]
kind = "motorbike"
description = "Motorbike travel"
parameter = "distance-km"
factor = 0.103

[[activities]]
kind = "bus"
description = "Bus travel"
parameter = "distance-km"
factor = 0.105

[[activities]]
kind = "train"
description = "Rail travel"
parameter = "distance-km"
factor = 0.041

[[activities]]
kind = "flight"
description = "Air travel, economy class"
parameter = "distance-km"
factor = 0.255

[[activities]]
kind = "electricity"
description = "Grid electricity consumption"
parameter = "energy-kwh"
factor = 0.475

[[activities]]
kind = "waste"
description = "Landfilled household waste"
parameter = "weight-kg"
factor = 0.587

[[activities]]
kind = "shopping"
description = "General consumer goods, spend-based"
parameter = "money-spent"
factor = 0.41
"#;

/// A computed emission, ready to be recorded as a ledger quantity.
#[derive(Debug, Clone, PartialEq)]
pub struct EmissionEstimate {
    /// The (normalized) activity kind the estimate is for.
    pub kind: String,

    /// Emitted mass in `unit`.
    pub co2e: f64,

    /// Unit tag, paired with `co2e` when recorded.
    pub unit: String,

    /// Which parameter the magnitude was interpreted as.
    pub parameter: ActivityParameter,
}

/// The bounded activity vocabulary with per-kind emission factors.
#[derive(Debug)]
pub struct ActivityCatalog {
    factors: HashMap<String, EmissionFactor>,
}

impl ActivityCatalog {
    /// Build a catalog from an already-parsed config.
    ///
    /// Returns `ConfigError` for duplicate kinds or a non-finite/negative
    /// factor — a bad factor would silently corrupt every quantity derived
    /// from it.
    pub fn from_config(config: CatalogConfig) -> LedgerResult<Self> {
        let mut factors = HashMap::with_capacity(config.activities.len());
        for factor in config.activities {
            let kind = normalize_kind(&factor.kind);
            if !factor.factor.is_finite() || factor.factor < 0.0 {
                return Err(LedgerError::ConfigError {
                    reason: format!(
                        "activity '{}' has invalid emission factor {}",
                        kind, factor.factor
                    ),
                });
            }
            if factors.insert(kind.clone(), factor).is_some() {
                return Err(LedgerError::ConfigError {
                    reason: format!("duplicate activity kind '{}' in catalog", kind),
                });
            }
        }
        debug!(kinds = factors.len(), "activity catalog loaded");
        Ok(Self { factors })
    }

    /// Parse `s` as TOML and build a catalog.
    pub fn from_toml_str(s: &str) -> LedgerResult<Self> {
        let config: CatalogConfig = toml::from_str(s).map_err(|e| LedgerError::ConfigError {
            reason: format!("failed to parse catalog TOML: {}", e),
        })?;
        Self::from_config(config)
    }

    /// Read the file at `path` and parse it as a catalog.
    pub fn from_file(path: &Path) -> LedgerResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| LedgerError::ConfigError {
            reason: format!("failed to read catalog file '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }

    /// The catalog shipped with the crate.
    pub fn builtin() -> Self {
        Self::from_toml_str(BUILTIN_CATALOG).expect("built-in catalog must be well-formed")
    }

    /// True if `kind` (case-insensitive) is in the vocabulary.
    pub fn contains(&self, kind: &str) -> bool {
        self.factors.contains_key(&normalize_kind(kind))
    }

    /// All kinds in the vocabulary, in no particular order.
    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.factors.keys().map(String::as_str)
    }

    /// Look up the factor entry for `kind`.
    pub fn factor(&self, kind: &str) -> Option<&EmissionFactor> {
        self.factors.get(&normalize_kind(kind))
    }

    /// Compute the emission for `magnitude` units of `kind`'s parameter.
    ///
    /// Pure: same inputs, same estimate, nothing persisted. The caller
    /// records the returned `co2e`/`unit` as the ledger quantity.
    ///
    /// # Errors
    ///
    /// `UnknownActivity` for a kind outside the vocabulary;
    /// `EncodingError` for a non-finite or negative magnitude.
    pub fn estimate(&self, kind: &str, magnitude: f64) -> LedgerResult<EmissionEstimate> {
        let kind = normalize_kind(kind);
        let factor = self
            .factors
            .get(&kind)
            .ok_or_else(|| LedgerError::UnknownActivity { kind: kind.clone() })?;

        if !magnitude.is_finite() || magnitude < 0.0 {
            return Err(LedgerError::EncodingError {
                reason: format!(
                    "magnitude for '{}' must be finite and non-negative, got {}",
                    kind, magnitude
                ),
            });
        }

        Ok(EmissionEstimate {
            kind,
            co2e: factor.factor * magnitude,
            unit: factor.unit.clone(),
            parameter: factor.parameter,
        })
    }
}

/// Kinds are matched case-insensitively and ignore surrounding whitespace;
/// `"car"`, `"CAR"`, and `" Car "` name the same vocabulary entry.
fn normalize_kind(kind: &str) -> String {
    kind.trim().to_lowercase()
}
