//! Activity catalog types and configuration schema.
//!
//! A `CatalogConfig` is deserialized from TOML and holds the bounded
//! activity vocabulary: one `EmissionFactor` per activity kind, naming the
//! parameter the caller measures and the factor that converts it to kg
//! CO2e. The ledger core never sees these — it consumes only the resulting
//! quantity + unit.

use serde::{Deserialize, Serialize};

/// The measured parameter an activity kind is priced in.
///
/// Expressed in kebab-case in TOML:
/// ```toml
/// parameter = "distance-km"
/// parameter = "energy-kwh"
/// parameter = "weight-kg"
/// parameter = "money-spent"
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActivityParameter {
    DistanceKm,
    EnergyKwh,
    WeightKg,
    MoneySpent,
}

impl std::fmt::Display for ActivityParameter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ActivityParameter::DistanceKm => "distance-km",
            ActivityParameter::EnergyKwh => "energy-kwh",
            ActivityParameter::WeightKg => "weight-kg",
            ActivityParameter::MoneySpent => "money-spent",
        };
        f.write_str(s)
    }
}

/// One entry in the activity vocabulary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmissionFactor {
    /// The activity kind, as it appears in ledger entries (lowercase).
    pub kind: String,

    /// Human-readable explanation of what this kind covers.
    pub description: String,

    /// The parameter a caller supplies when recording this kind.
    pub parameter: ActivityParameter,

    /// kg CO2e emitted per unit of `parameter`.
    pub factor: f64,

    /// Unit tag attached to the computed quantity.
    #[serde(default = "default_unit")]
    pub unit: String,
}

fn default_unit() -> String {
    "kg".to_string()
}

/// The full catalog document as loaded from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default)]
    pub activities: Vec<EmissionFactor>,
}
