//! Regions and their emission factors.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An opaque identifier naming a geographic or political area.
///
/// The agent assigns no structure to it; resolution to an emission factor is
/// delegated to a region lookup.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Region(String);

impl Region {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Region {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Region {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Grams of CO2 emitted per watt-hour consumed in a region.
///
/// Always positive and finite.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct EmissionFactor(f64);

impl EmissionFactor {
    /// Wrap a coefficient, rejecting zero, negative and non-finite values.
    pub fn new(grams_per_wh: f64) -> Option<Self> {
        (grams_per_wh.is_finite() && grams_per_wh > 0.0).then_some(Self(grams_per_wh))
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl fmt::Display for EmissionFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} gCO2/Wh", self.0)
    }
}
