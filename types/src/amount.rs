//! Energy, footprint and credit quantities.
//!
//! Energy and footprint are measured quantities and stay floating point.
//! Credit volumes are whole token units and are integers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU64;

/// Energy consumed, in kilowatt-hours, as measured by the caller.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct EnergyConsumption(f64);

impl EnergyConsumption {
    pub fn from_kwh(kwh: f64) -> Self {
        Self(kwh)
    }

    pub fn kwh(&self) -> f64 {
        self.0
    }
}

impl fmt::Display for EnergyConsumption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} kWh", self.0)
    }
}

/// CO2 mass derived from consumption and an emission factor.
///
/// The value is `kWh * gCO2/Wh`, which the credit burner then reads as whole
/// kilograms. See the unit note on [`CreditVolume`].
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct FootprintMass(f64);

impl FootprintMass {
    pub fn new(value: f64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl fmt::Display for FootprintMass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} kgCO2", self.0)
    }
}

/// A whole number of credit tokens to burn. Always at least one.
///
/// One token nominally retires one tonne of CO2, while the volume is taken
/// from the footprint truncated to whole kilograms. The two scales do not
/// agree; the mismatch is kept as-is and called out in DESIGN.md.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CreditVolume(NonZeroU64);

impl CreditVolume {
    /// The smallest burnable volume.
    pub const ONE: Self = Self(NonZeroU64::MIN);

    /// Returns `None` for zero.
    pub fn new(units: u64) -> Option<Self> {
        NonZeroU64::new(units).map(Self)
    }

    pub fn get(&self) -> u64 {
        self.0.get()
    }
}

impl fmt::Display for CreditVolume {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} VCU", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credit_volume_rejects_zero() {
        assert!(CreditVolume::new(0).is_none());
        assert_eq!(CreditVolume::new(1), Some(CreditVolume::ONE));
    }

    #[test]
    fn credit_volume_display() {
        assert_eq!(CreditVolume::new(42).unwrap().to_string(), "42 VCU");
    }

    #[test]
    fn credit_volume_serializes_as_integer() {
        let json = serde_json::to_string(&CreditVolume::new(7).unwrap()).unwrap();
        assert_eq!(json, "7");
    }
}
