//! Credit pricing.
//!
//! There is no price feed. Cost estimates use a fixed price per VCU and are
//! informational only; nothing in the burn depends on them.

use offset_types::CreditVolume;

/// Price of one VCU token, in US dollars.
pub const VCU_PRICE_USD: f64 = 7.5;

/// Estimated cost of retiring `volume` credits at [`VCU_PRICE_USD`].
pub fn estimated_cost(volume: CreditVolume) -> f64 {
    volume.get() as f64 * VCU_PRICE_USD
}
