//! Footprint calculator.
//!
//! `footprint = consumption (kWh) × emission factor (gCO2/Wh)`
//!
//! The emission factor is resolved fresh from a [`RegionLookup`] on every
//! call; nothing is cached. Apart from that one lookup the calculation has no
//! side effects.
//!
//! [`RegionLookup`]: offset_store::RegionLookup

pub mod calculator;
pub mod error;

pub use calculator::{compute_footprint, FootprintCalculator};
pub use error::FootprintError;
