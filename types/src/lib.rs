//! Fundamental types for the carbon offset agent.
//!
//! This crate defines the core types shared across every other crate in the workspace:
//! regions and emission factors, energy and footprint quantities, credit volumes,
//! chain addresses, transaction hashes and the signing identity.

pub mod address;
pub mod amount;
pub mod error;
pub mod hash;
pub mod keys;
pub mod region;

pub use address::ChainAddress;
pub use amount::{CreditVolume, EnergyConsumption, FootprintMass};
pub use error::TypeError;
pub use hash::TxHash;
pub use keys::{PrivateKey, SigningIdentity};
pub use region::{EmissionFactor, Region};
