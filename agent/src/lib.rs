//! The carbon offset agent.
//!
//! Turns an energy consumption in a region into burned carbon credits:
//!
//! 1. [`FootprintCalculator`](offset_footprint::FootprintCalculator) resolves
//!    the region's emission factor and computes the footprint.
//! 2. [`validate_volume`] truncates the footprint to whole credit units.
//! 3. [`CreditBurner`] checks the on-chain balance, then signs and submits a
//!    `burn(volume)` transaction on the credit token.
//!
//! [`Assessor`] covers the first two without touching the chain;
//! [`OffsetAgent`] composes all three. Every step is awaited in order; there
//! is no internal parallelism and no retry.

pub mod burner;
pub mod config;
pub mod error;
pub mod logging;
pub mod pricing;
pub mod spans;
pub mod workflow;

pub use burner::{validate_volume, BurnTransaction, CreditBurner};
pub use config::OffsetConfig;
pub use error::{ErrorClass, OffsetError};
pub use logging::{init_logging, LogFormat};
pub use pricing::{estimated_cost, VCU_PRICE_USD};
pub use workflow::{Assessor, FootprintAssessment, OffsetAgent, OffsetReceipt};
