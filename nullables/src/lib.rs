//! Nullable infrastructure for deterministic testing.
//!
//! Every external collaborator of the agent (region lookup, signing identity,
//! chain network, account directory) sits behind a trait. This crate provides
//! in-memory implementations that:
//! - Return deterministic values
//! - Can be controlled programmatically, including injected failures
//! - Record what was asked of them for assertions
//! - Never touch the filesystem or network
//!
//! Usage: swap real implementations for nullables in tests.

pub mod chain;
pub mod identity;
pub mod region;

pub use chain::{ChainStep, NullChain};
pub use identity::NullSigningIdentity;
pub use region::NullRegionLookup;
