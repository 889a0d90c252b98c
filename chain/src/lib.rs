//! Chain collaborators for the offset agent.
//!
//! - [`ChainNetwork`]: gas price, nonce, chain id, gas estimation, calls and raw submission
//! - [`AccountDirectory`]: the ordered list of known on-chain accounts
//! - [`HttpChain`]: both traits over an alloy HTTP provider
//! - [`CreditToken`]: the VCU token's `balanceOf` and `burn`, bound with `sol!`

pub mod accounts;
pub mod error;
pub mod network;
pub mod provider;
pub mod token;

pub use accounts::StaticAccounts;
pub use alloy::primitives::Bytes;
pub use alloy::rpc::types::TransactionRequest;
pub use error::ChainError;
pub use network::{AccountDirectory, ChainNetwork};
pub use provider::HttpChain;
pub use token::CreditToken;
