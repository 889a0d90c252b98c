//! Signing for the offset agent.
//!
//! - **secp256k1** keys and address derivation, via alloy's local signer
//! - **EIP-155** replay-protected legacy transactions, signed from a
//!   `TransactionRequest` by an `EthereumWallet`
//! - **Keccak-256** transaction hashes

pub mod error;
pub mod hash;
pub mod keys;
pub mod transaction;

pub use error::CryptoError;
pub use hash::hash_transaction;
pub use keys::{derive_address, generate_private_key, identity_from_private};
pub use transaction::{sign_transaction, SignedTransaction};
