//! Wallet core for the offset agent.
//!
//! Provides the signing identity a burn is authorized with:
//! - Ethereum V3 keyfiles (scrypt or PBKDF2, AES-128-CTR), read and written
//! - The [`SigningIdentityProvider`] seam and its keyfile-backed implementation

pub mod error;
pub mod identity;
pub mod keystore;

pub use error::WalletError;
pub use identity::{KeyfileSigningIdentity, SigningIdentityProvider};
pub use keystore::{create_keyfile, load_keyfile};
