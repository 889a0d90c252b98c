//! Parsing errors for the fundamental types.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid chain address: {0}")]
    InvalidAddress(String),

    #[error("address {0} does not match its EIP-55 checksum")]
    InvalidChecksum(String),

    #[error("invalid transaction hash: {0}")]
    InvalidHash(String),

    #[error("invalid private key: {0}")]
    InvalidPrivateKey(String),
}
