use thiserror::Error;

#[derive(Debug, Error)]
pub enum WalletError {
    #[error("key error: {0}")]
    Key(String),

    #[error("keyfile unavailable: {0}")]
    Unavailable(String),

    #[error("keyfile address {stored} does not match key address {derived}")]
    AddressMismatch { stored: String, derived: String },

    #[error("{0}")]
    Other(String),
}
