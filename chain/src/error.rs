use thiserror::Error;

#[derive(Clone, Debug, Error)]
pub enum ChainError {
    #[error("invalid chain endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("chain endpoint unreachable: {0}")]
    Transport(String),

    #[error("chain returned error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("invalid response from chain: {0}")]
    InvalidResponse(String),
}
