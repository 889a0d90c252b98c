use offset_chain::ChainError;
use offset_crypto::CryptoError;
use offset_footprint::FootprintError;
use offset_store::StoreError;
use offset_types::{CreditVolume, FootprintMass, Region, TxHash};
use offset_wallet_core::WalletError;
use thiserror::Error;

/// How a caller should react to an [`OffsetError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorClass {
    /// Bad input; fix the request.
    Validation,
    /// The agent's environment is wrong (keys, accounts, region table).
    Configuration,
    /// The request never reached a decision point; safe to retry.
    Transport,
    /// A transaction may or may not have been broadcast. Reconcile by hash
    /// before retrying or credits may be burned twice.
    Uncertain,
}

#[derive(Debug, Error)]
pub enum OffsetError {
    #[error("no emission factor for region {0}")]
    RegionNotFound(Region),

    #[error("emission factor {value} for region {region} is not a positive number")]
    InvalidEmissionFactor { region: Region, value: f64 },

    #[error("footprint {0} is below one credit unit")]
    SubThresholdFootprint(FootprintMass),

    #[error("footprint {0} exceeds the largest burnable credit volume")]
    FootprintTooLarge(FootprintMass),

    #[error("no chain accounts configured")]
    NoAccountsConfigured,

    #[error("insufficient credit balance: requested {requested}, available {available}")]
    InsufficientBalance {
        requested: CreditVolume,
        available: u128,
    },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("burn submission outcome unknown for transaction {hash}: {reason}")]
    SubmissionUncertain { hash: TxHash, reason: String },

    #[error("signing identity unavailable: {0}")]
    SigningIdentity(String),

    #[error("config error: {0}")]
    Config(String),
}

impl OffsetError {
    pub fn class(&self) -> ErrorClass {
        match self {
            OffsetError::RegionNotFound(_)
            | OffsetError::SubThresholdFootprint(_)
            | OffsetError::FootprintTooLarge(_) => ErrorClass::Validation,
            OffsetError::InsufficientBalance { .. } => ErrorClass::Validation,
            OffsetError::InvalidEmissionFactor { .. }
            | OffsetError::NoAccountsConfigured
            | OffsetError::SigningIdentity(_)
            | OffsetError::Config(_) => ErrorClass::Configuration,
            OffsetError::Transport(_) => ErrorClass::Transport,
            OffsetError::SubmissionUncertain { .. } => ErrorClass::Uncertain,
        }
    }

    /// Only transport failures are known to be safe to repeat as-is.
    pub fn is_retryable(&self) -> bool {
        self.class() == ErrorClass::Transport
    }

    /// Wrap a chain failure at `step` as a transport error.
    pub(crate) fn chain(step: &str, err: ChainError) -> Self {
        OffsetError::Transport(format!("{step}: {err}"))
    }
}

impl From<FootprintError> for OffsetError {
    fn from(e: FootprintError) -> Self {
        match e {
            FootprintError::RegionNotFound(region) => OffsetError::RegionNotFound(region),
            FootprintError::InvalidFactor { region, value } => {
                OffsetError::InvalidEmissionFactor { region, value }
            }
            FootprintError::Lookup(StoreError::Corruption(message)) => {
                OffsetError::Config(format!("region table: {message}"))
            }
            FootprintError::Lookup(store) => OffsetError::Transport(format!("region lookup: {store}")),
        }
    }
}

impl From<WalletError> for OffsetError {
    fn from(e: WalletError) -> Self {
        OffsetError::SigningIdentity(e.to_string())
    }
}

impl From<CryptoError> for OffsetError {
    fn from(e: CryptoError) -> Self {
        OffsetError::SigningIdentity(e.to_string())
    }
}
