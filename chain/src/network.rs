//! Collaborator traits for the chain.

use alloy::primitives::Bytes;
use alloy::rpc::types::TransactionRequest;
use async_trait::async_trait;
use offset_types::{ChainAddress, TxHash};

use crate::ChainError;

/// The chain network operations a burn needs.
///
/// Every call is a fresh query; implementations must not cache gas prices or
/// transaction counts.
#[async_trait]
pub trait ChainNetwork: Send + Sync {
    async fn chain_id(&self) -> Result<u64, ChainError>;

    async fn gas_price(&self) -> Result<u128, ChainError>;

    /// Number of transactions sent from `address`, i.e. its next nonce.
    async fn transaction_count(&self, address: &ChainAddress) -> Result<u64, ChainError>;

    async fn estimate_gas(&self, request: &TransactionRequest) -> Result<u64, ChainError>;

    /// Execute a call against the latest block and return the raw return data.
    async fn call(&self, request: &TransactionRequest) -> Result<Bytes, ChainError>;

    /// Broadcast a signed transaction and return the hash the node reports.
    async fn send_raw_transaction(&self, raw: &[u8]) -> Result<TxHash, ChainError>;
}

/// Lists the on-chain accounts known to the node, in node order.
#[async_trait]
pub trait AccountDirectory: Send + Sync {
    async fn list_accounts(&self) -> Result<Vec<ChainAddress>, ChainError>;
}
