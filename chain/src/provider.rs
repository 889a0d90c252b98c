//! [`ChainNetwork`] and [`AccountDirectory`] over an alloy HTTP provider.

use alloy::primitives::Bytes;
use alloy::providers::{Provider, RootProvider};
use alloy::rpc::types::TransactionRequest;
use alloy::transports::{RpcError, TransportError};
use async_trait::async_trait;
use offset_types::{ChainAddress, TxHash};
use reqwest::Url;
use tracing::debug;

use crate::{AccountDirectory, ChainError, ChainNetwork};

/// A JSON-RPC node reached over HTTP.
///
/// The provider carries no fillers: gas price, nonce and chain id are read
/// explicitly by the burner and set on the request before signing.
#[derive(Clone, Debug)]
pub struct HttpChain {
    provider: RootProvider,
    url: String,
}

impl HttpChain {
    pub fn connect(url: &str) -> Result<Self, ChainError> {
        let parsed: Url = url
            .parse()
            .map_err(|e| ChainError::InvalidEndpoint(format!("{url}: {e}")))?;
        Ok(Self {
            provider: RootProvider::new_http(parsed),
            url: url.to_string(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

fn rpc_error(method: &str, err: TransportError) -> ChainError {
    match err {
        RpcError::ErrorResp(payload) => ChainError::Rpc {
            code: payload.code,
            message: payload.message.to_string(),
        },
        RpcError::Transport(kind) => ChainError::Transport(format!("{method}: {kind}")),
        other => ChainError::InvalidResponse(format!("{method}: {other}")),
    }
}

#[async_trait]
impl ChainNetwork for HttpChain {
    async fn chain_id(&self) -> Result<u64, ChainError> {
        self.provider
            .get_chain_id()
            .await
            .map_err(|e| rpc_error("eth_chainId", e))
    }

    async fn gas_price(&self) -> Result<u128, ChainError> {
        self.provider
            .get_gas_price()
            .await
            .map_err(|e| rpc_error("eth_gasPrice", e))
    }

    async fn transaction_count(&self, address: &ChainAddress) -> Result<u64, ChainError> {
        self.provider
            .get_transaction_count((*address).into())
            .await
            .map_err(|e| rpc_error("eth_getTransactionCount", e))
    }

    async fn estimate_gas(&self, request: &TransactionRequest) -> Result<u64, ChainError> {
        self.provider
            .estimate_gas(request.clone())
            .await
            .map_err(|e| rpc_error("eth_estimateGas", e))
    }

    async fn call(&self, request: &TransactionRequest) -> Result<Bytes, ChainError> {
        self.provider
            .call(request.clone())
            .await
            .map_err(|e| rpc_error("eth_call", e))
    }

    async fn send_raw_transaction(&self, raw: &[u8]) -> Result<TxHash, ChainError> {
        let pending = self
            .provider
            .send_raw_transaction(raw)
            .await
            .map_err(|e| rpc_error("eth_sendRawTransaction", e))?;
        let hash = TxHash::from(*pending.tx_hash());
        debug!(tx_hash = %hash, endpoint = %self.url, "raw transaction accepted");
        Ok(hash)
    }
}

#[async_trait]
impl AccountDirectory for HttpChain {
    async fn list_accounts(&self) -> Result<Vec<ChainAddress>, ChainError> {
        let accounts = self
            .provider
            .get_accounts()
            .await
            .map_err(|e| rpc_error("eth_accounts", e))?;
        Ok(accounts.into_iter().map(ChainAddress::from).collect())
    }
}
