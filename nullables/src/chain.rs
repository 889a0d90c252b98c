//! Nullable chain: an in-memory node with one credit token.
//!
//! Answers `balanceOf` calls from a balance table, serves fixed gas price,
//! chain id and gas estimate, and records every raw transaction instead of
//! broadcasting it. Any step can be made to fail or stall.

use async_trait::async_trait;
use offset_chain::token::{calldata, decode_balance_of, encode_balance};
use offset_chain::{AccountDirectory, Bytes, ChainError, ChainNetwork, TransactionRequest};
use offset_crypto::hash_transaction;
use offset_types::{ChainAddress, TxHash};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

/// The individual node requests, for failure injection and call counting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChainStep {
    Accounts,
    Balance,
    ChainId,
    GasPrice,
    Nonce,
    EstimateGas,
    Submit,
}

#[derive(Default)]
struct ChainState {
    accounts: Vec<ChainAddress>,
    balances: HashMap<ChainAddress, u128>,
    nonces: HashMap<ChainAddress, u64>,
    failures: HashMap<ChainStep, ChainError>,
    delays: HashMap<ChainStep, Duration>,
    calls: HashMap<ChainStep, usize>,
    estimates: Vec<TransactionRequest>,
    submitted: Vec<Vec<u8>>,
}

/// A test chain. Thread-safe for use with tokio's multi-threaded runtime.
pub struct NullChain {
    chain_id: u64,
    gas_price: u128,
    gas_estimate: u64,
    state: Mutex<ChainState>,
}

impl NullChain {
    pub fn new() -> Self {
        Self {
            chain_id: 1337,
            gas_price: 20_000_000_000,
            gas_estimate: 21_000,
            state: Mutex::new(ChainState::default()),
        }
    }

    pub fn with_chain_id(mut self, chain_id: u64) -> Self {
        self.chain_id = chain_id;
        self
    }

    pub fn with_gas_price(mut self, gas_price: u128) -> Self {
        self.gas_price = gas_price;
        self
    }

    pub fn with_gas_estimate(mut self, gas: u64) -> Self {
        self.gas_estimate = gas;
        self
    }

    /// Append an account to the node's account list.
    pub fn with_account(self, address: ChainAddress) -> Self {
        self.state.lock().unwrap().accounts.push(address);
        self
    }

    pub fn with_balance(self, address: ChainAddress, balance: u128) -> Self {
        self.set_balance(address, balance);
        self
    }

    pub fn with_nonce(self, address: ChainAddress, nonce: u64) -> Self {
        self.state.lock().unwrap().nonces.insert(address, nonce);
        self
    }

    pub fn set_balance(&self, address: ChainAddress, balance: u128) {
        self.state.lock().unwrap().balances.insert(address, balance);
    }

    /// Make `step` fail with `error` from now on.
    pub fn fail_on(&self, step: ChainStep, error: ChainError) {
        self.state.lock().unwrap().failures.insert(step, error);
    }

    /// Make `step` sleep for `delay` before answering.
    pub fn delay_on(&self, step: ChainStep, delay: Duration) {
        self.state.lock().unwrap().delays.insert(step, delay);
    }

    /// How many times `step` was requested, including failed requests.
    pub fn calls(&self, step: ChainStep) -> usize {
        self.state
            .lock()
            .unwrap()
            .calls
            .get(&step)
            .copied()
            .unwrap_or(0)
    }

    /// Total requests across every step.
    pub fn total_calls(&self) -> usize {
        self.state.lock().unwrap().calls.values().sum()
    }

    /// Every raw transaction handed to the node, including rejected ones.
    pub fn submitted(&self) -> Vec<Vec<u8>> {
        self.state.lock().unwrap().submitted.clone()
    }

    /// Every gas estimate request, in order.
    pub fn estimates(&self) -> Vec<TransactionRequest> {
        self.state.lock().unwrap().estimates.clone()
    }

    /// Count the request, then apply any configured delay and failure.
    async fn enter(&self, step: ChainStep) -> Result<(), ChainError> {
        let (delay, failure) = {
            let mut state = self.state.lock().unwrap();
            *state.calls.entry(step).or_default() += 1;
            (
                state.delays.get(&step).copied(),
                state.failures.get(&step).cloned(),
            )
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        match failure {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl Default for NullChain {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChainNetwork for NullChain {
    async fn chain_id(&self) -> Result<u64, ChainError> {
        self.enter(ChainStep::ChainId).await?;
        Ok(self.chain_id)
    }

    async fn gas_price(&self) -> Result<u128, ChainError> {
        self.enter(ChainStep::GasPrice).await?;
        Ok(self.gas_price)
    }

    async fn transaction_count(&self, address: &ChainAddress) -> Result<u64, ChainError> {
        self.enter(ChainStep::Nonce).await?;
        Ok(self
            .state
            .lock()
            .unwrap()
            .nonces
            .get(address)
            .copied()
            .unwrap_or(0))
    }

    async fn estimate_gas(&self, request: &TransactionRequest) -> Result<u64, ChainError> {
        self.enter(ChainStep::EstimateGas).await?;
        self.state.lock().unwrap().estimates.push(request.clone());
        Ok(self.gas_estimate)
    }

    async fn call(&self, request: &TransactionRequest) -> Result<Bytes, ChainError> {
        self.enter(ChainStep::Balance).await?;
        let owner = decode_balance_of(calldata(request)).ok_or_else(|| ChainError::Rpc {
            code: -32000,
            message: "execution reverted".to_string(),
        })?;
        let balance = self
            .state
            .lock()
            .unwrap()
            .balances
            .get(&owner)
            .copied()
            .unwrap_or(0);
        Ok(encode_balance(balance))
    }

    async fn send_raw_transaction(&self, raw: &[u8]) -> Result<TxHash, ChainError> {
        self.state.lock().unwrap().submitted.push(raw.to_vec());
        self.enter(ChainStep::Submit).await?;
        Ok(hash_transaction(raw))
    }
}

#[async_trait]
impl AccountDirectory for NullChain {
    async fn list_accounts(&self) -> Result<Vec<ChainAddress>, ChainError> {
        self.enter(ChainStep::Accounts).await?;
        Ok(self.state.lock().unwrap().accounts.clone())
    }
}
