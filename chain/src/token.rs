//! The VCU credit token contract.
//!
//! Only two functions are used: `balanceOf(address)` to read the agent's
//! credit balance and `burn(uint256)` to retire credits.

use alloy::network::TransactionBuilder;
use alloy::primitives::{Bytes, U256};
use alloy::rpc::types::TransactionRequest;
use alloy::sol;
use alloy::sol_types::{SolCall, SolValue};
use offset_types::{ChainAddress, CreditVolume};
use tracing::debug;

use crate::{ChainError, ChainNetwork};

sol! {
    interface IVerifiedCarbonUnit {
        function balanceOf(address owner) external view returns (uint256);
        function burn(uint256 amount) external;
    }
}

/// The credit token contract at a fixed address.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CreditToken {
    address: ChainAddress,
}

impl CreditToken {
    pub fn new(address: ChainAddress) -> Self {
        Self { address }
    }

    pub fn address(&self) -> &ChainAddress {
        &self.address
    }

    /// `balanceOf(owner)` as a read-only call.
    pub fn balance_of_call(&self, owner: &ChainAddress) -> TransactionRequest {
        let call = IVerifiedCarbonUnit::balanceOfCall {
            owner: (*owner).into(),
        };
        TransactionRequest::default()
            .with_to(self.address.into())
            .with_input(call.abi_encode())
    }

    /// Read the credit balance of `owner`.
    ///
    /// Balances that do not fit in a `u128` saturate; any such balance covers
    /// every possible burn volume.
    pub async fn balance_of<C>(&self, chain: &C, owner: &ChainAddress) -> Result<u128, ChainError>
    where
        C: ChainNetwork + ?Sized,
    {
        let output = chain.call(&self.balance_of_call(owner)).await?;
        let balance = IVerifiedCarbonUnit::balanceOfCall::abi_decode_returns(&output)
            .map_err(|e| ChainError::InvalidResponse(format!("balanceOf: {e}")))?;
        let balance = u128::try_from(balance).unwrap_or(u128::MAX);
        debug!(owner = %owner, balance, token = %self.address, "credit balance read");
        Ok(balance)
    }

    /// The unsigned `burn(volume)` transaction, sent from `from`. Gas, nonce
    /// and chain id are left for the caller to fill in.
    pub fn burn_call(&self, from: ChainAddress, volume: CreditVolume) -> TransactionRequest {
        let call = IVerifiedCarbonUnit::burnCall {
            amount: U256::from(volume.get()),
        };
        TransactionRequest::default()
            .with_from(from.into())
            .with_to(self.address.into())
            .with_input(call.abi_encode())
    }
}

/// The calldata a request carries, empty if it has none.
pub fn calldata(request: &TransactionRequest) -> &[u8] {
    request.input.input().map_or(&[], |input| &input[..])
}

/// ABI-encode a balance as `balanceOf` returns it.
pub fn encode_balance(balance: u128) -> Bytes {
    U256::from(balance).abi_encode().into()
}

/// The owner argument of a `balanceOf` calldata, if `data` is one.
pub fn decode_balance_of(data: &[u8]) -> Option<ChainAddress> {
    IVerifiedCarbonUnit::balanceOfCall::abi_decode(data)
        .ok()
        .map(|call| call.owner.into())
}

/// The volume argument of a `burn` calldata, if `data` is one.
pub fn decode_burn(data: &[u8]) -> Option<u128> {
    IVerifiedCarbonUnit::burnCall::abi_decode(data)
        .ok()
        .map(|call| u128::try_from(call.amount).unwrap_or(u128::MAX))
}
