//! Credit burner: retires VCU tokens with a signed `burn(volume)` transaction.

use alloy::network::TransactionBuilder;
use offset_chain::{AccountDirectory, ChainError, ChainNetwork, CreditToken};
use offset_crypto::sign_transaction;
use offset_types::{ChainAddress, CreditVolume, FootprintMass, TxHash};
use offset_wallet_core::SigningIdentityProvider;
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn, Instrument};

use crate::spans::burn_span;
use crate::OffsetError;

/// Truncate a footprint to whole credit units.
///
/// Anything that truncates below 1 is [`OffsetError::SubThresholdFootprint`],
/// including negative and NaN footprints. Anything that does not fit in a
/// `u64`, infinity included, is [`OffsetError::FootprintTooLarge`].
pub fn validate_volume(footprint: FootprintMass) -> Result<CreditVolume, OffsetError> {
    let truncated = footprint.value().trunc();
    // Written so that NaN fails the comparison.
    if !(truncated >= 1.0) {
        return Err(OffsetError::SubThresholdFootprint(footprint));
    }
    // 2^64 is exact as an f64; everything below it converts without loss of range.
    if truncated >= u64::MAX as f64 {
        return Err(OffsetError::FootprintTooLarge(footprint));
    }
    CreditVolume::new(truncated as u64).ok_or(OffsetError::SubThresholdFootprint(footprint))
}

/// Proof that a burn was submitted. Says nothing about inclusion in a block.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BurnTransaction {
    pub hash: TxHash,
    pub volume: CreditVolume,
    pub sender: ChainAddress,
    pub nonce: u64,
    pub gas_price: u128,
    pub gas_limit: u64,
    pub chain_id: u64,
}

/// Burns credits from the agent's signing identity.
///
/// Holds no state between burns. Two concurrent burns for the same identity
/// can read the same nonce and the same balance; callers that need burns
/// serialized per identity must provide that exclusion themselves.
pub struct CreditBurner {
    identity: Arc<dyn SigningIdentityProvider>,
    accounts: Arc<dyn AccountDirectory>,
    chain: Arc<dyn ChainNetwork>,
    token: CreditToken,
    timeout: Duration,
}

impl CreditBurner {
    pub fn new(
        identity: Arc<dyn SigningIdentityProvider>,
        accounts: Arc<dyn AccountDirectory>,
        chain: Arc<dyn ChainNetwork>,
        token: CreditToken,
        timeout: Duration,
    ) -> Self {
        Self {
            identity,
            accounts,
            chain,
            token,
            timeout,
        }
    }

    pub fn token(&self) -> &CreditToken {
        &self.token
    }

    /// Run one chain request under the configured timeout. Both failure and
    /// expiry are transport errors.
    async fn step<T, F>(&self, name: &str, request: F) -> Result<T, OffsetError>
    where
        F: Future<Output = Result<T, ChainError>>,
    {
        match tokio::time::timeout(self.timeout, request).await {
            Ok(result) => result.map_err(|e| OffsetError::chain(name, e)),
            Err(_) => Err(OffsetError::Transport(format!(
                "{name}: timed out after {:?}",
                self.timeout
            ))),
        }
    }

    /// Burn `volume` credits.
    ///
    /// The balance is read for the first account the directory lists, while
    /// the transaction is signed by the signing identity. Nothing is submitted
    /// unless that balance covers `volume`. Once the signed transaction is
    /// handed to the node, any failure is [`OffsetError::SubmissionUncertain`]
    /// carrying the locally computed hash.
    pub async fn burn(&self, volume: CreditVolume) -> Result<BurnTransaction, OffsetError> {
        self.burn_inner(volume).instrument(burn_span(volume)).await
    }

    async fn burn_inner(&self, volume: CreditVolume) -> Result<BurnTransaction, OffsetError> {
        // Dropped (and zeroized) when this function returns.
        let identity = self.identity.local_signing_identity().await?;

        let accounts = self
            .step("eth_accounts", self.accounts.list_accounts())
            .await?;
        let account = *accounts.first().ok_or(OffsetError::NoAccountsConfigured)?;
        if account != identity.address {
            debug!(account = %account, signer = %identity.address, "balance account differs from signer");
        }

        let balance = self
            .step("balanceOf", self.token.balance_of(self.chain.as_ref(), &account))
            .await?;
        if u128::from(volume.get()) > balance {
            warn!(account = %account, balance, requested = volume.get(), "insufficient credit balance");
            return Err(OffsetError::InsufficientBalance {
                requested: volume,
                available: balance,
            });
        }

        let request = self.token.burn_call(identity.address, volume);
        let gas_price = self.step("eth_gasPrice", self.chain.gas_price()).await?;
        let nonce = self
            .step(
                "eth_getTransactionCount",
                self.chain.transaction_count(&identity.address),
            )
            .await?;
        let chain_id = self.step("eth_chainId", self.chain.chain_id()).await?;
        let gas_limit = self
            .step("eth_estimateGas", self.chain.estimate_gas(&request))
            .await?;

        let request = request
            .with_gas_price(gas_price)
            .with_nonce(nonce)
            .with_chain_id(chain_id)
            .with_gas_limit(gas_limit);
        let signed = sign_transaction(request, &identity.private).await?;
        let sender = identity.address;
        drop(identity);
        debug!(hash = %signed.hash, nonce, gas_price, gas_limit, chain_id, "burn transaction signed");

        let submitted =
            tokio::time::timeout(self.timeout, self.chain.send_raw_transaction(&signed.raw)).await;
        let reason = match submitted {
            Ok(Ok(reported)) => {
                if reported != signed.hash {
                    warn!(local = %signed.hash, reported = %reported, "node reported a different transaction hash");
                }
                info!(hash = %signed.hash, volume = volume.get(), sender = %sender, "burn submitted");
                return Ok(BurnTransaction {
                    hash: signed.hash,
                    volume,
                    sender,
                    nonce,
                    gas_price,
                    gas_limit,
                    chain_id,
                });
            }
            Ok(Err(e)) => e.to_string(),
            Err(_) => format!("eth_sendRawTransaction: timed out after {:?}", self.timeout),
        };
        warn!(hash = %signed.hash, %reason, "burn submission outcome unknown");
        Err(OffsetError::SubmissionUncertain {
            hash: signed.hash,
            reason,
        })
    }
}
