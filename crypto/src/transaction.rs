//! Legacy (type 0) transactions with EIP-155 replay protection.

use alloy::eips::eip2718::Encodable2718;
use alloy::network::{EthereumWallet, TransactionBuilder};
use alloy::rpc::types::TransactionRequest;
use offset_types::{PrivateKey, TxHash};

use crate::keys::signer;
use crate::{hash_transaction, CryptoError};

/// A signed transaction ready for `eth_sendRawTransaction`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignedTransaction {
    /// EIP-2718 encoding. For a legacy transaction this is the signed RLP list.
    pub raw: Vec<u8>,
    /// Keccak-256 of `raw`; the hash the chain reports once it accepts the transaction.
    pub hash: TxHash,
}

impl SignedTransaction {
    /// `0x`-prefixed hex of the raw bytes.
    pub fn raw_hex(&self) -> String {
        format!("0x{}", alloy::hex::encode(&self.raw))
    }
}

/// Sign a fully specified request with `private`.
///
/// The request needs `to`, `nonce`, `gas_price`, `gas_limit` and `chain_id`.
/// With a gas price and no fee caps it builds as a legacy transaction, signed
/// with `v = recovery_id + 35 + 2 * chain_id`.
pub async fn sign_transaction(
    request: TransactionRequest,
    private: &PrivateKey,
) -> Result<SignedTransaction, CryptoError> {
    if request.chain_id.is_none() {
        return Err(CryptoError::Signing(
            "request has no chain id; refusing to sign without replay protection".to_string(),
        ));
    }
    let wallet = EthereumWallet::from(signer(private)?);
    let envelope = request
        .build(&wallet)
        .await
        .map_err(|e| CryptoError::Signing(e.to_string()))?;
    let raw = envelope.encoded_2718();
    let hash = hash_transaction(&raw);
    Ok(SignedTransaction { raw, hash })
}
