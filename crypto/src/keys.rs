//! secp256k1 key generation and address derivation.

use alloy::signers::local::PrivateKeySigner;
use offset_types::{ChainAddress, PrivateKey, SigningIdentity};

use crate::CryptoError;

/// Generate a new private key from a secure random source.
pub fn generate_private_key() -> PrivateKey {
    PrivateKey(PrivateKeySigner::random().to_bytes().0)
}

/// A local signer over `private`. It holds its own copy of the scalar and
/// zeroizes it on drop.
pub(crate) fn signer(private: &PrivateKey) -> Result<PrivateKeySigner, CryptoError> {
    PrivateKeySigner::from_slice(private.as_bytes()).map_err(|_| CryptoError::InvalidPrivateKey)
}

/// Derive the chain address controlled by a private key.
pub fn derive_address(private: &PrivateKey) -> Result<ChainAddress, CryptoError> {
    Ok(signer(private)?.address().into())
}

/// Build a full signing identity from a private key.
pub fn identity_from_private(private: PrivateKey) -> Result<SigningIdentity, CryptoError> {
    let address = derive_address(&private)?;
    Ok(SigningIdentity { address, private })
}
