//! Nullable signing identity: a fixed in-memory key.

use async_trait::async_trait;
use offset_crypto::derive_address;
use offset_types::{ChainAddress, PrivateKey, SigningIdentity};
use offset_wallet_core::{SigningIdentityProvider, WalletError};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Hands out copies of one fixed private key.
pub struct NullSigningIdentity {
    key: [u8; 32],
    address: ChainAddress,
    failure: Mutex<Option<String>>,
    requests: AtomicUsize,
}

impl NullSigningIdentity {
    /// # Panics
    /// If `key` is not a valid secp256k1 scalar.
    pub fn new(key: [u8; 32]) -> Self {
        let address = derive_address(&PrivateKey(key)).expect("test key must be a valid scalar");
        Self {
            key,
            address,
            failure: Mutex::new(None),
            requests: AtomicUsize::new(0),
        }
    }

    /// The address the identity signs for.
    pub fn address(&self) -> ChainAddress {
        self.address
    }

    /// Make every subsequent request fail as if the keyfile were unreadable.
    pub fn fail_with(&self, message: &str) {
        *self.failure.lock().unwrap() = Some(message.to_string());
    }

    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

impl Default for NullSigningIdentity {
    fn default() -> Self {
        Self::new([0x46; 32])
    }
}

#[async_trait]
impl SigningIdentityProvider for NullSigningIdentity {
    async fn local_signing_identity(&self) -> Result<SigningIdentity, WalletError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = self.failure.lock().unwrap().clone() {
            return Err(WalletError::Unavailable(message));
        }
        Ok(SigningIdentity {
            address: self.address,
            private: PrivateKey(self.key),
        })
    }
}
