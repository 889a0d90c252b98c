//! Key material for the agent's signing identity.

use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::ChainAddress;

/// A 32-byte secp256k1 private key (secret scalar).
///
/// This type intentionally does not implement `Debug`, `Serialize`, or `Clone`
/// to prevent accidental exposure. Key bytes are zeroized on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey(pub [u8; 32]);

impl PrivateKey {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

/// The account that authorizes a burn: its address plus the private key.
///
/// Owned by a single burn for its duration and dropped (zeroizing the key)
/// when the burn returns. Never persisted by the agent.
pub struct SigningIdentity {
    pub address: ChainAddress,
    pub private: PrivateKey,
}

impl fmt::Debug for SigningIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningIdentity")
            .field("address", &self.address)
            .field("private", &"<redacted>")
            .finish()
    }
}
