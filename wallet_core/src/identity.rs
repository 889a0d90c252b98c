//! Signing identity provider: where a burn gets its key from.

use async_trait::async_trait;
use offset_types::SigningIdentity;
use std::path::{Path, PathBuf};
use tracing::debug;
use zeroize::Zeroizing;

use crate::error::WalletError;
use crate::keystore::load_keyfile;

/// Supplies the local signing identity.
///
/// Each call hands out a fresh, exclusively owned identity. Callers drop it as
/// soon as the transaction is signed; the key bytes are zeroized on drop.
#[async_trait]
pub trait SigningIdentityProvider: Send + Sync {
    async fn local_signing_identity(&self) -> Result<SigningIdentity, WalletError>;
}

/// Reads the identity from a V3 keyfile unlocked by a password file.
#[derive(Clone, Debug)]
pub struct KeyfileSigningIdentity {
    keyfile: PathBuf,
    password_file: PathBuf,
}

impl KeyfileSigningIdentity {
    pub fn new(keyfile: impl Into<PathBuf>, password_file: impl Into<PathBuf>) -> Self {
        Self {
            keyfile: keyfile.into(),
            password_file: password_file.into(),
        }
    }

    pub fn keyfile(&self) -> &Path {
        &self.keyfile
    }

    /// Load and decrypt synchronously. The key derivation makes this
    /// deliberately slow.
    pub fn load(&self) -> Result<SigningIdentity, WalletError> {
        let password = read_password_file(&self.password_file)?;
        let private = load_keyfile(&self.keyfile, &password)?;
        let identity = offset_crypto::identity_from_private(private)
            .map_err(|e| WalletError::Key(e.to_string()))?;
        debug!(address = %identity.address, keyfile = %self.keyfile.display(), "keyfile unlocked");
        Ok(identity)
    }
}

/// The password is the file's content minus trailing line breaks.
pub fn read_password_file(path: &Path) -> Result<Zeroizing<String>, WalletError> {
    let raw = Zeroizing::new(std::fs::read_to_string(path).map_err(|e| {
        WalletError::Unavailable(format!("failed to read password file {}: {}", path.display(), e))
    })?);
    Ok(Zeroizing::new(raw.trim_end_matches(['\r', '\n']).to_string()))
}

#[async_trait]
impl SigningIdentityProvider for KeyfileSigningIdentity {
    async fn local_signing_identity(&self) -> Result<SigningIdentity, WalletError> {
        let provider = self.clone();
        tokio::task::spawn_blocking(move || provider.load())
            .await
            .map_err(|e| WalletError::Other(format!("keyfile task failed: {e}")))?
    }
}
