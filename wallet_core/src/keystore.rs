//! Ethereum V3 keyfiles (Web3 Secret Storage).
//!
//! The private key is encrypted with AES-128-CTR under a scrypt or PBKDF2
//! derived key and authenticated with a keccak-256 MAC. Keyfiles written by
//! geth, Foundry or any other V3 producer load unchanged. Keyfiles written
//! here use scrypt and carry the `address` field geth adds, which is checked
//! against the decrypted key when present.

use eth_keystore::KeystoreError;
use offset_types::{ChainAddress, PrivateKey};
use serde::Deserialize;
use std::path::Path;
use zeroize::Zeroizing;

use crate::error::WalletError;

const KEYFILE_VERSION: u32 = 3;

/// The fields read before decryption. The crypto section is left to
/// `eth-keystore`.
#[derive(Deserialize)]
struct KeyfileHeader {
    version: u32,
    #[serde(default)]
    address: Option<String>,
}

/// Decrypt the V3 keyfile at `path` with `password`.
pub fn load_keyfile(path: &Path, password: &str) -> Result<PrivateKey, WalletError> {
    let json = std::fs::read_to_string(path).map_err(|e| {
        WalletError::Unavailable(format!("failed to read keyfile {}: {}", path.display(), e))
    })?;
    let header: KeyfileHeader = serde_json::from_str(&json)
        .map_err(|e| WalletError::Key(format!("invalid keyfile JSON: {}", e)))?;
    if header.version != KEYFILE_VERSION {
        return Err(WalletError::Key(format!(
            "unsupported keyfile version: {}",
            header.version
        )));
    }
    let stored = header
        .address
        .as_deref()
        .map(str::parse::<ChainAddress>)
        .transpose()
        .map_err(|e| WalletError::Key(format!("invalid keyfile address: {}", e)))?;

    let plaintext = Zeroizing::new(eth_keystore::decrypt_key(path, password).map_err(
        |e| match e {
            KeystoreError::MacMismatch => WalletError::Key(
                "decryption failed: wrong password or corrupted keyfile".to_string(),
            ),
            other => WalletError::Key(format!("keyfile decryption failed: {}", other)),
        },
    )?);
    if plaintext.len() != 32 {
        return Err(WalletError::Key(format!(
            "decrypted key has wrong length: expected 32, got {}",
            plaintext.len()
        )));
    }
    let mut key = PrivateKey([0u8; 32]);
    key.0.copy_from_slice(&plaintext[..]);

    if let Some(stored) = stored {
        let derived =
            offset_crypto::derive_address(&key).map_err(|e| WalletError::Key(e.to_string()))?;
        if derived != stored {
            return Err(WalletError::AddressMismatch {
                stored: stored.to_string(),
                derived: derived.to_string(),
            });
        }
    }
    Ok(key)
}

/// Encrypt `private` into a new V3 keyfile at `path` and return the address
/// it controls.
pub fn create_keyfile(
    path: &Path,
    private: &PrivateKey,
    password: &str,
) -> Result<ChainAddress, WalletError> {
    let address =
        offset_crypto::derive_address(private).map_err(|e| WalletError::Key(e.to_string()))?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| WalletError::Other(format!("invalid keyfile path {}", path.display())))?;

    eth_keystore::encrypt_key(
        dir,
        &mut rand::thread_rng(),
        &private.0[..],
        password,
        Some(name),
    )
    .map_err(|e| WalletError::Other(format!("failed to write keyfile: {}", e)))?;

    let json = std::fs::read_to_string(path)
        .map_err(|e| WalletError::Other(format!("failed to reread keyfile: {}", e)))?;
    let mut value: serde_json::Value = serde_json::from_str(&json)
        .map_err(|e| WalletError::Other(format!("invalid keyfile JSON: {}", e)))?;
    if let Some(fields) = value.as_object_mut() {
        fields.insert(
            "address".to_string(),
            serde_json::Value::String(hex::encode(address.as_bytes())),
        );
    }
    let json = serde_json::to_string_pretty(&value)
        .map_err(|e| WalletError::Other(format!("JSON serialization failed: {}", e)))?;
    std::fs::write(path, json)
        .map_err(|e| WalletError::Other(format!("failed to write keyfile: {}", e)))?;
    Ok(address)
}
