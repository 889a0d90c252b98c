//! Agent configuration with TOML file support.

use offset_types::ChainAddress;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::{LogFormat, OffsetError};

/// Configuration for the offset agent.
///
/// Loaded from a TOML file via [`OffsetConfig::from_toml_file`] or built
/// programmatically (e.g. for tests). Passed explicitly into constructors;
/// nothing reads it from global state.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OffsetConfig {
    /// Ethereum JSON-RPC endpoint.
    #[serde(default = "default_rpc_url")]
    pub rpc_url: String,

    /// Address of the VCU credit token contract. Required for burns.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credit_token_address: Option<ChainAddress>,

    /// Encrypted keyfile holding the signing identity.
    #[serde(default = "default_keyfile")]
    pub keyfile: PathBuf,

    /// File containing the keyfile password.
    #[serde(default = "default_password_file")]
    pub keyfile_password_file: PathBuf,

    /// SQLite database with the `factors_by_countries` table.
    #[serde(default = "default_region_db")]
    pub region_db: PathBuf,

    /// Timeout applied to every lookup and chain request, in seconds.
    #[serde(default = "default_rpc_timeout_secs")]
    pub rpc_timeout_secs: u64,

    /// Accounts to use instead of asking the node (`eth_accounts`).
    /// The first entry is the balance account.
    #[serde(default)]
    pub accounts: Vec<ChainAddress>,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_rpc_url() -> String {
    "http://127.0.0.1:8545".to_string()
}

fn default_keyfile() -> PathBuf {
    PathBuf::from("./offset_data/keyfile.json")
}

fn default_password_file() -> PathBuf {
    PathBuf::from("./offset_data/password")
}

fn default_region_db() -> PathBuf {
    PathBuf::from("./offset_data/regions.sqlite3")
}

fn default_rpc_timeout_secs() -> u64 {
    30
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl OffsetConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &Path) -> Result<Self, OffsetError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| OffsetError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, OffsetError> {
        toml::from_str(s).map_err(|e| OffsetError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, OffsetError> {
        toml::to_string_pretty(self).map_err(|e| OffsetError::Config(e.to_string()))
    }

    /// The credit token address, or a config error if it was never set.
    pub fn token_address(&self) -> Result<ChainAddress, OffsetError> {
        self.credit_token_address
            .ok_or_else(|| OffsetError::Config("credit_token_address is not set".to_string()))
    }

    pub fn rpc_timeout(&self) -> Duration {
        Duration::from_secs(self.rpc_timeout_secs)
    }

    pub fn parsed_log_format(&self) -> Result<LogFormat, OffsetError> {
        self.log_format.parse()
    }

    /// Check the settings a burn depends on.
    pub fn validate(&self) -> Result<(), OffsetError> {
        self.token_address()?;
        self.parsed_log_format()?;
        if self.rpc_timeout_secs == 0 {
            return Err(OffsetError::Config(
                "rpc_timeout_secs must be at least 1".to_string(),
            ));
        }
        if self.rpc_url.is_empty() {
            return Err(OffsetError::Config("rpc_url is empty".to_string()));
        }
        Ok(())
    }
}

impl Default for OffsetConfig {
    fn default() -> Self {
        Self {
            rpc_url: default_rpc_url(),
            credit_token_address: None,
            keyfile: default_keyfile(),
            keyfile_password_file: default_password_file(),
            region_db: default_region_db(),
            rpc_timeout_secs: default_rpc_timeout_secs(),
            accounts: Vec::new(),
            log_format: default_log_format(),
            log_level: default_log_level(),
        }
    }
}
