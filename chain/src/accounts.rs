//! Fixed account directory, for hosts that configure accounts explicitly
//! instead of asking the node.

use async_trait::async_trait;
use offset_types::ChainAddress;

use crate::{AccountDirectory, ChainError};

#[derive(Clone, Debug, Default)]
pub struct StaticAccounts {
    accounts: Vec<ChainAddress>,
}

impl StaticAccounts {
    pub fn new(accounts: Vec<ChainAddress>) -> Self {
        Self { accounts }
    }
}

#[async_trait]
impl AccountDirectory for StaticAccounts {
    async fn list_accounts(&self) -> Result<Vec<ChainAddress>, ChainError> {
        Ok(self.accounts.clone())
    }
}
