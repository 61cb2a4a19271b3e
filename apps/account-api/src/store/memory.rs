use async_trait::async_trait;
use parking_lot::RwLock;

use super::{Account, AccountStore, StoreError};

/// Account list held in process memory.
#[derive(Debug, Default)]
pub struct InMemoryAccountStore {
    accounts: RwLock<Vec<Account>>,
}

impl InMemoryAccountStore {
    pub fn new(accounts: Vec<Account>) -> Self {
        Self {
            accounts: RwLock::new(accounts),
        }
    }

    pub fn snapshot(&self) -> Vec<Account> {
        self.accounts.read().clone()
    }
}

#[async_trait]
impl AccountStore for InMemoryAccountStore {
    async fn get(&self, email: &str) -> Result<Account, StoreError> {
        self.accounts
            .read()
            .iter()
            .find(|account| account.email == email)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn update_beneficiary(
        &self,
        email: &str,
        beneficiary: &str,
    ) -> Result<Account, StoreError> {
        let mut accounts = self.accounts.write();
        let account = accounts
            .iter_mut()
            .find(|account| account.email == email)
            .ok_or(StoreError::NotFound)?;
        account.set_beneficiary(beneficiary);
        Ok(account.clone())
    }
}
