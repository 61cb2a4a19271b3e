//! Account records and the storage capability behind them.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

pub mod json_file;
pub mod memory;

pub use json_file::JsonFileAccountStore;
pub use memory::InMemoryAccountStore;

const BENEFICIARY: &str = "beneficiary";

/// One account, keyed by email.
///
/// Every field other than `email` is kept as raw JSON, so records are written
/// back exactly as read unless their beneficiary is changed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub email: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Account {
    pub fn new(email: impl Into<String>, beneficiary: impl Into<String>) -> Self {
        let mut account = Self {
            email: email.into(),
            fields: Map::new(),
        };
        account.set_beneficiary(beneficiary);
        account
    }

    /// The beneficiary, when the record holds one as a string.
    pub fn beneficiary(&self) -> Option<&str> {
        self.fields.get(BENEFICIARY).and_then(Value::as_str)
    }

    pub fn set_beneficiary(&mut self, beneficiary: impl Into<String>) {
        self.fields
            .insert(BENEFICIARY.to_string(), Value::String(beneficiary.into()));
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("account not found")]
    NotFound,
    #[error("account file I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("account file is not a valid account list: {0}")]
    Corrupt(#[from] serde_json::Error),
    #[error("storage task failed: {0}")]
    Task(String),
}

/// Lookup and update of account records.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// The account whose email equals `email` exactly.
    async fn get(&self, email: &str) -> Result<Account, StoreError>;

    /// Overwrite the beneficiary of the account with this email and persist
    /// the change. Returns the updated record.
    async fn update_beneficiary(
        &self,
        email: &str,
        beneficiary: &str,
    ) -> Result<Account, StoreError>;
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_account_preserves_unknown_fields() {
        let raw = json!({
            "email": "a@x.com",
            "beneficiary": "B1",
            "policy": "P-100",
            "premium": 42.5
        });

        let account: Account = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(account.beneficiary(), Some("B1"));
        assert_eq!(account.fields["policy"], "P-100");
        assert_eq!(serde_json::to_value(&account).unwrap(), raw);
    }

    #[test]
    fn test_account_without_beneficiary() {
        let account: Account = serde_json::from_value(json!({ "email": "a@x.com" })).unwrap();
        assert_eq!(account.beneficiary(), None);
        assert_eq!(
            serde_json::to_value(&account).unwrap(),
            json!({ "email": "a@x.com" })
        );
    }

    #[test]
    fn test_null_or_non_string_beneficiary_round_trips() {
        for raw in [
            json!({ "email": "n@x.com", "beneficiary": null, "policy": "P-7" }),
            json!({ "email": "n@x.com", "beneficiary": 5 }),
        ] {
            let account: Account = serde_json::from_value(raw.clone()).unwrap();
            assert_eq!(account.beneficiary(), None);
            assert_eq!(serde_json::to_value(&account).unwrap(), raw);
        }
    }

    #[test]
    fn test_set_beneficiary_replaces_any_previous_value() {
        let mut account: Account =
            serde_json::from_value(json!({ "email": "n@x.com", "beneficiary": null })).unwrap();
        account.set_beneficiary("B2");

        assert_eq!(
            serde_json::to_value(&account).unwrap(),
            json!({ "email": "n@x.com", "beneficiary": "B2" })
        );
    }
}
