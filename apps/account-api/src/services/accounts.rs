//! Account operations for an authenticated caller.
//!
//! The caller's verified emails are tried in claim order. Each email is
//! checked against every record, so a non-matching record ahead of the
//! caller's own never ends the search early.

use crate::error::AppError;
use crate::store::{Account, AccountStore, StoreError};

/// The first account matching any of `emails`.
pub async fn lookup(store: &dyn AccountStore, emails: &[String]) -> Result<Account, AppError> {
    for email in emails {
        match store.get(email).await {
            Ok(account) => return Ok(account),
            Err(StoreError::NotFound) => continue,
            Err(e) => return Err(e.into()),
        }
    }

    Err(AppError::RecordNotFound)
}

/// Set the beneficiary on the first account matching any of `emails`.
pub async fn update_beneficiary(
    store: &dyn AccountStore,
    emails: &[String],
    beneficiary: &str,
) -> Result<Account, AppError> {
    for email in emails {
        match store.update_beneficiary(email, beneficiary).await {
            Ok(account) => return Ok(account),
            Err(StoreError::NotFound) => continue,
            Err(e) => return Err(e.into()),
        }
    }

    Err(AppError::UpdateFailed)
}
