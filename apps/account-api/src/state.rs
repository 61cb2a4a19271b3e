use std::sync::Arc;

use b2c_auth::{CachedKeyProvider, HttpKeyProvider, KeyProvider, TokenValidator};
use tracing::info;

use crate::config::ApiConfig;
use crate::error::AppError;
use crate::store::{AccountStore, JsonFileAccountStore};

/// Application state containing shared resources
#[derive(Clone)]
pub struct AppState {
    /// Verifies bearer tokens against the tenant's signing keys
    pub validator: TokenValidator,
    /// Account records
    pub accounts: Arc<dyn AccountStore>,
}

impl AppState {
    pub fn new(validator: TokenValidator, accounts: Arc<dyn AccountStore>) -> Self {
        Self {
            validator,
            accounts,
        }
    }
}

/// Wire the production state: JWKS over HTTP (optionally cached) and the
/// JSON account file.
pub fn build_state(config: &ApiConfig) -> Result<AppState, AppError> {
    let jwks_uri = config.authority.jwks_uri();
    let http = HttpKeyProvider::new(jwks_uri.clone(), config.jwks_timeout)
        .map_err(|e| AppError::config(format!("JWKS client: {e}")))?;

    let keys: Arc<dyn KeyProvider> = if config.jwks_cache_ttl.is_zero() {
        Arc::new(http)
    } else {
        Arc::new(CachedKeyProvider::new(http, config.jwks_cache_ttl))
    };

    info!(
        %jwks_uri,
        cache_ttl_secs = config.jwks_cache_ttl.as_secs(),
        accounts_file = %config.accounts_file.display(),
        "account API state built"
    );

    Ok(AppState::new(
        TokenValidator::new(keys, config.validation()),
        Arc::new(JsonFileAccountStore::new(config.accounts_file.clone())),
    ))
}
