#![allow(dead_code)]

// tests/common/mod.rs
use std::sync::Arc;
use std::time::SystemTime;

use account_api::state::AppState;
use account_api::store::{Account, AccountStore, InMemoryAccountStore};
use b2c_auth::{StaticKeyProvider, TokenValidator, ValidationConfig};
use serde_json::{json, Value};
use test_support::keys::{jwk_set, mint_token, mint_token_with, Signer};

pub const AUDIENCE: &str = "api-client-id";
pub const ISSUER: &str = "https://contoso.b2clogin.com/tenant-id/v2.0/";

// Logging is auto-installed for every test binary that includes this module
#[ctor::ctor]
fn init_logging() {
    test_support::logging::init();
}

pub fn validator() -> TokenValidator {
    TokenValidator::new(
        Arc::new(StaticKeyProvider::new(jwk_set())),
        ValidationConfig::new(AUDIENCE, ISSUER),
    )
}

pub fn state_with(store: Arc<dyn AccountStore>) -> AppState {
    AppState::new(validator(), store)
}

pub fn memory_state(accounts: Vec<Account>) -> (AppState, Arc<InMemoryAccountStore>) {
    let store = Arc::new(InMemoryAccountStore::new(accounts));
    (state_with(store.clone()), store)
}

/// Claims of a B2C access token for the API.
pub fn claims(emails: &[&str], scp: &str) -> Value {
    json!({
        "aud": AUDIENCE,
        "iss": ISSUER,
        "sub": "00000000-0000-0000-0000-000000000001",
        "emails": emails,
        "scp": scp,
    })
}

pub fn token(emails: &[&str], scp: &str) -> String {
    mint_token(claims(emails, scp), SystemTime::now())
}

pub fn token_signed_by(signer: Signer, emails: &[&str], scp: &str) -> String {
    mint_token_with(signer, claims(emails, scp), SystemTime::now())
}

pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {token}"))
}
