//! Signing-key resolution from the tenant's JSON Web Key Set.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use jsonwebtoken::jwk::{Jwk, JwkSet};
use moka::future::Cache;
use tracing::debug;

use crate::KeyFetchError;

/// Source of the public keys a tenant signs tokens with.
#[async_trait]
pub trait KeyProvider: Send + Sync {
    /// The full key set as currently published.
    async fn key_set(&self) -> Result<JwkSet, KeyFetchError>;

    /// The key whose `kid` matches, or `None` if the set has no such key.
    async fn signing_key(&self, kid: &str) -> Result<Option<Jwk>, KeyFetchError> {
        Ok(self.key_set().await?.find(kid).cloned())
    }
}

/// Fetches the JWKS document over HTTP on every call.
#[derive(Debug, Clone)]
pub struct HttpKeyProvider {
    client: reqwest::Client,
    jwks_uri: String,
}

impl HttpKeyProvider {
    pub fn new(jwks_uri: impl Into<String>, timeout: Duration) -> Result<Self, KeyFetchError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            jwks_uri: jwks_uri.into(),
        })
    }

    pub fn jwks_uri(&self) -> &str {
        &self.jwks_uri
    }
}

#[async_trait]
impl KeyProvider for HttpKeyProvider {
    async fn key_set(&self) -> Result<JwkSet, KeyFetchError> {
        let key_set = self
            .client
            .get(&self.jwks_uri)
            .send()
            .await?
            .error_for_status()?
            .json::<JwkSet>()
            .await?;

        debug!(
            jwks_uri = %self.jwks_uri,
            keys = key_set.keys.len(),
            "JWKS fetched"
        );

        Ok(key_set)
    }
}

/// A fixed key set, for tests and offline runs.
#[derive(Debug, Clone)]
pub struct StaticKeyProvider {
    key_set: JwkSet,
}

impl StaticKeyProvider {
    pub fn new(key_set: JwkSet) -> Self {
        Self { key_set }
    }
}

#[async_trait]
impl KeyProvider for StaticKeyProvider {
    async fn key_set(&self) -> Result<JwkSet, KeyFetchError> {
        Ok(self.key_set.clone())
    }
}

const KEY_SET_ENTRY: &str = "jwks";

/// Keeps the last fetched key set for a bounded time.
///
/// An unknown `kid` bypasses the cached copy once, so a key rotation is
/// picked up on the first token signed with the new key.
pub struct CachedKeyProvider<P> {
    inner: P,
    cache: Cache<&'static str, Arc<JwkSet>>,
}

impl<P: KeyProvider> CachedKeyProvider<P> {
    pub fn new(inner: P, ttl: Duration) -> Self {
        let cache = Cache::builder().max_capacity(1).time_to_live(ttl).build();
        Self { inner, cache }
    }

    async fn refresh(&self) -> Result<Arc<JwkSet>, KeyFetchError> {
        let key_set = Arc::new(self.inner.key_set().await?);
        self.cache.insert(KEY_SET_ENTRY, key_set.clone()).await;
        Ok(key_set)
    }
}

#[async_trait]
impl<P: KeyProvider> KeyProvider for CachedKeyProvider<P> {
    async fn key_set(&self) -> Result<JwkSet, KeyFetchError> {
        match self.cache.get(&KEY_SET_ENTRY).await {
            Some(key_set) => Ok((*key_set).clone()),
            None => Ok((*self.refresh().await?).clone()),
        }
    }

    async fn signing_key(&self, kid: &str) -> Result<Option<Jwk>, KeyFetchError> {
        if let Some(key_set) = self.cache.get(&KEY_SET_ENTRY).await {
            if let Some(jwk) = key_set.find(kid) {
                return Ok(Some(jwk.clone()));
            }
            debug!(kid, "kid not in cached JWKS, refetching");
        }

        Ok(self.refresh().await?.find(kid).cloned())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use test_support::keys::{jwk_set, TEST_KID, UNKNOWN_KID};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    const JWKS_PATH: &str = "/contoso.onmicrosoft.com/B2C_1_signupsignin1/discovery/v2.0/keys";

    async fn jwks_server(expected_calls: u64) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(JWKS_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(jwk_set()))
            .expect(expected_calls)
            .mount(&server)
            .await;
        server
    }

    #[tokio::test]
    async fn test_http_provider_finds_key_by_kid() {
        let server = jwks_server(2).await;
        let provider =
            HttpKeyProvider::new(format!("{}{JWKS_PATH}", server.uri()), Duration::from_secs(5))
                .unwrap();

        let found = provider.signing_key(TEST_KID).await.unwrap();
        assert_eq!(found.unwrap().common.key_id.as_deref(), Some(TEST_KID));

        let missing = provider.signing_key(UNKNOWN_KID).await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_http_provider_surfaces_server_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(JWKS_PATH))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let provider =
            HttpKeyProvider::new(format!("{}{JWKS_PATH}", server.uri()), Duration::from_secs(5))
                .unwrap();

        assert!(provider.signing_key(TEST_KID).await.is_err());
    }

    #[tokio::test]
    async fn test_http_provider_rejects_non_jwks_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(JWKS_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>nope</html>"))
            .mount(&server)
            .await;

        let provider =
            HttpKeyProvider::new(format!("{}{JWKS_PATH}", server.uri()), Duration::from_secs(5))
                .unwrap();

        assert!(provider.key_set().await.is_err());
    }

    #[tokio::test]
    async fn test_cached_provider_reuses_key_set() {
        let server = jwks_server(1).await;
        let http =
            HttpKeyProvider::new(format!("{}{JWKS_PATH}", server.uri()), Duration::from_secs(5))
                .unwrap();
        let provider = CachedKeyProvider::new(http, Duration::from_secs(300));

        for _ in 0..3 {
            assert!(provider.signing_key(TEST_KID).await.unwrap().is_some());
        }
    }

    #[tokio::test]
    async fn test_cached_provider_refetches_on_unknown_kid() {
        let server = jwks_server(2).await;
        let http =
            HttpKeyProvider::new(format!("{}{JWKS_PATH}", server.uri()), Duration::from_secs(5))
                .unwrap();
        let provider = CachedKeyProvider::new(http, Duration::from_secs(300));

        assert!(provider.signing_key(TEST_KID).await.unwrap().is_some());
        assert!(provider.signing_key(UNKNOWN_KID).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_static_provider() {
        let provider = StaticKeyProvider::new(jwk_set());
        assert!(provider.signing_key(TEST_KID).await.unwrap().is_some());
        assert!(provider.signing_key(UNKNOWN_KID).await.unwrap().is_none());
    }
}
