//! API configuration loaded from environment variables.
//!
//! Values are read once at startup into [`ApiConfig`] and passed into
//! [`crate::state::build_state`]; nothing else reads the environment.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use b2c_auth::{B2cAuthority, ValidationConfig};
use web_infra::middleware::cors::parse_origins;

use crate::error::AppError;

#[derive(Debug, Clone)]
pub struct ApiConfig {
    // Server configuration
    pub host: String,
    pub port: u16,

    // Identity provider
    pub authority: B2cAuthority,
    pub audience: String,
    pub tenant_id: String,
    pub jwks_timeout: Duration,
    /// Zero disables key caching; every validation re-fetches the key set.
    pub jwks_cache_ttl: Duration,

    // Storage
    pub accounts_file: PathBuf,

    // Browser access
    pub cors_allowed_origins: Vec<String>,
}

impl ApiConfig {
    /// Load and validate all configuration from environment variables
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_vars(|name| env::var(name).ok())
    }

    /// Build the configuration from any variable source.
    pub fn from_vars<F>(var: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &str| -> Result<String, AppError> {
            var(name)
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| AppError::config(format!("{name} must be set")))
        };

        let host = var("API_HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = parse_number("API_PORT", var("API_PORT"), 5001)?;

        let tenant_name = required("B2C_TENANT_NAME")?;
        let policy = required("BC2_SIGN_UP_IN_POLICY")?;
        let audience = required("API_CLIENT_ID")?;
        let tenant_id = required("B2C_TENANT_ID")?;

        let mut authority = B2cAuthority::new(tenant_name, policy);
        if let Some(host) = var("B2C_AUTHORITY_HOST").filter(|h| !h.trim().is_empty()) {
            authority = authority.with_host(host);
        }

        let accounts_file = var("ACCOUNTS_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("accounts.json"));

        let jwks_timeout = Duration::from_secs(parse_number(
            "JWKS_TIMEOUT_SECS",
            var("JWKS_TIMEOUT_SECS"),
            10,
        )?);
        let jwks_cache_ttl = Duration::from_secs(parse_number(
            "JWKS_CACHE_TTL_SECS",
            var("JWKS_CACHE_TTL_SECS"),
            0,
        )?);

        let cors_allowed_origins = var("CORS_ALLOWED_ORIGINS")
            .map(|raw| parse_origins(&raw))
            .unwrap_or_default();

        Ok(Self {
            host,
            port,
            authority,
            audience,
            tenant_id,
            jwks_timeout,
            jwks_cache_ttl,
            accounts_file,
            cors_allowed_origins,
        })
    }

    /// Issuer B2C stamps into access tokens for this tenant.
    pub fn issuer(&self) -> String {
        self.authority.issuer(&self.tenant_id)
    }

    pub fn validation(&self) -> ValidationConfig {
        ValidationConfig::new(self.audience.clone(), self.issuer())
    }
}

fn parse_number<T: std::str::FromStr>(
    name: &str,
    raw: Option<String>,
    default: T,
) -> Result<T, AppError> {
    match raw {
        None => Ok(default),
        Some(raw) => raw.trim().parse::<T>().map_err(|_| {
            AppError::config(format!("{name} must be a valid number, got '{raw}'"))
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    const REQUIRED: [(&str, &str); 4] = [
        ("B2C_TENANT_NAME", "contoso"),
        ("BC2_SIGN_UP_IN_POLICY", "B2C_1_signupsignin1"),
        ("API_CLIENT_ID", "api-client-id"),
        ("B2C_TENANT_ID", "tenant-id"),
    ];

    #[test]
    fn test_defaults() {
        let config = ApiConfig::from_vars(vars(&REQUIRED)).unwrap();

        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 5001);
        assert_eq!(config.accounts_file, PathBuf::from("accounts.json"));
        assert_eq!(config.jwks_timeout, Duration::from_secs(10));
        assert_eq!(config.jwks_cache_ttl, Duration::ZERO);
        assert!(config.cors_allowed_origins.is_empty());
        assert_eq!(
            config.authority.jwks_uri(),
            "https://contoso.b2clogin.com/contoso.onmicrosoft.com/B2C_1_signupsignin1/discovery/v2.0/keys"
        );
        assert_eq!(
            config.issuer(),
            "https://contoso.b2clogin.com/tenant-id/v2.0/"
        );
        assert_eq!(config.validation().audience, "api-client-id");
    }

    #[test]
    fn test_overrides() {
        let mut pairs = REQUIRED.to_vec();
        pairs.extend([
            ("API_PORT", "8081"),
            ("B2C_AUTHORITY_HOST", "http://127.0.0.1:9999"),
            ("JWKS_CACHE_TTL_SECS", "300"),
            ("CORS_ALLOWED_ORIGINS", "http://localhost:5000, https://app.test"),
        ]);
        let config = ApiConfig::from_vars(vars(&pairs)).unwrap();

        assert_eq!(config.port, 8081);
        assert_eq!(config.jwks_cache_ttl, Duration::from_secs(300));
        assert_eq!(config.issuer(), "http://127.0.0.1:9999/tenant-id/v2.0/");
        assert_eq!(
            config.cors_allowed_origins,
            vec!["http://localhost:5000", "https://app.test"]
        );
    }

    #[test]
    fn test_missing_required_variable() {
        let err = ApiConfig::from_vars(vars(&REQUIRED[..3])).unwrap_err();
        assert!(err.to_string().contains("B2C_TENANT_ID"), "{err}");
    }

    #[test]
    fn test_invalid_port() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("API_PORT", "not-a-port"));
        let err = ApiConfig::from_vars(vars(&pairs)).unwrap_err();
        assert!(err.to_string().contains("API_PORT"), "{err}");
    }
}
