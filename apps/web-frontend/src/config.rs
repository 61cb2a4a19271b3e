//! Front-end configuration loaded from environment variables.

use std::env;
use std::time::Duration;

use b2c_auth::B2cAuthority;

use crate::error::FrontendError;

/// Which B2C user flow a sign-in goes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserFlow {
    /// Sign-up / sign-in
    SignIn,
    /// Sign-in with a second factor, used before account changes
    Mfa,
}

impl UserFlow {
    /// Callback path registered with the identity provider for this flow.
    pub const fn redirect_path(self) -> &'static str {
        match self {
            UserFlow::SignIn => "/getAToken",
            UserFlow::Mfa => "/getATokenMFA",
        }
    }
}

#[derive(Debug, Clone)]
pub struct FrontendConfig {
    // Server configuration
    pub host: String,
    pub port: u16,
    /// Origin the browser sees, used to build callback and logout URLs
    pub public_url: String,

    // Web app registration
    pub client_id: String,
    pub client_secret: String,

    // Tenant
    pub directory: String,
    pub tenant_id: String,
    pub authority_host: Option<String>,
    pub signin_flow: String,
    pub mfa_flow: String,
    pub jwks_timeout: Duration,

    // Account API
    pub api_endpoint: String,
}

impl FrontendConfig {
    /// Load and validate all configuration from environment variables
    pub fn from_env() -> Result<Self, FrontendError> {
        Self::from_vars(|name| env::var(name).ok())
    }

    pub fn from_vars<F>(var: F) -> Result<Self, FrontendError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let optional = |name: &str| var(name).filter(|value| !value.trim().is_empty());
        let required = |name: &str| -> Result<String, FrontendError> {
            optional(name).ok_or_else(|| FrontendError::config(format!("{name} must be set")))
        };

        let port = match optional("FRONTEND_PORT") {
            None => 5000,
            Some(raw) => raw.trim().parse::<u16>().map_err(|_| {
                FrontendError::config(format!("FRONTEND_PORT must be a valid port number, got '{raw}'"))
            })?,
        };
        let jwks_timeout = match optional("JWKS_TIMEOUT_SECS") {
            None => Duration::from_secs(10),
            Some(raw) => Duration::from_secs(raw.trim().parse::<u64>().map_err(|_| {
                FrontendError::config(format!("JWKS_TIMEOUT_SECS must be a number, got '{raw}'"))
            })?),
        };

        Ok(Self {
            host: optional("FRONTEND_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            public_url: optional("FRONTEND_PUBLIC_URL")
                .unwrap_or_else(|| "http://localhost:5000".to_string())
                .trim_end_matches('/')
                .to_string(),
            client_id: required("CLIENT_ID")?,
            client_secret: required("CLIENT_SECRET")?,
            directory: required("B2C_DIR")?,
            tenant_id: required("B2C_TENANT_ID")?,
            authority_host: optional("B2C_AUTHORITY_HOST"),
            signin_flow: optional("B2C_SIGNIN_FLOW")
                .unwrap_or_else(|| "B2C_1_signupsignin1".to_string()),
            mfa_flow: optional("B2C_SIGNIN_MFA_FLOW")
                .unwrap_or_else(|| "B2C_1_signupsignin1_mfa".to_string()),
            jwks_timeout,
            api_endpoint: optional("API_ENDPOINT")
                .unwrap_or_else(|| "http://localhost:5001".to_string())
                .trim_end_matches('/')
                .to_string(),
        })
    }

    pub fn authority(&self, flow: UserFlow) -> B2cAuthority {
        let user_flow = match flow {
            UserFlow::SignIn => &self.signin_flow,
            UserFlow::Mfa => &self.mfa_flow,
        };
        let authority = B2cAuthority::new(self.directory.clone(), user_flow.clone());
        match &self.authority_host {
            Some(host) => authority.with_host(host.clone()),
            None => authority,
        }
    }

    pub fn issuer(&self) -> String {
        self.authority(UserFlow::SignIn).issuer(&self.tenant_id)
    }

    /// Scopes requested on every sign-in: the two account API scopes, plus
    /// `openid` and `offline_access` so an ID token and a refresh token come back.
    pub fn scopes(&self) -> Vec<String> {
        let authority = self.authority(UserFlow::SignIn);
        vec![
            authority.api_scope("api", "Account.Read"),
            authority.api_scope("api", "Account.Write"),
            "openid".to_string(),
            "offline_access".to_string(),
        ]
    }

    pub fn redirect_uri(&self, flow: UserFlow) -> String {
        format!("{}{}", self.public_url, flow.redirect_path())
    }

    /// Session cookies are marked `Secure` when the site is served over TLS.
    pub fn secure_cookies(&self) -> bool {
        self.public_url.starts_with("https://")
    }
}
