use jsonwebtoken::Algorithm;

/// A B2C authority: one tenant directory plus one user flow (policy).
///
/// Every user flow has its own authorize/token/logout endpoints and its own
/// JWKS document, all rooted at
/// `https://{directory}.b2clogin.com/{directory}.onmicrosoft.com/{user_flow}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct B2cAuthority {
    host: String,
    directory: String,
    user_flow: String,
}

impl B2cAuthority {
    pub fn new(directory: impl Into<String>, user_flow: impl Into<String>) -> Self {
        let directory = directory.into();
        Self {
            host: format!("https://{directory}.b2clogin.com"),
            directory,
            user_flow: user_flow.into(),
        }
    }

    /// Replace the `https://{directory}.b2clogin.com` origin, e.g. with a
    /// custom domain or a local stand-in for the identity provider.
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into().trim_end_matches('/').to_string();
        self
    }

    pub fn user_flow(&self) -> &str {
        &self.user_flow
    }

    pub fn url(&self) -> String {
        format!(
            "{}/{}.onmicrosoft.com/{}",
            self.host, self.directory, self.user_flow
        )
    }

    pub fn authorize_endpoint(&self) -> String {
        format!("{}/oauth2/v2.0/authorize", self.url())
    }

    pub fn token_endpoint(&self) -> String {
        format!("{}/oauth2/v2.0/token", self.url())
    }

    pub fn logout_endpoint(&self) -> String {
        format!("{}/oauth2/v2.0/logout", self.url())
    }

    pub fn jwks_uri(&self) -> String {
        format!("{}/discovery/v2.0/keys", self.url())
    }

    /// Issuer B2C stamps into tokens for this tenant (`iss` claim).
    pub fn issuer(&self, tenant_id: &str) -> String {
        format!("{}/{}/v2.0/", self.host, tenant_id)
    }

    /// Fully-qualified scope name for an API exposed in this tenant.
    pub fn api_scope(&self, api: &str, scope: &str) -> String {
        format!("https://{}.onmicrosoft.com/{api}/{scope}", self.directory)
    }
}

/// Expected values a token must carry to be accepted.
#[derive(Debug, Clone)]
pub struct ValidationConfig {
    /// Required `aud` claim (the API's or the web app's client id)
    pub audience: String,
    /// Required `iss` claim
    pub issuer: String,
    /// Signing algorithm the tenant uses (B2C signs with RS256)
    pub algorithm: Algorithm,
    /// Clock skew tolerated on `exp`, in seconds
    pub leeway_secs: u64,
}

impl ValidationConfig {
    pub fn new(audience: impl Into<String>, issuer: impl Into<String>) -> Self {
        Self {
            audience: audience.into(),
            issuer: issuer.into(),
            algorithm: Algorithm::RS256,
            leeway_secs: 0,
        }
    }
}
