//! Authorization-code flow against the B2C user-flow endpoints.
//!
//! Authorize URLs, code redemption, refresh and logout are plain OAuth 2.0
//! requests; ID tokens are checked with the same validator the account API
//! uses for access tokens, keyed to this web app's client id.

use std::sync::Arc;

use b2c_auth::{Claims, HttpKeyProvider, TokenValidator, ValidationConfig};
use serde::{Deserialize, Deserializer};
use tracing::debug;
use url::Url;

use crate::config::{FrontendConfig, UserFlow};
use crate::error::FrontendError;

/// Successful reply from the token endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TokenResponse {
    pub access_token: Option<String>,
    pub id_token: Option<String>,
    pub refresh_token: Option<String>,
    /// Lifetime of `access_token`; B2C sends it as a number or a string.
    #[serde(default, deserialize_with = "seconds")]
    pub expires_in: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct OAuthErrorBody {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

fn seconds<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u64),
        Text(String),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Number(secs)) => Some(secs),
        Some(Raw::Text(text)) => text.trim().parse().ok(),
        None => None,
    })
}

pub struct IdentityClient {
    http: reqwest::Client,
    config: Arc<FrontendConfig>,
    signin_tokens: TokenValidator,
    mfa_tokens: TokenValidator,
}

impl IdentityClient {
    pub fn new(http: reqwest::Client, config: Arc<FrontendConfig>) -> Result<Self, FrontendError> {
        let signin_tokens = id_token_validator(&config, UserFlow::SignIn)?;
        let mfa_tokens = id_token_validator(&config, UserFlow::Mfa)?;
        Ok(Self {
            http,
            config,
            signin_tokens,
            mfa_tokens,
        })
    }

    /// Where to send the browser to sign in through `flow`.
    pub fn authorize_url(&self, flow: UserFlow, state: &str) -> Result<String, FrontendError> {
        let redirect_uri = self.config.redirect_uri(flow);
        let scope = self.config.scopes().join(" ");

        let url = Url::parse_with_params(
            &self.config.authority(flow).authorize_endpoint(),
            &[
                ("client_id", self.config.client_id.as_str()),
                ("response_type", "code"),
                ("response_mode", "query"),
                ("redirect_uri", redirect_uri.as_str()),
                ("scope", scope.as_str()),
                ("state", state),
            ],
        )?;

        Ok(url.into())
    }

    /// Exchange an authorization code for tokens.
    pub async fn redeem_code(
        &self,
        flow: UserFlow,
        code: &str,
    ) -> Result<TokenResponse, FrontendError> {
        let redirect_uri = self.config.redirect_uri(flow);
        let scope = self.config.scopes().join(" ");

        self.token_request(
            flow,
            &[
                ("grant_type", "authorization_code"),
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
                ("code", code),
                ("redirect_uri", redirect_uri.as_str()),
                ("scope", scope.as_str()),
            ],
        )
        .await
    }

    /// Trade a refresh token for a new access token at the flow that issued it.
    pub async fn refresh(
        &self,
        flow: UserFlow,
        refresh_token: &str,
    ) -> Result<TokenResponse, FrontendError> {
        let scope = self.config.scopes().join(" ");

        self.token_request(
            flow,
            &[
                ("grant_type", "refresh_token"),
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
                ("refresh_token", refresh_token),
                ("scope", scope.as_str()),
            ],
        )
        .await
    }

    /// Verify an ID token's signature, expiry, audience and issuer.
    pub async fn verify_id_token(
        &self,
        flow: UserFlow,
        id_token: &str,
    ) -> Result<Claims, FrontendError> {
        let validator = match flow {
            UserFlow::SignIn => &self.signin_tokens,
            UserFlow::Mfa => &self.mfa_tokens,
        };
        validator
            .validate(id_token)
            .await
            .map_err(FrontendError::InvalidIdToken)
    }

    /// End the tenant's web session, then come back to the home page.
    pub fn logout_url(&self) -> Result<String, FrontendError> {
        let home = format!("{}/", self.config.public_url);
        let url = Url::parse_with_params(
            &self.config.authority(UserFlow::SignIn).logout_endpoint(),
            &[("post_logout_redirect_uri", home.as_str())],
        )?;
        Ok(url.into())
    }

    async fn token_request(
        &self,
        flow: UserFlow,
        form: &[(&str, &str)],
    ) -> Result<TokenResponse, FrontendError> {
        let endpoint = self.config.authority(flow).token_endpoint();
        let resp = self.http.post(&endpoint).form(form).send().await?;

        let status = resp.status();
        if status.is_success() {
            debug!(%endpoint, "token endpoint succeeded");
            return Ok(resp.json::<TokenResponse>().await?);
        }

        let body = resp.text().await?;
        Err(match serde_json::from_str::<OAuthErrorBody>(&body) {
            Ok(oauth) => FrontendError::IdentityProvider {
                error: oauth.error,
                description: oauth.error_description.unwrap_or_default(),
            },
            Err(_) => FrontendError::IdentityProvider {
                error: format!("token_endpoint_{}", status.as_u16()),
                description: body,
            },
        })
    }
}

fn id_token_validator(
    config: &FrontendConfig,
    flow: UserFlow,
) -> Result<TokenValidator, FrontendError> {
    let keys = HttpKeyProvider::new(config.authority(flow).jwks_uri(), config.jwks_timeout)
        .map_err(|e| FrontendError::config(format!("JWKS client: {e}")))?;

    Ok(TokenValidator::new(
        Arc::new(keys),
        ValidationConfig::new(config.client_id.clone(), config.issuer()),
    ))
}
