use std::sync::Arc;

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, decode_header, DecodingKey, Validation};
use tracing::{debug, warn};

use crate::{AuthError, Claims, KeyProvider, ValidationConfig};

/// Verifies B2C-issued JWTs and returns their claims.
#[derive(Clone)]
pub struct TokenValidator {
    keys: Arc<dyn KeyProvider>,
    config: ValidationConfig,
}

impl TokenValidator {
    pub fn new(keys: Arc<dyn KeyProvider>, config: ValidationConfig) -> Self {
        Self { keys, config }
    }

    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Verify signature, expiry, audience and issuer, then return the claims.
    ///
    /// Errors:
    /// - unreadable header, missing `kid`, key set unavailable, bad signature → `InvalidToken`
    /// - no key with the token's `kid` → `KeyNotFound`
    /// - `exp` in the past → `TokenExpired`
    /// - `aud` / `iss` mismatch or missing → `InvalidClaims`
    pub async fn validate(&self, token: &str) -> Result<Claims, AuthError> {
        let header = decode_header(token).map_err(|e| {
            debug!(error = %e, "unreadable token header");
            AuthError::InvalidToken
        })?;
        let kid = header.kid.ok_or(AuthError::InvalidToken)?;

        let jwk = match self.keys.signing_key(&kid).await {
            Ok(Some(jwk)) => jwk,
            Ok(None) => {
                debug!(kid = %kid, "no JWKS entry for kid");
                return Err(AuthError::KeyNotFound);
            }
            Err(e) => {
                warn!(error = %e, "signing keys unavailable");
                return Err(AuthError::InvalidToken);
            }
        };

        let key = DecodingKey::from_jwk(&jwk).map_err(|e| {
            warn!(kid = %kid, error = %e, "unusable JWKS entry");
            AuthError::InvalidToken
        })?;

        let mut validation = Validation::new(self.config.algorithm);
        validation.leeway = self.config.leeway_secs;
        validation.set_audience(&[self.config.audience.as_str()]);
        validation.set_issuer(&[self.config.issuer.as_str()]);

        decode::<Claims>(token, &key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                ErrorKind::InvalidAudience | ErrorKind::InvalidIssuer => AuthError::InvalidClaims,
                ErrorKind::MissingRequiredClaim(claim) if claim == "aud" || claim == "iss" => {
                    AuthError::InvalidClaims
                }
                _ => AuthError::InvalidToken,
            })
    }
}
