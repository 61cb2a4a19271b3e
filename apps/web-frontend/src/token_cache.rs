//! Per-session access token with silent refresh.

use std::time::{Duration, SystemTime};

use tracing::{debug, info};

use crate::config::UserFlow;
use crate::error::FrontendError;
use crate::identity::{IdentityClient, TokenResponse};
use crate::session::Session;

/// Tokens expiring sooner than this are refreshed before use.
pub const REFRESH_WINDOW: Duration = Duration::from_secs(5 * 60);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedToken {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: SystemTime,
    /// User flow whose token endpoint issued (and can refresh) this token
    pub flow: UserFlow,
}

impl CachedToken {
    /// `None` when the response carries no access token.
    pub fn from_response(resp: &TokenResponse, flow: UserFlow, now: SystemTime) -> Option<Self> {
        let access_token = resp.access_token.clone()?;
        Some(Self {
            access_token,
            refresh_token: resp.refresh_token.clone(),
            expires_at: now + Duration::from_secs(resp.expires_in.unwrap_or(0)),
            flow,
        })
    }

    pub fn is_fresh(&self, now: SystemTime) -> bool {
        self.expires_at > now + REFRESH_WINDOW
    }

    /// Apply a refresh response. Keeps the old refresh token if no new one
    /// was issued.
    fn refreshed(&self, resp: &TokenResponse, now: SystemTime) -> Option<Self> {
        let mut next = Self::from_response(resp, self.flow, now)?;
        if next.refresh_token.is_none() {
            next.refresh_token = self.refresh_token.clone();
        }
        Some(next)
    }
}

/// An access token for calling the account API, or `None` when the user has
/// to sign in again.
pub async fn acquire_silent(
    session: &Session,
    identity: &IdentityClient,
) -> Result<Option<String>, FrontendError> {
    let Some(cached) = session.data().token_cache else {
        return Ok(None);
    };

    let now = SystemTime::now();
    if cached.is_fresh(now) {
        return Ok(Some(cached.access_token));
    }

    let Some(refresh_token) = cached.refresh_token.as_deref() else {
        debug!("access token expiring and no refresh token held");
        return Ok(None);
    };

    match identity.refresh(cached.flow, refresh_token).await {
        Ok(resp) => match cached.refreshed(&resp, now) {
            Some(token) => {
                info!(flow = ?token.flow, "access token refreshed");
                let access_token = token.access_token.clone();
                session.update(|data| data.token_cache = Some(token));
                Ok(Some(access_token))
            }
            None => Ok(None),
        },
        Err(FrontendError::IdentityProvider { error, .. }) => {
            // Refresh token expired or revoked
            info!(%error, "refresh rejected, sign-in required");
            session.update(|data| data.token_cache = None);
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(access: Option<&str>, refresh: Option<&str>, expires_in: u64) -> TokenResponse {
        TokenResponse {
            access_token: access.map(str::to_string),
            id_token: None,
            refresh_token: refresh.map(str::to_string),
            expires_in: Some(expires_in),
        }
    }

    #[test]
    fn test_freshness_window() {
        let now = SystemTime::now();

        let long = CachedToken::from_response(&response(Some("a"), None, 3600), UserFlow::SignIn, now)
            .unwrap();
        assert!(long.is_fresh(now));

        let short = CachedToken::from_response(&response(Some("a"), None, 299), UserFlow::SignIn, now)
            .unwrap();
        assert!(!short.is_fresh(now));
    }

    #[test]
    fn test_no_access_token_means_nothing_to_cache() {
        assert!(CachedToken::from_response(
            &response(None, Some("r"), 3600),
            UserFlow::SignIn,
            SystemTime::now()
        )
        .is_none());
    }

    #[test]
    fn test_refresh_keeps_previous_refresh_token() {
        let now = SystemTime::now();
        let old = CachedToken::from_response(&response(Some("a1"), Some("r1"), 60), UserFlow::Mfa, now)
            .unwrap();

        let next = old.refreshed(&response(Some("a2"), None, 3600), now).unwrap();
        assert_eq!(next.access_token, "a2");
        assert_eq!(next.refresh_token.as_deref(), Some("r1"));
        assert_eq!(next.flow, UserFlow::Mfa);

        let rotated = old.refreshed(&response(Some("a3"), Some("r2"), 3600), now).unwrap();
        assert_eq!(rotated.refresh_token.as_deref(), Some("r2"));
    }
}
