//! Authentication and authorization failures.
//!
//! Every variant maps 1:1 to the `code` / `description` pair returned to API
//! callers. Codes are lowercase snake_case except `Unauthorized`, which keeps
//! the casing clients already match on.

use thiserror::Error;

/// Why a request could not be authenticated or authorized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// No `Authorization` header on the request.
    #[error("authorization header missing")]
    MissingHeader,
    /// The header is present but is not `Bearer <token>`.
    #[error("malformed authorization header: {0}")]
    MalformedHeader(&'static str),
    /// The token (or the key set needed to check it) could not be parsed or verified.
    #[error("unable to parse authentication token")]
    InvalidToken,
    /// No key in the tenant's key set matches the token's `kid`.
    #[error("no signing key matches the token")]
    KeyNotFound,
    /// The `exp` claim is in the past.
    #[error("token expired")]
    TokenExpired,
    /// Audience or issuer did not match the configured values.
    #[error("incorrect audience or issuer")]
    InvalidClaims,
    /// The token is valid but lacks the required scope.
    #[error("required scope missing")]
    Unauthorized,
}

impl AuthError {
    pub const fn code(&self) -> &'static str {
        match self {
            AuthError::MissingHeader => "authorization_header_missing",
            AuthError::MalformedHeader(_) => "invalid_header",
            AuthError::InvalidToken => "invalid_header",
            AuthError::KeyNotFound => "invalid_header",
            AuthError::TokenExpired => "token_expired",
            AuthError::InvalidClaims => "invalid_claims",
            AuthError::Unauthorized => "Unauthorized",
        }
    }

    pub const fn description(&self) -> &'static str {
        match self {
            AuthError::MissingHeader => "Authorization header is expected",
            AuthError::MalformedHeader(detail) => *detail,
            AuthError::InvalidToken => "Unable to parse authentication token.",
            AuthError::KeyNotFound => "Unable to find appropriate key",
            AuthError::TokenExpired => "token is expired",
            AuthError::InvalidClaims => "incorrect claims,please check the audience and issuer",
            AuthError::Unauthorized => "You don't have access to this resource",
        }
    }

    /// HTTP status: 403 for a failed scope check, 401 for everything else.
    pub const fn status_code(&self) -> u16 {
        match self {
            AuthError::Unauthorized => 403,
            _ => 401,
        }
    }
}

/// Failure to obtain the tenant's JSON Web Key Set.
#[derive(Debug, Error)]
pub enum KeyFetchError {
    #[error("JWKS request failed: {0}")]
    Http(#[from] reqwest::Error),
}
