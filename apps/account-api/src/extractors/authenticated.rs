use std::future::Future;
use std::pin::Pin;

use actix_web::dev::Payload;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{web, FromRequest, HttpRequest};
use b2c_auth::{extract_bearer, AuthError, Claims};

use crate::error::AppError;
use crate::logging::security;
use crate::state::AppState;

/// A caller whose bearer token passed full validation.
///
/// The claims come straight from [`b2c_auth::TokenValidator::validate`];
/// nothing here decodes a token without checking its signature.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    claims: Claims,
    path: String,
}

impl AuthenticatedUser {
    pub fn claims(&self) -> &Claims {
        &self.claims
    }

    pub fn emails(&self) -> Vec<String> {
        self.claims.emails()
    }

    /// Fail with `Unauthorized` (403) unless `scope` was granted.
    pub fn require_scope(&self, scope: &str) -> Result<(), AppError> {
        self.claims.require_scope(scope).map_err(|err| {
            let emails = self.claims.emails();
            security::scope_denied(scope, emails.first().map(String::as_str), &self.path);
            AppError::from(err)
        })
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = AppError;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            let path = req.path().to_string();

            let app_state = req
                .app_data::<web::Data<AppState>>()
                .ok_or_else(|| AppError::internal("AppState not found"))?;

            let result = match bearer_token(&req) {
                Ok(token) => app_state.validator.validate(token).await,
                Err(err) => Err(err),
            };

            match result {
                Ok(claims) => Ok(AuthenticatedUser { claims, path }),
                Err(err) => {
                    security::auth_failed(&err, &path);
                    Err(err.into())
                }
            }
        })
    }
}

fn bearer_token(req: &HttpRequest) -> Result<&str, AuthError> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .map(|value| {
            value.to_str().map_err(|_| {
                AuthError::MalformedHeader("Authorization header must start with Bearer")
            })
        })
        .transpose()?;

    extract_bearer(header)
}
