//! Sign-in, callbacks, step-up and sign-out.

use std::time::SystemTime;

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;
use web_infra::{trace_ctx, Redacted};

use super::{page_data, redirect};
use crate::config::UserFlow;
use crate::error::FrontendError;
use crate::session::Session;
use crate::state::FrontendState;
use crate::token_cache::CachedToken;

/// Query string the identity provider sends back to a redirect path.
#[derive(Debug, Default, Deserialize)]
pub struct CallbackQuery {
    pub state: Option<String>,
    pub code: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

async fn login(
    session: Session,
    app_state: web::Data<FrontendState>,
) -> Result<HttpResponse, FrontendError> {
    let state = Uuid::new_v4().to_string();
    session.update(|data| data.state = Some(state.clone()));

    let auth_url = app_state.identity.authorize_url(UserFlow::SignIn, &state)?;
    let user = session.user();

    app_state
        .templates
        .page("login", &page_data(user.as_ref(), json!({ "auth_url": auth_url })))
}

async fn authorized(
    query: web::Query<CallbackQuery>,
    session: Session,
    app_state: web::Data<FrontendState>,
) -> Result<HttpResponse, FrontendError> {
    complete_sign_in(UserFlow::SignIn, query.into_inner(), &session, &app_state).await
}

async fn authorized_mfa(
    query: web::Query<CallbackQuery>,
    session: Session,
    app_state: web::Data<FrontendState>,
) -> Result<HttpResponse, FrontendError> {
    complete_sign_in(UserFlow::Mfa, query.into_inner(), &session, &app_state).await
}

async fn complete_sign_in(
    flow: UserFlow,
    query: CallbackQuery,
    session: &Session,
    app_state: &FrontendState,
) -> Result<HttpResponse, FrontendError> {
    let expected = session.data().state;
    if expected.is_none() || query.state != expected {
        warn!(
            event = "SECURITY_STATE_MISMATCH",
            trace_id = %trace_ctx::trace_id(),
            ?flow,
            "Sign-in callback with unexpected state"
        );
        return Ok(redirect("/"));
    }

    if let Some(error) = query.error {
        return Err(FrontendError::IdentityProvider {
            error,
            description: query.error_description.unwrap_or_default(),
        });
    }

    if let Some(code) = query.code {
        let tokens = app_state.identity.redeem_code(flow, &code).await?;
        let id_token = tokens
            .id_token
            .as_deref()
            .ok_or_else(|| FrontendError::IdentityProvider {
                error: "missing_id_token".to_string(),
                description: "The token response did not include an ID token.".to_string(),
            })?;
        let claims = app_state.identity.verify_id_token(flow, id_token).await?;
        let email = claims.emails().into_iter().next().unwrap_or_default();
        let cached = CachedToken::from_response(&tokens, flow, SystemTime::now());

        session.update(|data| {
            if data.user.is_none() {
                data.user = Some(claims);
            }
            if cached.is_some() {
                data.token_cache = cached;
            }
        });
        info!(?flow, email = %Redacted(&email), "sign-in completed");
    }

    Ok(redirect(match flow {
        UserFlow::SignIn => "/",
        UserFlow::Mfa => "/changeben",
    }))
}

/// Step up to the MFA user flow before changing account data.
async fn change(
    session: Session,
    app_state: web::Data<FrontendState>,
) -> Result<HttpResponse, FrontendError> {
    let state = session.update(|data| {
        data.state
            .get_or_insert_with(|| Uuid::new_v4().to_string())
            .clone()
    });

    let auth_url = app_state.identity.authorize_url(UserFlow::Mfa, &state)?;
    Ok(redirect(&auth_url))
}

async fn logout(
    session: Session,
    app_state: web::Data<FrontendState>,
) -> Result<HttpResponse, FrontendError> {
    session.clear();
    Ok(redirect(&app_state.identity.logout_url()?))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/login", web::get().to(login))
        .route(UserFlow::SignIn.redirect_path(), web::get().to(authorized))
        .route(UserFlow::Mfa.redirect_path(), web::get().to(authorized_mfa))
        .route("/change", web::get().to(change))
        .route("/logout", web::get().to(logout));
}
