//! Account pages backed by the account API.

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::warn;
use uuid::Uuid;
use web_infra::trace_ctx;

use super::{page_data, redirect};
use crate::error::FrontendError;
use crate::session::Session;
use crate::state::FrontendState;
use crate::token_cache::acquire_silent;

/// Body the API sends when no account matches the caller.
pub const RECORD_NOT_FOUND: &str = "Record not found";

#[derive(Debug, Default, Deserialize)]
pub struct BeneficiaryForm {
    #[serde(default)]
    pub csrf_token: String,
    #[serde(default)]
    pub beneficiary_name: String,
}

async fn acctinfo(
    session: Session,
    app_state: web::Data<FrontendState>,
) -> Result<HttpResponse, FrontendError> {
    let Some(access_token) = acquire_silent(&session, &app_state.identity).await? else {
        return Ok(redirect("/login"));
    };
    let user = session.user();

    let reply = app_state.api.account_info(&access_token).await?;

    if reply.is_success() {
        let account: Value = match serde_json::from_str(&reply.body) {
            Ok(account) => account,
            Err(_) => return Err(reply.into_error()),
        };
        return app_state
            .templates
            .page("account", &page_data(user.as_ref(), json!({ "account": account })));
    }

    if reply.body == RECORD_NOT_FOUND {
        return app_state
            .templates
            .page("noaccount", &page_data(user.as_ref(), json!({})));
    }

    Err(reply.into_error())
}

async fn changeben_form(
    session: Session,
    app_state: web::Data<FrontendState>,
) -> Result<HttpResponse, FrontendError> {
    let Some(user) = session.user() else {
        return Ok(redirect("/login"));
    };

    let csrf_token = issue_csrf(&session);
    app_state.templates.page(
        "bene",
        &page_data(Some(&user), json!({ "csrf_token": csrf_token })),
    )
}

async fn changeben_submit(
    form: web::Form<BeneficiaryForm>,
    session: Session,
    app_state: web::Data<FrontendState>,
) -> Result<HttpResponse, FrontendError> {
    let Some(user) = session.user() else {
        return Ok(redirect("/login"));
    };
    let form = form.into_inner();

    // Single use: a replayed or stale form is rejected
    let expected = session.update(|data| data.csrf.take());
    let problem = if expected.as_deref() != Some(form.csrf_token.as_str()) {
        warn!(
            event = "SECURITY_CSRF_REJECTED",
            trace_id = %trace_ctx::trace_id(),
            "Beneficiary form with invalid CSRF token"
        );
        Some("The form has expired. Please submit it again.")
    } else if form.beneficiary_name.trim().is_empty() {
        Some("Beneficiary Name is required.")
    } else {
        None
    };

    if let Some(problem) = problem {
        let csrf_token = issue_csrf(&session);
        let html = app_state.templates.render(
            "bene",
            &page_data(
                Some(&user),
                json!({
                    "csrf_token": csrf_token,
                    "error": problem,
                    "beneficiary_name": form.beneficiary_name,
                }),
            ),
        )?;
        return Ok(HttpResponse::BadRequest()
            .content_type("text/html; charset=utf-8")
            .body(html));
    }

    let Some(access_token) = acquire_silent(&session, &app_state.identity).await? else {
        return Ok(redirect("/login"));
    };

    let reply = app_state
        .api
        .update_beneficiary(&access_token, form.beneficiary_name.trim())
        .await?;
    if !reply.is_success() {
        return Err(reply.into_error());
    }
    if reply.body != "Success" {
        warn!(body = %reply.body, "beneficiary update not applied");
    }

    Ok(redirect("/acctinfo"))
}

fn issue_csrf(session: &Session) -> String {
    let token = Uuid::new_v4().to_string();
    session.update(|data| data.csrf = Some(token.clone()));
    token
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/acctinfo", web::get().to(acctinfo)).service(
        web::resource("/changeben")
            .route(web::get().to(changeben_form))
            .route(web::post().to(changeben_submit)),
    );
}
