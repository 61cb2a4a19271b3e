use actix_web::{web, HttpResponse};
use serde::Deserialize;
use tracing::info;
use web_infra::Redacted;

use crate::error::AppError;
use crate::extractors::AuthenticatedUser;
use crate::services::accounts;
use crate::state::AppState;

pub const ACCOUNT_READ: &str = "Account.Read";
pub const ACCOUNT_WRITE: &str = "Account.Write";

#[derive(Debug, Deserialize)]
pub struct UpdateQuery {
    pub name: Option<String>,
}

async fn acctinfo(
    user: AuthenticatedUser,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    user.require_scope(ACCOUNT_READ)?;

    let account = accounts::lookup(app_state.accounts.as_ref(), &user.emails()).await?;

    Ok(HttpResponse::Ok().json(account))
}

async fn acctupdate(
    user: AuthenticatedUser,
    query: web::Query<UpdateQuery>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    user.require_scope(ACCOUNT_WRITE)?;

    let name = query
        .into_inner()
        .name
        .ok_or_else(|| AppError::bad_request("invalid_request", "name query parameter is required"))?;

    let outcome =
        match accounts::update_beneficiary(app_state.accounts.as_ref(), &user.emails(), &name)
            .await
        {
            Ok(account) => {
                info!(email = %Redacted(&account.email), "beneficiary changed");
                "Success"
            }
            Err(AppError::UpdateFailed) => "Failure",
            Err(e) => return Err(e),
        };

    Ok(HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body(outcome))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/acctinfo", web::get().to(acctinfo))
        .route("/acctupdate", web::get().to(acctupdate));
}
