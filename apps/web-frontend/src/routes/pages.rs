use std::collections::BTreeMap;

use actix_web::{web, HttpResponse};
use serde_json::{json, Value};

use super::{page_data, redirect};
use crate::error::FrontendError;
use crate::session::Session;
use crate::state::FrontendState;

async fn index(
    session: Session,
    app_state: web::Data<FrontendState>,
) -> Result<HttpResponse, FrontendError> {
    let Some(user) = session.user() else {
        return Ok(redirect("/login"));
    };

    app_state
        .templates
        .page("index", &page_data(Some(&user), json!({})))
}

/// Call the API's unauthenticated endpoint and show what came back.
async fn publicapi(
    session: Session,
    app_state: web::Data<FrontendState>,
) -> Result<HttpResponse, FrontendError> {
    let Some(user) = session.user() else {
        return Ok(redirect("/login"));
    };

    let reply = app_state.api.public().await?;

    app_state
        .templates
        .page("apitest", &page_data(Some(&user), json!({ "result": reply.body })))
}

/// The signed-in user's ID-token claims, keys sorted.
async fn claims(
    session: Session,
    app_state: web::Data<FrontendState>,
) -> Result<HttpResponse, FrontendError> {
    let Some(user) = session.user() else {
        return Ok(redirect("/login"));
    };

    let sorted: BTreeMap<&String, &Value> = user.as_map().iter().collect();
    let listing = serde_json::to_string_pretty(&sorted)?;

    app_state
        .templates
        .page("claims", &page_data(Some(&user), json!({ "claims": listing })))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index))
        .route("/publicapi", web::get().to(publicapi))
        .route("/claims", web::get().to(claims));
}
