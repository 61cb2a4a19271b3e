#![allow(dead_code)]

// tests/common/mod.rs
use std::time::{Duration, SystemTime};

use actix_web::cookie::Cookie;
use actix_web::dev::ServiceResponse;
use actix_web::http::header::LOCATION;
use actix_web::web;
use b2c_auth::Claims;
use serde_json::{json, Value};
use test_support::keys::{jwk_set, mint_token};
use web_frontend::config::UserFlow;
use web_frontend::session::SESSION_COOKIE;
use web_frontend::state::build_state;
use web_frontend::token_cache::CachedToken;
use web_frontend::{FrontendConfig, FrontendState};
use wiremock::matchers::{body_string_contains, method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const CLIENT_ID: &str = "web-client-id";
pub const TENANT_ID: &str = "tenant-id";
pub const SIGNIN_FLOW: &str = "B2C_1_signupsignin1";
pub const MFA_FLOW: &str = "B2C_1_signupsignin1_mfa";

// Logging is auto-installed for every test binary that includes this module
#[ctor::ctor]
fn init_logging() {
    test_support::logging::init();
}

/// Stand-ins for the identity provider and the account API.
pub struct Upstreams {
    pub idp: MockServer,
    pub api: MockServer,
}

impl Upstreams {
    /// Both servers started, with the tenant key set published for every user flow.
    pub async fn start() -> Self {
        let idp = MockServer::start().await;
        let api = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path_regex(
                r"^/contoso\.onmicrosoft\.com/[^/]+/discovery/v2\.0/keys$",
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(jwk_set()))
            .mount(&idp)
            .await;

        Self { idp, api }
    }

    pub fn config(&self) -> FrontendConfig {
        let idp = self.idp.uri();
        let api = self.api.uri();
        FrontendConfig::from_vars(|name| {
            let value = match name {
                "CLIENT_ID" => CLIENT_ID,
                "CLIENT_SECRET" => "s3cret",
                "B2C_DIR" => "contoso",
                "B2C_TENANT_ID" => TENANT_ID,
                "B2C_AUTHORITY_HOST" => idp.as_str(),
                "API_ENDPOINT" => api.as_str(),
                _ => return None,
            };
            Some(value.to_string())
        })
        .unwrap()
    }

    pub fn state(&self) -> web::Data<FrontendState> {
        web::Data::new(build_state(self.config()).unwrap())
    }

    pub fn issuer(&self) -> String {
        format!("{}/{TENANT_ID}/v2.0/", self.idp.uri())
    }

    /// An ID token for this web app, signed by the tenant key.
    pub fn id_token(&self, name: &str, email: &str) -> String {
        mint_token(
            json!({
                "aud": CLIENT_ID,
                "iss": self.issuer(),
                "sub": "00000000-0000-0000-0000-000000000001",
                "name": name,
                "emails": [email],
            }),
            SystemTime::now(),
        )
    }

    /// Token endpoint of `flow` answering requests whose form body contains `grant`.
    pub async fn mount_token(&self, flow: &str, grant: &str, status: u16, body: Value) {
        Mock::given(method("POST"))
            .and(path(format!(
                "/contoso.onmicrosoft.com/{flow}/oauth2/v2.0/token"
            )))
            .and(body_string_contains(grant))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(&self.idp)
            .await;
    }
}

pub fn user(name: &str, email: &str) -> Claims {
    serde_json::from_value(json!({ "name": name, "emails": [email] })).unwrap()
}

pub fn access_token(access: &str, refresh: Option<&str>, expires_in: Duration) -> CachedToken {
    CachedToken {
        access_token: access.to_string(),
        refresh_token: refresh.map(str::to_string),
        expires_at: SystemTime::now() + expires_in,
        flow: UserFlow::SignIn,
    }
}

/// Put a signed-in session straight into the store and return its cookie.
pub fn signed_in(
    state: &FrontendState,
    user: Claims,
    token: Option<CachedToken>,
) -> Cookie<'static> {
    let id = uuid_like(&user);
    state.sessions.update(&id, |data| {
        data.user = Some(user);
        data.token_cache = token;
    });
    Cookie::new(SESSION_COOKIE, id)
}

fn uuid_like(user: &Claims) -> String {
    format!(
        "test-{}-{}",
        user.display_name().unwrap_or("anon"),
        SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    )
}

/// Session id the response asked the browser to store, if any.
pub fn issued_session<B>(resp: &ServiceResponse<B>) -> Option<String> {
    resp.response()
        .cookies()
        .find(|cookie| cookie.name() == SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
}

pub fn location<B>(resp: &ServiceResponse<B>) -> String {
    resp.headers()
        .get(LOCATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string()
}
