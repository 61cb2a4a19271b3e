use actix_web::error::ResponseError;
use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use b2c_auth::AuthError;
use handlebars::Handlebars;
use serde_json::json;
use thiserror::Error;
use web_infra::trace_ctx;

const AUTH_ERROR_TEMPLATE: &str = include_str!("../templates/auth_error.hbs");

#[derive(Error, Debug)]
pub enum FrontendError {
    #[error("Configuration error: {detail}")]
    Config { detail: String },
    #[error("Upstream request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("Template rendering failed: {0}")]
    Template(#[from] handlebars::RenderError),
    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Template registration failed: {0}")]
    TemplateSource(#[from] Box<handlebars::TemplateError>),
    /// The identity provider answered with an OAuth error.
    #[error("{error}: {description}")]
    IdentityProvider { error: String, description: String },
    #[error("ID token rejected: {0}")]
    InvalidIdToken(AuthError),
    /// The account API answered with something other than success.
    #[error("Account API returned {status}")]
    Api { status: u16, body: String },
}

impl FrontendError {
    pub fn config(detail: impl Into<String>) -> Self {
        Self::Config {
            detail: detail.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            FrontendError::IdentityProvider { .. } => StatusCode::BAD_REQUEST,
            FrontendError::InvalidIdToken(_) => StatusCode::UNAUTHORIZED,
            FrontendError::Http(_) | FrontendError::Api { .. } => StatusCode::BAD_GATEWAY,
            FrontendError::Config { .. }
            | FrontendError::Url(_)
            | FrontendError::Template(_)
            | FrontendError::Json(_)
            | FrontendError::TemplateSource(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short error name and user-facing explanation for the error page.
    fn summary(&self) -> (String, String) {
        match self {
            FrontendError::IdentityProvider { error, description } => {
                (error.clone(), description.clone())
            }
            FrontendError::InvalidIdToken(err) => {
                (err.code().to_string(), err.description().to_string())
            }
            FrontendError::Api { status, body } => (format!("api_error_{status}"), body.clone()),
            FrontendError::Http(_) => (
                "upstream_unavailable".to_string(),
                "A service this page depends on could not be reached.".to_string(),
            ),
            _ => (
                "internal_error".to_string(),
                "Something went wrong on our side.".to_string(),
            ),
        }
    }
}

impl ResponseError for FrontendError {
    fn status_code(&self) -> StatusCode {
        self.status()
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status();
        let trace_id = trace_ctx::trace_id();

        if status.is_server_error() {
            tracing::error!(%trace_id, error = %self, "page failed");
        } else {
            tracing::warn!(%trace_id, error = %self, "sign-in or API call rejected");
        }

        let (error, description) = self.summary();
        let data = json!({
            "error": error,
            "description": description,
            "trace_id": trace_id,
        });
        let page = Handlebars::new()
            .render_template(AUTH_ERROR_TEMPLATE, &data)
            .unwrap_or_else(|_| format!("{error}: {description}"));

        HttpResponse::build(status)
            .insert_header(("x-trace-id", trace_id))
            .content_type("text/html; charset=utf-8")
            .body(page)
    }
}
