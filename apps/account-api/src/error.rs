use actix_web::error::ResponseError;
use actix_web::http::header::{self, HeaderValue};
use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use b2c_auth::AuthError;
use serde::Serialize;
use thiserror::Error;
use web_infra::trace_ctx;

use crate::store::StoreError;

/// Body of every JSON error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub description: String,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("Record not found")]
    RecordNotFound,
    #[error("Update failed")]
    UpdateFailed,
    #[error("Bad request: {detail}")]
    BadRequest { code: &'static str, detail: String },
    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),
    #[error("Internal error: {detail}")]
    Internal { detail: String },
    #[error("Configuration error: {detail}")]
    Config { detail: String },
}

impl AppError {
    fn code(&self) -> &'static str {
        match self {
            AppError::Auth(err) => err.code(),
            AppError::RecordNotFound => "record_not_found",
            AppError::UpdateFailed => "update_failed",
            AppError::BadRequest { code, .. } => *code,
            AppError::Storage(_) => "storage_error",
            AppError::Internal { .. } => "internal_error",
            AppError::Config { .. } => "config_error",
        }
    }

    fn description(&self) -> String {
        match self {
            AppError::Auth(err) => err.description().to_string(),
            AppError::RecordNotFound => "Record not found".to_string(),
            AppError::UpdateFailed => "Failure".to_string(),
            AppError::BadRequest { detail, .. } => detail.clone(),
            // Storage and internal details stay in the logs
            AppError::Storage(_) => "Unable to access account records".to_string(),
            AppError::Internal { .. } => "Internal server error".to_string(),
            AppError::Config { .. } => "Server is misconfigured".to_string(),
        }
    }

    /// Get the HTTP status code for this error
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Auth(err) => {
                StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::UNAUTHORIZED)
            }
            AppError::RecordNotFound => StatusCode::BAD_REQUEST,
            AppError::UpdateFailed => StatusCode::BAD_REQUEST,
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Config { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn bad_request(code: &'static str, detail: impl Into<String>) -> Self {
        Self::BadRequest {
            code,
            detail: detail.into(),
        }
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self::Internal {
            detail: detail.into(),
        }
    }

    pub fn config(detail: impl Into<String>) -> Self {
        Self::Config {
            detail: detail.into(),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        self.status()
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status();
        let trace_id = trace_ctx::trace_id();

        if status.is_server_error() {
            tracing::error!(%trace_id, error = %self, "request failed");
        }

        let mut builder = HttpResponse::build(status);
        builder.insert_header(("x-trace-id", trace_id));

        // Clients match on this exact text body
        if let AppError::RecordNotFound = self {
            return builder
                .content_type("text/plain; charset=utf-8")
                .body("Record not found");
        }

        if status == StatusCode::UNAUTHORIZED {
            builder.insert_header((header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer")));
        }

        builder.json(ErrorBody {
            code: self.code().to_string(),
            description: self.description(),
        })
    }
}
