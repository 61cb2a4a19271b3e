use std::future::{ready, Ready};
use std::time::Instant;

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::AUTHORIZATION;
use actix_web::http::StatusCode;
use actix_web::{Error as ActixError, HttpMessage};
use futures_util::future::LocalBoxFuture;
use tracing::{error, info, warn};

use crate::trace_ctx::TraceId;

/// How a request ended, as seen by an operator reading the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Ok,
    Redirect,
    /// 401: no usable credentials
    Unauthenticated,
    /// 403: credentials without the needed scope
    Forbidden,
    Rejected,
    Failed,
}

impl Outcome {
    pub fn from_status(status: StatusCode) -> Self {
        match status.as_u16() {
            401 => Outcome::Unauthenticated,
            403 => Outcome::Forbidden,
            _ if status.is_server_error() => Outcome::Failed,
            _ if status.is_client_error() => Outcome::Rejected,
            _ if status.is_redirection() => Outcome::Redirect,
            _ => Outcome::Ok,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Outcome::Ok => "ok",
            Outcome::Redirect => "redirect",
            Outcome::Unauthenticated => "unauthenticated",
            Outcome::Forbidden => "forbidden",
            Outcome::Rejected => "rejected",
            Outcome::Failed => "failed",
        }
    }
}

/// Everything the `request_completed` event reports.
struct Completed {
    method: String,
    path: String,
    /// Route pattern, `None` when no route matched
    route: Option<String>,
    bearer: bool,
    trace_id: String,
    status: StatusCode,
    duration_us: u64,
}

impl Completed {
    fn emit(&self) {
        let outcome = Outcome::from_status(self.status);
        let route = self.route.as_deref().unwrap_or("-");
        let status_code = self.status.as_u16();

        match outcome {
            Outcome::Failed => error!(
                http.method = %self.method, url.path = %self.path, http.route = %route,
                http.status_code = status_code, outcome = outcome.as_str(), bearer = self.bearer,
                duration_us = self.duration_us, trace_id = %self.trace_id, message = "request_completed"
            ),
            Outcome::Unauthenticated | Outcome::Forbidden | Outcome::Rejected => warn!(
                http.method = %self.method, url.path = %self.path, http.route = %route,
                http.status_code = status_code, outcome = outcome.as_str(), bearer = self.bearer,
                duration_us = self.duration_us, trace_id = %self.trace_id, message = "request_completed"
            ),
            Outcome::Ok | Outcome::Redirect => info!(
                http.method = %self.method, url.path = %self.path, http.route = %route,
                http.status_code = status_code, outcome = outcome.as_str(), bearer = self.bearer,
                duration_us = self.duration_us, trace_id = %self.trace_id, message = "request_completed"
            ),
        }
    }
}

/// Emits one `request_completed` event per request, leveled by outcome.
///
/// Alongside method, path and status it records the matched route, whether a
/// bearer credential was presented (never the credential itself) and an
/// `outcome` that separates authentication failures from scope denials.
pub struct StructuredLogger;

impl<S, B> Transform<S, ServiceRequest> for StructuredLogger
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = ActixError;
    type InitError = ();
    type Transform = StructuredLoggerMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(StructuredLoggerMiddleware { service }))
    }
}

pub struct StructuredLoggerMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for StructuredLoggerMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = ActixError;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let start = Instant::now();
        let method = req.method().to_string();
        let path = req.path().to_string();
        let route = req.match_pattern();
        let bearer = req
            .headers()
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| {
                value
                    .get(..7)
                    .is_some_and(|scheme| scheme.eq_ignore_ascii_case("bearer "))
            });
        let trace_id = req
            .extensions()
            .get::<TraceId>()
            .map(|t| t.0.clone())
            .unwrap_or_else(|| "unknown".to_string());

        let fut = self.service.call(req);

        Box::pin(async move {
            let result = fut.await;

            let status = match &result {
                Ok(res) => res.status(),
                Err(err) => err.as_response_error().status_code(),
            };

            Completed {
                method,
                path,
                route,
                bearer,
                trace_id,
                status,
                duration_us: start.elapsed().as_micros() as u64,
            }
            .emit();

            result
        })
    }
}

#[cfg(test)]
mod tests {
    use actix_web::{test, web, App, HttpResponse};

    use super::*;

    #[::core::prelude::v1::test]
    fn test_outcome_by_status() {
        assert_eq!(Outcome::from_status(StatusCode::OK), Outcome::Ok);
        assert_eq!(Outcome::from_status(StatusCode::FOUND), Outcome::Redirect);
        assert_eq!(
            Outcome::from_status(StatusCode::UNAUTHORIZED),
            Outcome::Unauthenticated
        );
        assert_eq!(Outcome::from_status(StatusCode::FORBIDDEN), Outcome::Forbidden);
        assert_eq!(Outcome::from_status(StatusCode::BAD_REQUEST), Outcome::Rejected);
        assert_eq!(
            Outcome::from_status(StatusCode::BAD_GATEWAY),
            Outcome::Failed
        );
    }

    #[actix_web::test]
    async fn test_passes_responses_through() {
        let app = test::init_service(
            App::new()
                .wrap(StructuredLogger)
                .route("/ok", web::get().to(|| async { HttpResponse::Ok().finish() }))
                .route("/denied", web::get().to(|| async { HttpResponse::Forbidden().finish() })),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/ok")
            .insert_header(("Authorization", "Bearer abc"))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let req = test::TestRequest::get().uri("/denied").to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::FORBIDDEN
        );

        let req = test::TestRequest::get().uri("/missing").to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::NOT_FOUND
        );
    }
}
