use std::future::{ready, Ready};

use actix_web::cookie::{Cookie, SameSite};
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{Error, HttpMessage};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::session::{IssuedSession, SESSION_COOKIE};

/// Sets the session cookie on responses to requests that were issued a new
/// session id.
#[derive(Clone, Copy)]
pub struct SessionCookie {
    secure: bool,
}

impl SessionCookie {
    pub fn new(secure: bool) -> Self {
        Self { secure }
    }
}

impl<S, B> Transform<S, ServiceRequest> for SessionCookie
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = SessionCookieMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SessionCookieMiddleware {
            service,
            secure: self.secure,
        }))
    }
}

pub struct SessionCookieMiddleware<S> {
    service: S,
    secure: bool,
}

impl<S, B> Service<ServiceRequest> for SessionCookieMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let secure = self.secure;
        let fut = self.service.call(req);

        Box::pin(async move {
            let mut res = fut.await?;

            let issued = res.request().extensions().get::<IssuedSession>().cloned();
            if let Some(IssuedSession(id)) = issued {
                let cookie = Cookie::build(SESSION_COOKIE, id)
                    .path("/")
                    .http_only(true)
                    .same_site(SameSite::Lax)
                    .secure(secure)
                    .finish();

                if let Err(e) = res.response_mut().add_cookie(&cookie) {
                    warn!(error = %e, "unable to set session cookie");
                }
            }

            Ok(res)
        })
    }
}
