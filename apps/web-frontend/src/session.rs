//! Server-side sessions keyed by a random id in an `HttpOnly` cookie.
//!
//! Session contents never leave the process. A cookie naming an unknown id
//! (expired, logged out, or forged) is ignored and a fresh id is issued, so a
//! client cannot choose its own session id.

use std::future::{ready, Ready};
use std::sync::Arc;
use std::time::{Duration, Instant};

use actix_web::dev::Payload;
use actix_web::{web, FromRequest, HttpMessage, HttpRequest};
use b2c_auth::Claims;
use dashmap::DashMap;
use uuid::Uuid;

use crate::error::FrontendError;
use crate::state::FrontendState;
use crate::token_cache::CachedToken;

pub const SESSION_COOKIE: &str = "b2c_session";

#[derive(Debug, Clone, Default)]
pub struct SessionData {
    /// OAuth `state` sent with the last authorize request
    pub state: Option<String>,
    /// Verified ID-token claims of the signed-in user
    pub user: Option<Claims>,
    pub token_cache: Option<CachedToken>,
    /// Anti-forgery token for the beneficiary form
    pub csrf: Option<String>,
}

struct Entry {
    data: SessionData,
    touched: Instant,
}

#[derive(Default)]
pub struct SessionStore {
    sessions: DashMap<String, Entry>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.sessions.contains_key(id)
    }

    /// Snapshot of a session; empty if the id is unknown.
    pub fn load(&self, id: &str) -> SessionData {
        match self.sessions.get_mut(id) {
            Some(mut entry) => {
                entry.touched = Instant::now();
                entry.data.clone()
            }
            None => SessionData::default(),
        }
    }

    /// Mutate a session, creating it on first write.
    pub fn update<R>(&self, id: &str, f: impl FnOnce(&mut SessionData) -> R) -> R {
        let mut entry = self.sessions.entry(id.to_string()).or_insert_with(|| Entry {
            data: SessionData::default(),
            touched: Instant::now(),
        });
        entry.touched = Instant::now();
        f(&mut entry.data)
    }

    pub fn remove(&self, id: &str) {
        self.sessions.remove(id);
    }

    /// Drop sessions not used for `max_idle`; returns how many were dropped.
    pub fn purge_idle(&self, max_idle: Duration) -> usize {
        let before = self.sessions.len();
        self.sessions
            .retain(|_, entry| entry.touched.elapsed() < max_idle);
        before.saturating_sub(self.sessions.len())
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

/// Stored in request extensions when this request was given a new session
/// id; `SessionCookie` turns it into a `Set-Cookie` header.
#[derive(Debug, Clone)]
pub struct IssuedSession(pub String);

/// The current request's session.
pub struct Session {
    id: String,
    store: Arc<SessionStore>,
}

impl Session {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn data(&self) -> SessionData {
        self.store.load(&self.id)
    }

    pub fn user(&self) -> Option<Claims> {
        self.data().user
    }

    pub fn update<R>(&self, f: impl FnOnce(&mut SessionData) -> R) -> R {
        self.store.update(&self.id, f)
    }

    /// Forget everything, including the user and token cache.
    pub fn clear(&self) {
        self.store.remove(&self.id);
    }

    fn from_http_request(req: &HttpRequest) -> Result<Self, FrontendError> {
        let app_state = req
            .app_data::<web::Data<FrontendState>>()
            .ok_or_else(|| FrontendError::config("FrontendState not registered"))?;
        let store = app_state.sessions.clone();

        let known = req
            .cookie(SESSION_COOKIE)
            .map(|cookie| cookie.value().to_string())
            .filter(|id| store.contains(id));

        let id = match known {
            Some(id) => id,
            None => {
                let id = Uuid::new_v4().to_string();
                req.extensions_mut().insert(IssuedSession(id.clone()));
                id
            }
        };

        Ok(Session { id, store })
    }
}

impl FromRequest for Session {
    type Error = FrontendError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(Self::from_http_request(req))
    }
}
