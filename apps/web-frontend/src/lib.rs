//! Browser-facing front-end for the account demo.
//!
//! Signs users in through the B2C authorization-code flow (a standard and a
//! step-up MFA user flow), keeps their verified ID-token claims and access
//! token in a server-side session, and calls the account API on their behalf.

pub mod api_client;
pub mod config;
pub mod error;
pub mod identity;
pub mod middleware;
pub mod routes;
pub mod session;
pub mod state;
pub mod templates;
pub mod token_cache;

pub use config::{FrontendConfig, UserFlow};
pub use error::FrontendError;
pub use state::FrontendState;
