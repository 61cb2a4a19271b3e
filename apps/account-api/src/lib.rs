//! Account API: serves and updates the signed-in user's account record.
//!
//! Every protected route authenticates through [`extractors::AuthenticatedUser`],
//! which verifies the bearer token before any claim is read, then checks the
//! route's scope before touching the [`store::AccountStore`].

pub mod config;
pub mod error;
pub mod extractors;
pub mod logging;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;

pub use config::ApiConfig;
pub use error::AppError;
pub use state::AppState;
