//! Bearer-token authentication against an Azure AD B2C tenant.
//!
//! This crate holds everything both services need to trust a B2C-issued
//! token:
//!
//! - [`config::B2cAuthority`] builds the per-user-flow endpoint URLs
//! - [`bearer::extract_bearer`] pulls the raw token out of an `Authorization` header
//! - [`keys::KeyProvider`] resolves signing keys from the tenant's JWKS document
//! - [`validate::TokenValidator`] verifies signature, expiry, audience and issuer
//! - [`claims::Claims`] exposes the verified claims, including the scope check
//!
//! Both services obtain claims only from [`validate::TokenValidator::validate`],
//! so any scope or email they read has already been signature-checked.

pub mod bearer;
pub mod claims;
pub mod config;
pub mod error;
pub mod keys;
pub mod validate;

pub use bearer::extract_bearer;
pub use claims::Claims;
pub use config::{B2cAuthority, ValidationConfig};
pub use error::{AuthError, KeyFetchError};
pub use keys::{CachedKeyProvider, HttpKeyProvider, KeyProvider, StaticKeyProvider};
pub use validate::TokenValidator;
