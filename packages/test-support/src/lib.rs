//! Test support utilities shared by the workspace.
//!
//! - [`keys`]: RSA signing keys, a matching JWKS document and token minting
//! - [`logging`]: idempotent tracing bootstrap for test binaries
//! - [`error_body`]: assertions for the `{code, description}` error contract
//! - [`unique_email`]: collision-free test addresses

use ulid::Ulid;

pub mod error_body;
pub mod keys;
pub mod logging;

/// Generate a unique email address with the given prefix
///
/// # Returns
/// A unique email address in the format `{prefix}-{ulid}@example.test`
///
/// # Examples
/// ```
/// use test_support::unique_email;
///
/// let email1 = unique_email("test");
/// let email2 = unique_email("test");
/// assert_ne!(email1, email2);
/// assert!(email1.ends_with("@example.test"));
/// ```
pub fn unique_email(prefix: &str) -> String {
    format!("{}-{}@example.test", prefix, Ulid::new())
}
