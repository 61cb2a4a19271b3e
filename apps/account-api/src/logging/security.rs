use b2c_auth::AuthError;
use tracing::warn;
use web_infra::trace_ctx;
use web_infra::Redacted;

/// Log a rejected bearer token or Authorization header.
pub fn auth_failed(error: &AuthError, path: &str) {
    let trace_id = trace_ctx::trace_id();

    warn!(
        event = "SECURITY_AUTH_FAILED",
        %trace_id,
        path,
        code = error.code(),
        reason = %error,
        "Authentication failure"
    );
}

/// Log a verified caller that lacks the scope a route requires.
pub fn scope_denied(required_scope: &str, email: Option<&str>, path: &str) {
    let trace_id = trace_ctx::trace_id();

    warn!(
        event = "SECURITY_SCOPE_DENIED",
        %trace_id,
        path,
        required_scope,
        email = %email.map(Redacted).unwrap_or(Redacted("")),
        "Authorization failure"
    );
}
