use crate::AuthError;

/// Extract the raw token from an `Authorization` header value.
///
/// The scheme is matched case-insensitively and the value must split into
/// exactly two whitespace-separated parts.
pub fn extract_bearer(header: Option<&str>) -> Result<&str, AuthError> {
    let value = match header {
        Some(value) if !value.is_empty() => value,
        _ => return Err(AuthError::MissingHeader),
    };

    let parts: Vec<&str> = value.split_whitespace().collect();

    match parts.as_slice() {
        [scheme, ..] if !scheme.eq_ignore_ascii_case("bearer") => Err(
            AuthError::MalformedHeader("Authorization header must start with Bearer"),
        ),
        [] => Err(AuthError::MalformedHeader(
            "Authorization header must start with Bearer",
        )),
        [_] => Err(AuthError::MalformedHeader("Token not found")),
        [_, token] => Ok(*token),
        _ => Err(AuthError::MalformedHeader(
            "Authorization header must be Bearer token",
        )),
    }
}
