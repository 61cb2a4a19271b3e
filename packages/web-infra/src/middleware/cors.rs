use actix_cors::Cors;
use actix_web::http::header;

/// Build CORS middleware for the given origins.
///
/// Entries that are empty, `null`, or not http(s) are ignored; if nothing
/// valid remains the local front-end origins are allowed. Browsers may send
/// `Content-Type` and `Authorization`.
pub fn cors_middleware(origins: &[String]) -> Cors {
    let allowed_origins: Vec<&str> = origins
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty() && *s != "null")
        .filter(|s| s.starts_with("http://") || s.starts_with("https://"))
        .collect();

    let effective_origins: Vec<&str> = if allowed_origins.is_empty() {
        vec!["http://localhost:5000", "http://127.0.0.1:5000"]
    } else {
        allowed_origins
    };

    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "OPTIONS"])
        .allowed_headers(vec![header::AUTHORIZATION, header::CONTENT_TYPE])
        .expose_headers(vec![
            header::HeaderName::from_static("x-trace-id"),
            header::HeaderName::from_static("x-request-id"),
        ])
        .max_age(3600);

    for origin in effective_origins {
        cors = cors.allowed_origin(origin);
    }

    cors
}

/// Split a comma-separated origin list, as found in `CORS_ALLOWED_ORIGINS`.
pub fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
