use actix_web::{web, HttpResponse};

pub const PUBLIC_MESSAGE: &str = "Successfully accessed the public API endpoint!";

/// Reachability check; ignores any credentials sent with it.
async fn public() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body(PUBLIC_MESSAGE)
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/public", web::get().to(public));
}
