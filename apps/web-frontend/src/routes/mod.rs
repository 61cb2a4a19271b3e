use actix_web::http::header::LOCATION;
use actix_web::{web, HttpResponse};
use b2c_auth::Claims;
use serde_json::{json, Value};

pub mod account;
pub mod auth;
pub mod pages;

/// Register every front-end route.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.configure(auth::configure_routes)
        .configure(pages::configure_routes)
        .configure(account::configure_routes);
}

pub(crate) fn redirect(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((LOCATION, location))
        .finish()
}

/// Template data shared by every page: the signed-in user's display name.
pub(crate) fn page_data(user: Option<&Claims>, extra: Value) -> Value {
    let mut data = json!({ "user_name": user.and_then(Claims::display_name) });
    if let (Some(target), Value::Object(fields)) = (data.as_object_mut(), extra) {
        target.extend(fields);
    }
    data
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_data_merges_fields() {
        let user: Claims = serde_json::from_value(json!({ "name": "Ada" })).unwrap();
        let data = page_data(Some(&user), json!({ "result": "ok" }));

        assert_eq!(data, json!({ "user_name": "Ada", "result": "ok" }));
        assert_eq!(page_data(None, json!({}))["user_name"], Value::Null);
    }
}
