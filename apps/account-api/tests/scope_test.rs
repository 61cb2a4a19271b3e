mod common;

use account_api::routes;
use account_api::store::Account;
use actix_web::http::header::WWW_AUTHENTICATE;
use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use common::{bearer, memory_state, token};
use test_support::error_body::assert_error_body;
use web_infra::RequestTrace;

#[actix_web::test]
async fn test_scope_is_required_per_route() {
    let (state, store) = memory_state(vec![Account::new("a@x.com", "B1")]);
    let app = test::init_service(
        App::new()
            .wrap(RequestTrace)
            .app_data(web::Data::new(state))
            .configure(routes::configure),
    )
    .await;

    // Read scope cannot update
    let read_only = token(&["a@x.com"], "Account.Read");
    let req = test::TestRequest::get()
        .uri("/acctupdate?name=B2")
        .insert_header(bearer(&read_only))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.headers().get(WWW_AUTHENTICATE).is_none());
    let body = assert_error_body(resp, StatusCode::FORBIDDEN, "Unauthorized").await;
    assert_eq!(body["description"], "You don't have access to this resource");

    // Write scope cannot read
    let write_only = token(&["a@x.com"], "Account.Write");
    let req = test::TestRequest::get()
        .uri("/acctinfo")
        .insert_header(bearer(&write_only))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_error_body(resp, StatusCode::FORBIDDEN, "Unauthorized").await;

    assert_eq!(store.snapshot(), vec![Account::new("a@x.com", "B1")]);
}

#[actix_web::test]
async fn test_scope_requires_whole_token_match() {
    let (state, _) = memory_state(vec![Account::new("a@x.com", "B1")]);
    let app = test::init_service(
        App::new()
            .wrap(RequestTrace)
            .app_data(web::Data::new(state))
            .configure(routes::configure),
    )
    .await;

    for scp in ["Account.ReadOnly", "Account", "account.read", ""] {
        let req = test::TestRequest::get()
            .uri("/acctinfo")
            .insert_header(bearer(&token(&["a@x.com"], scp)))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN, "scp {scp:?}");
    }

    let req = test::TestRequest::get()
        .uri("/acctinfo")
        .insert_header(bearer(&token(&["a@x.com"], "openid Account.Read offline_access")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}
