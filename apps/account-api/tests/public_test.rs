mod common;

use account_api::routes;
use account_api::routes::public::PUBLIC_MESSAGE;
use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use common::{bearer, memory_state, token};
use web_infra::{RequestTrace, StructuredLogger, TraceSpan};

#[actix_web::test]
async fn test_public_needs_no_credentials() {
    let (state, _) = memory_state(Vec::new());
    let app = test::init_service(
        App::new()
            .wrap(StructuredLogger)
            .wrap(TraceSpan)
            .wrap(RequestTrace)
            .app_data(web::Data::new(state))
            .configure(routes::configure),
    )
    .await;

    let requests = [
        test::TestRequest::get().uri("/public").to_request(),
        test::TestRequest::get()
            .uri("/public")
            .insert_header(("Authorization", "Basic Zm9vOmJhcg=="))
            .to_request(),
        test::TestRequest::get()
            .uri("/public")
            .insert_header(("Authorization", "Bearer not-a-token"))
            .to_request(),
        test::TestRequest::get()
            .uri("/public")
            .insert_header(bearer(&token(&["a@x.com"], "")))
            .to_request(),
    ];

    for req in requests {
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(resp.headers().contains_key("x-request-id"));
        assert_eq!(test::read_body(resp).await, PUBLIC_MESSAGE);
    }
}

#[actix_web::test]
async fn test_health() {
    let (state, _) = memory_state(Vec::new());
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .configure(routes::configure),
    )
    .await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(test::read_body(resp).await, "ok");
}
