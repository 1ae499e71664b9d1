// Handler tests against an in-process service
use actix_web::http::{header, StatusCode};
use actix_web::{test, web, App};
use chrono::Duration;
use serde_json::Value;

use super::configure_services;
use crate::testing::constants::{TEST_BOT_NAME, TEST_USER_ID};
use crate::testing::TestFixtures;
use crate::validation::HASH_FIELD;

macro_rules! test_app {
    () => {
        test::init_service(
            App::new()
                .app_data(web::Data::new(TestFixtures::telegram_config()))
                .configure(configure_services),
        )
        .await
    };
}

#[actix_web::test]
async fn test_sign_in_renders_widget() {
    let app = test_app!();
    let req = test::TestRequest::get().uri("/auth/telegram").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get(header::CONTENT_TYPE).unwrap(),
        "text/html; charset=utf-8"
    );
    let body = test::read_body(resp).await;
    let body = std::str::from_utf8(&body).unwrap();
    assert!(body.contains(&format!(r#"data-telegram-login="{TEST_BOT_NAME}""#)));
    assert!(body.contains(r#"data-auth-url="http://localhost:8080/auth/telegram/callback""#));
}

#[actix_web::test]
async fn test_callback_get_success() {
    let app = test_app!();
    let query = TestFixtures::query_string(&TestFixtures::signed_params());
    let req = test::TestRequest::get()
        .uri(&format!("/auth/telegram/callback?{query}"))
        .to_request();

    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["provider"], "telegram");
    assert_eq!(body["uid"], TEST_USER_ID);
    assert_eq!(body["info"]["name"], "Joe Smith");
    assert_eq!(body["info"]["nickname"], "joesmith");
    assert!(body["extra"]["raw_info"].get("hash").is_none());
}

#[actix_web::test]
async fn test_callback_post_form_success() {
    let app = test_app!();
    let form = TestFixtures::as_map(&TestFixtures::signed_params());
    let req = test::TestRequest::post()
        .uri("/auth/telegram/callback")
        .set_form(&form)
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_callback_forged_hash_redirects_to_failure() {
    let app = test_app!();
    let mut params = TestFixtures::signed_params();
    params.insert(HASH_FIELD, "HASH");
    let req = test::TestRequest::get()
        .uri(&format!(
            "/auth/telegram/callback?{}",
            TestFixtures::query_string(&params)
        ))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(
        resp.headers().get(header::LOCATION).unwrap(),
        "/auth/failure?message=signature_mismatch&strategy=telegram"
    );
}

#[actix_web::test]
async fn test_callback_stale_login_redirects_to_failure() {
    let app = test_app!();
    let params = TestFixtures::signed_params_with_age(Duration::seconds(90_000));
    let req = test::TestRequest::get()
        .uri(&format!(
            "/auth/telegram/callback?{}",
            TestFixtures::query_string(&params)
        ))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(
        resp.headers().get(header::LOCATION).unwrap(),
        "/auth/failure?message=session_expired&strategy=telegram"
    );
}

#[actix_web::test]
async fn test_callback_without_parameters() {
    let app = test_app!();
    let req = test::TestRequest::get()
        .uri("/auth/telegram/callback")
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(
        resp.headers().get(header::LOCATION).unwrap(),
        "/auth/failure?message=missing_required_field&strategy=telegram"
    );
}

#[actix_web::test]
async fn test_failure_endpoint_describes_reason() {
    let app = test_app!();
    let req = test::TestRequest::get()
        .uri("/auth/failure?message=session_expired&strategy=telegram")
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "session_expired");
    assert_eq!(body["strategy"], "telegram");
    assert_eq!(
        body["error_description"],
        "The login callback is too old, please sign in again"
    );
}

#[actix_web::test]
async fn test_health() {
    let app = test_app!();
    let req = test::TestRequest::get().uri("/ping").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "ok");
}
