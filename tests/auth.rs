mod common;

use actix_web::http::{header, StatusCode};
use actix_web::middleware::Logger;
use actix_web::{test, web, App};
use chrono::Duration;
use docforge::routes;
use serde_json::json;

#[actix_rt::test]
#[ignore] // Requires a Postgres DATABASE_URL
async fn test_register_and_login_flow() {
    let pool = common::test_pool().await;
    let email = common::unique_email("auth-flow");

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(common::token_service()))
            .wrap(Logger::default())
            .configure(routes::config),
    )
    .await;

    let user_id = common::register(&app, &email, "pw").await;
    assert!(user_id > 0);

    // Second registration with the same email is rejected.
    let req = test::TestRequest::post()
        .uri("/register")
        .set_json(json!({ "email": email, "password": "other" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Email already registered");

    let token = common::login(&app, &email, "pw").await;
    let claims = common::token_service().validate(&token).unwrap();
    assert_eq!(claims.sub, email);

    common::cleanup_user(&pool, &email).await;
}

#[actix_rt::test]
#[ignore] // Requires a Postgres DATABASE_URL
async fn test_invalid_login_inputs() {
    let pool = common::test_pool().await;
    let email = common::unique_email("auth-login");

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(common::token_service()))
            .configure(routes::config),
    )
    .await;
    common::register(&app, &email, "Password123!").await;

    let test_cases = vec![
        (
            json!({ "password": "Password123!" }),
            StatusCode::BAD_REQUEST,
            "missing email",
        ),
        (
            json!({ "email": "invalid-email", "password": "Password123!" }),
            StatusCode::BAD_REQUEST,
            "email that matches no account",
        ),
        (
            json!({ "email": email, "password": "WrongPassword123!" }),
            StatusCode::BAD_REQUEST,
            "incorrect password",
        ),
        (
            json!({ "email": common::unique_email("nobody"), "password": "Password123!" }),
            StatusCode::BAD_REQUEST,
            "non-existent user",
        ),
    ];

    for (payload, expected_status, description) in test_cases {
        let req = test::TestRequest::post()
            .uri("/login")
            .set_json(&payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        let status = resp.status();
        let body_bytes = test::read_body(resp).await;

        assert_eq!(
            status,
            expected_status,
            "Test case failed: {}. Body: {:?}",
            description,
            String::from_utf8_lossy(&body_bytes)
        );
        if description != "missing email" {
            let body: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();
            assert_eq!(body["error"], "Incorrect email or password", "{}", description);
        }
    }

    common::cleanup_user(&pool, &email).await;
}

#[actix_rt::test]
#[ignore] // Requires a Postgres DATABASE_URL
async fn test_register_accepts_free_form_credentials() {
    let pool = common::test_pool().await;
    let email = format!("alice-{}", common::unique_email("plain").replace('@', "-at-"));

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(common::token_service()))
            .configure(routes::config),
    )
    .await;

    common::register(&app, &email, "").await;
    let token = common::login(&app, &email, "").await;
    assert_eq!(common::token_service().validate(&token).unwrap().sub, email);

    common::cleanup_user(&pool, &email).await;
}

#[actix_rt::test]
#[ignore] // Requires a Postgres DATABASE_URL
async fn test_token_for_unknown_user_is_rejected() {
    let pool = common::test_pool().await;
    let email = common::unique_email("auth-gone");

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(common::token_service()))
            .configure(routes::config),
    )
    .await;
    let token = common::register_and_login(&app, &email, "pw").await;
    common::cleanup_user(&pool, &email).await;

    let req = test::TestRequest::get()
        .uri("/projects")
        .insert_header(common::bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn test_protected_routes_require_bearer_token() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(common::lazy_pool()))
            .app_data(web::Data::new(common::token_service()))
            .configure(routes::config),
    )
    .await;

    let expired = common::token_service()
        .issue_with_ttl("a@x.com", Duration::hours(-2))
        .unwrap();
    let just_expired = common::token_service()
        .issue_with_ttl("a@x.com", Duration::seconds(-30))
        .unwrap();
    let authorizations = vec![
        None,
        Some("Bearer".to_string()),
        Some("Bearer not-a-token".to_string()),
        Some(format!("Bearer {}", expired)),
        Some(format!("Bearer {}", just_expired)),
    ];

    for authorization in authorizations {
        let requests = vec![
            test::TestRequest::get().uri("/projects"),
            test::TestRequest::post()
                .uri("/projects")
                .set_json(json!({ "title": "T", "content": "C", "doc_type": "docx" })),
            test::TestRequest::delete().uri("/projects/1"),
            test::TestRequest::put()
                .uri("/projects/1/feedback")
                .set_json(json!({ "is_liked": true, "is_disliked": false, "user_notes": null })),
        ];

        for req in requests {
            let req = match &authorization {
                Some(value) => req.insert_header((header::AUTHORIZATION, value.clone())),
                None => req,
            };
            let resp = test::call_service(&app, req.to_request()).await;

            assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "auth {:?}", authorization);
            assert_eq!(
                resp.headers().get(header::WWW_AUTHENTICATE).unwrap(),
                "Bearer"
            );
            let body: serde_json::Value = test::read_body_json(resp).await;
            assert_eq!(body["error"], "Could not validate credentials");
        }
    }
}
