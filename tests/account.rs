mod common;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use common::{TestApp, PASSWORD};
use restaurant_backend_rs::modules::{auth::service::otp::Channel, user::repository::Role};
use serde_json::json;

#[tokio::test]
async fn signup_then_login_issues_a_user_token() {
    let app = TestApp::new();

    let user = app.sign_up("09121234567", "Owner@Example.com").await;
    assert_eq!(user["phone_number"], "09121234567");
    assert_eq!(user["email"], "owner@example.com");
    assert_eq!(user["role"], "user");
    assert!(user.get("password_hash").is_none());
    assert!(user.get("sms_code").is_none());

    let token = app.login("09121234567").await;
    let claims = app.ctx.auth.tokens.validate(&token).unwrap();
    assert_eq!(claims.sub, user["id"].as_str().unwrap());
    assert_eq!(claims.role, Role::User);
    assert_eq!(claims.phone_number, "09121234567");
}

#[tokio::test]
async fn signup_rejects_bad_input_and_duplicates() {
    let app = TestApp::new();
    app.sign_up("09121234567", "owner@example.com").await;

    let (status, body) = app
        .request(
            Method::POST,
            "/signup",
            None,
            Some(json!({ "phone_number": "12345", "email": "nope", "password": PASSWORD })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["errors"]["phone_number"].is_array());
    assert!(body["errors"]["email"].is_array());

    let (status, body) = app
        .request(
            Method::POST,
            "/signup",
            None,
            Some(json!({
                "phone_number": "09350000000",
                "email": "owner@example.com",
                "password": PASSWORD,
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Email already in use");

    let (status, body) = app
        .request(
            Method::POST,
            "/signup",
            None,
            Some(json!({
                "phone_number": "09121234567",
                "email": "other@example.com",
                "password": PASSWORD,
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Phone number already in use");
}

#[tokio::test]
async fn password_login_does_not_reveal_which_part_was_wrong() {
    let app = TestApp::new();
    app.sign_up("09121234567", "owner@example.com").await;

    for (phone_number, password) in [("09121234567", "wrong"), ("09129999999", PASSWORD)] {
        let (status, body) = app
            .request(
                Method::POST,
                "/login",
                None,
                Some(json!({ "phone_number": phone_number, "password": password })),
            )
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Invalid credentials");
    }
}

#[tokio::test]
async fn sms_code_logs_in_once() {
    let app = TestApp::new();
    app.sign_up("09121234567", "owner@example.com").await;

    let (status, _) = app
        .request(
            Method::POST,
            "/login/sms/request",
            None,
            Some(json!({ "phone_number": "09121234567" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let user = app.find_user("09121234567").await;
    let code = user.verification_code(Channel::Sms).0.unwrap().to_string();
    let verify = json!({ "phone_number": "09121234567", "code": code });

    let (status, body) = app
        .request(Method::POST, "/login/sms/verify", None, Some(verify.clone()))
        .await;
    assert_eq!(status, StatusCode::OK);
    let claims = app
        .ctx
        .auth
        .tokens
        .validate(body["token"].as_str().unwrap())
        .unwrap();
    assert_eq!(claims.sub, user.id);

    let (status, body) = app
        .request(Method::POST, "/login/sms/verify", None, Some(verify))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid code");
}

#[tokio::test]
async fn email_code_logs_in() {
    let app = TestApp::new();
    app.sign_up("09121234567", "owner@example.com").await;

    let (status, _) = app
        .request(
            Method::POST,
            "/login/email/request",
            None,
            Some(json!({ "email": "Owner@example.com" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let user = app.find_user("09121234567").await;
    let code = user.verification_code(Channel::Email).0.unwrap().to_string();
    assert!(user.verification_code(Channel::Sms).0.is_none());

    let (status, body) = app
        .request(
            Method::POST,
            "/login/email/verify",
            None,
            Some(json!({ "email": "owner@example.com", "code": code })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["token"].is_string());
}

#[tokio::test]
async fn code_endpoints_report_unknown_users() {
    let app = TestApp::new();

    let (status, body) = app
        .request(
            Method::POST,
            "/login/email/request",
            None,
            Some(json!({ "email": "ghost@example.com" })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "User not found");

    let (status, _) = app
        .request(
            Method::POST,
            "/login/sms/verify",
            None,
            Some(json!({ "phone_number": "09121234567", "code": "123456" })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn role_change_shows_up_in_new_tokens() {
    let app = TestApp::new();
    let admin = app.admin("09120000001", "admin@example.com").await;
    let user = app.sign_up("09121234567", "owner@example.com").await;
    let old_token = app.login("09121234567").await;

    let (status, body) = app
        .request(
            Method::PUT,
            &format!("/api/v1/users/{}/role", user["id"].as_str().unwrap()),
            Some(&admin),
            Some(json!({ "role": "admin" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "admin");

    let new_token = app.login("09121234567").await;
    assert_eq!(
        app.ctx.auth.tokens.validate(&new_token).unwrap().role,
        Role::Admin
    );
    assert_eq!(
        app.ctx.auth.tokens.validate(&old_token).unwrap().role,
        Role::User
    );
}

#[tokio::test]
async fn user_administration_requires_admin() {
    let app = TestApp::new();
    let token = app.user("09121234567", "owner@example.com").await;

    let (status, body) = app
        .request(Method::GET, "/api/v1/users", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "You are not authorized to perform this action");
}

#[tokio::test]
async fn authorization_header_failures_are_distinct() {
    let app = TestApp::new();
    let token = app.user("09121234567", "owner@example.com").await;

    let (status, body) = app
        .request(Method::GET, "/api/v1/users", None, None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Authorization header is missing");

    let request = Request::builder()
        .method(Method::GET)
        .uri("/api/v1/users")
        .header(header::AUTHORIZATION, format!("Token {token}"))
        .body(Body::empty())
        .unwrap();
    let (status, body) = app.send(request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid token format");

    let (status, body) = app
        .request(Method::GET, "/api/v1/users", Some("garbage"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid token");
}

#[tokio::test]
async fn admin_manages_users() {
    let app = TestApp::new();
    let admin = app.admin("09120000001", "admin@example.com").await;
    let user = app.sign_up("09121234567", "owner@example.com").await;
    let id = user["id"].as_str().unwrap();

    let (status, body) = app
        .request(Method::GET, "/api/v1/users?page=1&per_page=1", Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["total"], 2);
    assert_eq!(body["meta"]["per_page"], 1);
    assert_eq!(body["items"].as_array().unwrap().len(), 1);

    let (status, body) = app
        .request(
            Method::PUT,
            &format!("/api/v1/users/{id}"),
            Some(&admin),
            Some(json!({ "phone_number": "not-a-phone" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["errors"]["phone_number"].is_array());

    let (status, body) = app
        .request(
            Method::PUT,
            &format!("/api/v1/users/{id}"),
            Some(&admin),
            Some(json!({ "email": "admin@example.com" })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Email already in use");

    let (status, body) = app
        .request(
            Method::PUT,
            &format!("/api/v1/users/{id}"),
            Some(&admin),
            Some(json!({ "phone_number": "09357654321" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["phone_number"], "09357654321");

    let (status, _) = app
        .request(Method::DELETE, &format!("/api/v1/users/{id}"), Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .request(Method::GET, &format!("/api/v1/users/{id}"), Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .request(
            Method::POST,
            "/login",
            None,
            Some(json!({ "phone_number": "09357654321", "password": PASSWORD })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn ping_answers_pong() {
    let app = TestApp::new();

    let (status, body) = app.request(Method::GET, "/ping", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "pong");
}

#[tokio::test]
async fn deleted_users_keep_their_email_and_phone_number() {
    let app = TestApp::new();
    let admin = app.admin("09120000001", "admin@example.com").await;
    let gone = app.sign_up("09121111111", "gone@example.com").await;
    let keep = app.sign_up("09122222222", "keep@example.com").await;
    let keep_uri = format!("/api/v1/users/{}", keep["id"].as_str().unwrap());

    let (status, _) = app
        .request(
            Method::DELETE,
            &format!("/api/v1/users/{}", gone["id"].as_str().unwrap()),
            Some(&admin),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .request(
            Method::PUT,
            &keep_uri,
            Some(&admin),
            Some(json!({ "email": "Gone@example.com" })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Email already in use");

    let (status, body) = app
        .request(
            Method::PUT,
            &keep_uri,
            Some(&admin),
            Some(json!({ "phone_number": "09121111111" })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Phone number already in use");

    let (status, body) = app
        .request(
            Method::PUT,
            &keep_uri,
            Some(&admin),
            Some(json!({ "email": "keep@example.com", "phone_number": "09122222222" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "keep@example.com");
}
