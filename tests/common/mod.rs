#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use restaurant_backend_rs::{
    app,
    modules::user::repository::{Role, User},
    types::Context,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

pub const PASSWORD: &str = "correct horse battery staple";

pub struct TestApp {
    pub ctx: Arc<Context>,
    router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        let ctx = Arc::new(Context::in_memory(b"integration-secret"));
        let router = app::router(ctx.clone());

        Self { ctx, router }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");

        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }

        let body = match body {
            Some(body) => Body::from(body.to_string()),
            None => Body::empty(),
        };

        self.send(builder.body(body).unwrap()).await
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        let body = match bytes.is_empty() {
            true => Value::Null,
            false => serde_json::from_slice(&bytes).unwrap(),
        };

        (status, body)
    }

    pub async fn sign_up(&self, phone_number: &str, email: &str) -> Value {
        let (status, body) = self
            .request(
                Method::POST,
                "/signup",
                None,
                Some(json!({
                    "phone_number": phone_number,
                    "email": email,
                    "password": PASSWORD,
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body
    }

    pub async fn login(&self, phone_number: &str) -> String {
        let (status, body) = self
            .request(
                Method::POST,
                "/login",
                None,
                Some(json!({ "phone_number": phone_number, "password": PASSWORD })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        body["token"].as_str().unwrap().to_string()
    }

    /// Signs a user up and returns a session token for them.
    pub async fn user(&self, phone_number: &str, email: &str) -> String {
        self.sign_up(phone_number, email).await;
        self.login(phone_number).await
    }

    /// Signs a user up, promotes them out of band and returns an admin token.
    pub async fn admin(&self, phone_number: &str, email: &str) -> String {
        let user = self.sign_up(phone_number, email).await;
        self.ctx
            .db
            .users
            .update_role_by_id(user["id"].as_str().unwrap(), Role::Admin)
            .await
            .unwrap()
            .unwrap();
        self.login(phone_number).await
    }

    pub async fn find_user(&self, phone_number: &str) -> User {
        self.ctx
            .db
            .users
            .find_by_phone_number(phone_number)
            .await
            .unwrap()
            .unwrap()
    }
}
