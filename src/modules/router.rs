use axum::{http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde_json::json;

use super::{auth, menu, menu_item, restaurant, user};
use crate::types::Context;
use std::sync::Arc;

async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "message": "pong" })))
}

fn api_router() -> Router<Arc<Context>> {
    Router::new()
        .nest("/users", user::get_router())
        .nest("/restaurants", restaurant::get_router())
        .nest("/menus", menu::get_router())
        .nest("/menu-items", menu_item::get_router())
}

pub fn get_router() -> Router<Arc<Context>> {
    Router::new()
        .route("/ping", get(health_check))
        .merge(auth::get_router())
        .nest("/api/v1", api_router())
}
