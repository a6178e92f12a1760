mod request_code;
mod sign_in;
mod sign_up;
mod verify_code;

use crate::types::Context;
use axum::routing::{post, Router};
use std::sync::Arc;

pub fn get_router() -> Router<Arc<Context>> {
    Router::new()
        .route("/signup", post(sign_up::handler))
        .route("/login", post(sign_in::handler))
        .route("/login/sms/request", post(request_code::sms_handler))
        .route("/login/sms/verify", post(verify_code::sms_handler))
        .route("/login/email/request", post(request_code::email_handler))
        .route("/login/email/verify", post(verify_code::email_handler))
}
