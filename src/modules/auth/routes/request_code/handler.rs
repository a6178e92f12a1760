use super::{service::service, types::request};
use crate::{modules::auth::service::otp::Channel, types::Context};
use axum::{extract::State, response::IntoResponse, Json};
use std::sync::Arc;

pub async fn sms_handler(
    State(ctx): State<Arc<Context>>,
    Json(body): Json<request::SmsBody>,
) -> impl IntoResponse {
    service(
        ctx,
        request::Payload {
            channel: Channel::Sms,
            address: body.phone_number,
        },
    )
    .await
}

pub async fn email_handler(
    State(ctx): State<Arc<Context>>,
    Json(body): Json<request::EmailBody>,
) -> impl IntoResponse {
    service(
        ctx,
        request::Payload {
            channel: Channel::Email,
            address: body.email.to_lowercase(),
        },
    )
    .await
}
