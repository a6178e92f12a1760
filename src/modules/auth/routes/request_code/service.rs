use super::types::{request, response};
use crate::{modules::auth::service::otp, types::Context};
use std::sync::Arc;

pub async fn service(ctx: Arc<Context>, payload: request::Payload) -> response::Response {
    otp::request(ctx, payload.channel, &payload.address)
        .await
        .map(|_| response::Success::CodeSent(payload.channel))
        .map_err(|err| match err {
            otp::RequestError::UserNotFound => response::Error::UserNotFound,
            otp::RequestError::UnexpectedError => response::Error::FailedToSendCode,
        })
}
