use super::types::{request, response};
use crate::{
    modules::auth::service::{otp, token::Identity},
    types::Context,
};
use std::sync::Arc;

pub async fn service(ctx: Arc<Context>, payload: request::Payload) -> response::Response {
    let user = otp::verify(ctx.clone(), payload.channel, &payload.address, &payload.code)
        .await
        .map_err(|err| match err {
            otp::VerificationError::UserNotFound => response::Error::UserNotFound,
            otp::VerificationError::InvalidCode => response::Error::InvalidCode,
            otp::VerificationError::Expired => response::Error::CodeExpired,
            otp::VerificationError::UnexpectedError => response::Error::FailedToVerifyCode,
        })?;

    ctx.auth
        .tokens
        .issue(&Identity::from(&user))
        .map(response::Success::SignedIn)
        .map_err(|_| response::Error::FailedToIssueToken)
}
