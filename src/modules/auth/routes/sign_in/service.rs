use super::types::{request, response};
use crate::{modules::auth::service::token::Identity, types::Context, utils::password};
use std::sync::Arc;

pub async fn service(ctx: Arc<Context>, payload: request::Payload) -> response::Response {
    let user = ctx
        .db
        .users
        .find_by_phone_number(&payload.phone_number)
        .await
        .map_err(|_| response::Error::FailedToFetchUser)?
        .ok_or(response::Error::InvalidCredentials)?;

    let matches = password::verify(&payload.password, &user.password_hash)
        .await
        .map_err(|err| {
            tracing::error!("Failed to verify password of user {}: {}", user.id, err);
            response::Error::FailedToFetchUser
        })?;

    if !matches {
        return Err(response::Error::InvalidCredentials);
    }

    ctx.auth
        .tokens
        .issue(&Identity::from(&user))
        .map(response::Success::SignedIn)
        .map_err(|_| response::Error::FailedToIssueToken)
}
