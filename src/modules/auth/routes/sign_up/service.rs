use super::types::{request, response};
use crate::{
    modules::{notification, user::repository::CreateUserPayload},
    types::Context,
    utils::password,
};
use std::sync::Arc;
use validator::Validate;

pub async fn service(ctx: Arc<Context>, payload: request::Payload) -> response::Response {
    payload.validate().map_err(|errors| {
        tracing::warn!("Failed to validate payload: {errors}");
        response::Error::FailedToValidate(errors)
    })?;

    let email = payload.email.to_lowercase();

    if let Some(user) = ctx
        .db
        .users
        .find_by_email_or_phone_number(&email, &payload.phone_number)
        .await
        .map_err(|_| response::Error::FailedToFetchUser)?
    {
        if user.email == email {
            return Err(response::Error::EmailAlreadyInUse);
        }
        return Err(response::Error::PhoneNumberAlreadyInUse);
    }

    let password_hash = password::hash(&payload.password)
        .await
        .map_err(|err| {
            tracing::error!("Failed to hash password: {}", err);
            response::Error::SignupFailed
        })?;

    let user = ctx
        .db
        .users
        .create(CreateUserPayload {
            phone_number: payload.phone_number,
            email,
            password_hash,
        })
        .await
        .map_err(|_| response::Error::SignupFailed)?;

    tokio::spawn(notification::service::send(
        ctx.clone(),
        notification::service::Notification::registered(user.clone()),
        notification::service::Backend::Email,
    ));

    Ok(response::Success::SignedUp(user))
}
