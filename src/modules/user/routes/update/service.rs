use super::types::{request, response};
use crate::{modules::user::repository::UpdateUserPayload, types::Context, utils::password};
use std::sync::Arc;
use validator::Validate;

pub async fn service(ctx: Arc<Context>, payload: request::Payload) -> response::Response {
    payload.body.validate().map_err(|errors| {
        tracing::warn!("Failed to validate payload: {errors}");
        response::Error::FailedToValidate(errors)
    })?;

    let email = payload.body.email.map(|email| email.to_lowercase());

    if let Some(holder) = ctx
        .db
        .users
        .find_other_by_email_or_phone_number(
            &payload.id,
            email.as_deref(),
            payload.body.phone_number.as_deref(),
        )
        .await
        .map_err(|_| response::Error::FailedToUpdateUser)?
    {
        if email.as_deref() == Some(holder.email.as_str()) {
            return Err(response::Error::EmailAlreadyInUse);
        }
        return Err(response::Error::PhoneNumberAlreadyInUse);
    }

    let password_hash = match &payload.body.password {
        Some(password) => Some(password::hash(password).await.map_err(|err| {
            tracing::error!("Failed to hash password: {}", err);
            response::Error::FailedToUpdateUser
        })?),
        None => None,
    };

    ctx.db
        .users
        .update_by_id(
            &payload.id,
            UpdateUserPayload {
                phone_number: payload.body.phone_number,
                email,
                password_hash,
            },
        )
        .await
        .map_err(|_| response::Error::FailedToUpdateUser)?
        .map(response::Success::UserUpdated)
        .ok_or(response::Error::UserNotFound)
}
