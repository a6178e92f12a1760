use super::types::{request, response};
use crate::{modules::restaurant::repository::CreateRestaurantPayload, types::Context};
use std::sync::Arc;
use validator::Validate;

pub async fn service(ctx: Arc<Context>, payload: request::Payload) -> response::Response {
    payload.body.validate().map_err(|errors| {
        tracing::warn!("Failed to validate payload: {errors}");
        response::Error::FailedToValidate(errors)
    })?;

    ctx.db
        .restaurants
        .create(CreateRestaurantPayload {
            name: payload.body.name,
            address: payload.body.address,
            user_id: payload.auth.user.id,
        })
        .await
        .map(response::Success::RestaurantCreated)
        .map_err(|_| response::Error::FailedToCreateRestaurant)
}
