use super::types::{request, response};
use crate::{
    modules::{
        auth::service::ownership::{self, DenyReason, Resource},
        restaurant::repository::UpdateRestaurantPayload,
    },
    types::Context,
};
use std::sync::Arc;
use validator::Validate;

pub async fn service(ctx: Arc<Context>, payload: request::Payload) -> response::Response {
    payload.body.validate().map_err(|errors| {
        tracing::warn!("Failed to validate payload: {errors}");
        response::Error::FailedToValidate(errors)
    })?;

    ownership::authorize(
        &ctx.db,
        &payload.auth.user,
        &Resource::Restaurant(payload.id.clone()),
    )
    .await
    .map_err(|_| response::Error::FailedToUpdateRestaurant)?
    .into_result()
    .map_err(|reason| match reason {
        DenyReason::NotFound => response::Error::RestaurantNotFound,
        DenyReason::NotOwner => response::Error::NotRestaurantOwner,
    })?;

    ctx.db
        .restaurants
        .update_by_id(
            &payload.id,
            UpdateRestaurantPayload {
                name: payload.body.name,
                address: payload.body.address,
            },
        )
        .await
        .map_err(|_| response::Error::FailedToUpdateRestaurant)?
        .map(response::Success::RestaurantUpdated)
        .ok_or(response::Error::RestaurantNotFound)
}
