use super::types::{request, response};
use crate::{
    modules::{
        auth::service::ownership::{self, DenyReason, Resource},
        menu::repository::CreateMenuPayload,
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
    .map_err(|_| response::Error::FailedToCreateMenu)?
    .into_result()
    .map_err(|reason| match reason {
        DenyReason::NotFound => response::Error::RestaurantNotFound,
        DenyReason::NotOwner => response::Error::NotRestaurantOwner,
    })?;

    // admins skip the owner lookup, so the restaurant may still be missing
    ctx.db
        .restaurants
        .find_by_id(&payload.id)
        .await
        .map_err(|_| response::Error::FailedToCreateMenu)?
        .ok_or(response::Error::RestaurantNotFound)?;

    ctx.db
        .menus
        .create(CreateMenuPayload {
            name: payload.body.name,
            restaurant_id: payload.id,
        })
        .await
        .map(response::Success::MenuCreated)
        .map_err(|_| response::Error::FailedToCreateMenu)
}
