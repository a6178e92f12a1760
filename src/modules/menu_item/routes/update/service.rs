use super::types::{request, response};
use crate::{
    modules::{
        auth::service::ownership::{self, DenyReason, Resource},
        menu_item::repository::UpdateMenuItemPayload,
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
        &Resource::MenuItem(payload.id.clone()),
    )
    .await
    .map_err(|_| response::Error::FailedToUpdateItem)?
    .into_result()
    .map_err(|reason| match reason {
        DenyReason::NotFound => response::Error::ItemNotFound,
        DenyReason::NotOwner => response::Error::NotItemOwner,
    })?;

    ctx.db
        .menu_items
        .update_by_id(
            &payload.id,
            UpdateMenuItemPayload {
                name: payload.body.name,
                description: payload.body.description,
                price: payload.body.price,
            },
        )
        .await
        .map_err(|_| response::Error::FailedToUpdateItem)?
        .map(response::Success::ItemUpdated)
        .ok_or(response::Error::ItemNotFound)
}
