use super::types::{request, response};
use crate::{
    modules::{
        auth::service::ownership::{self, DenyReason, Resource},
        menu_item::repository::CreateMenuItemPayload,
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

    ownership::authorize(&ctx.db, &payload.auth.user, &Resource::Menu(payload.id.clone()))
        .await
        .map_err(|_| response::Error::FailedToAddItem)?
        .into_result()
        .map_err(|reason| match reason {
            DenyReason::NotFound => response::Error::MenuNotFound,
            DenyReason::NotOwner => response::Error::NotMenuOwner,
        })?;

    // admins skip the owner lookup, so the menu may still be missing
    ctx.db
        .menus
        .find_by_id(&payload.id)
        .await
        .map_err(|_| response::Error::FailedToAddItem)?
        .ok_or(response::Error::MenuNotFound)?;

    ctx.db
        .menu_items
        .create(CreateMenuItemPayload {
            name: payload.body.name,
            description: payload.body.description,
            price: payload.body.price,
            menu_id: payload.id,
        })
        .await
        .map(response::Success::ItemAdded)
        .map_err(|_| response::Error::FailedToAddItem)
}
