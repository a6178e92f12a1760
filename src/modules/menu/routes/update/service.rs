use super::types::{request, response};
use crate::{
    modules::auth::service::ownership::{self, DenyReason, Resource},
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
        .map_err(|_| response::Error::FailedToUpdateMenu)?
        .into_result()
        .map_err(|reason| match reason {
            DenyReason::NotFound => response::Error::MenuNotFound,
            DenyReason::NotOwner => response::Error::NotMenuOwner,
        })?;

    ctx.db
        .menus
        .update_by_id(&payload.id, payload.body.name)
        .await
        .map_err(|_| response::Error::FailedToUpdateMenu)?
        .map(response::Success::MenuUpdated)
        .ok_or(response::Error::MenuNotFound)
}
