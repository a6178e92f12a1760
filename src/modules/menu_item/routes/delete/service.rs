use super::types::{request, response};
use crate::{
    modules::auth::service::ownership::{self, DenyReason, Resource},
    types::Context,
};
use std::sync::Arc;

pub async fn service(ctx: Arc<Context>, payload: request::Payload) -> response::Response {
    ownership::authorize(
        &ctx.db,
        &payload.auth.user,
        &Resource::MenuItem(payload.id.clone()),
    )
    .await
    .map_err(|_| response::Error::FailedToDeleteItem)?
    .into_result()
    .map_err(|reason| match reason {
        DenyReason::NotFound => response::Error::ItemNotFound,
        DenyReason::NotOwner => response::Error::NotItemOwner,
    })?;

    match ctx.db.menu_items.delete_by_id(&payload.id).await {
        Ok(true) => Ok(response::Success::ItemDeleted),
        Ok(false) => Err(response::Error::ItemNotFound),
        Err(_) => Err(response::Error::FailedToDeleteItem),
    }
}
