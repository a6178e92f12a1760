use super::types::{request, response};
use crate::{
    modules::auth::service::ownership::{self, DenyReason, Resource},
    types::Context,
};
use std::sync::Arc;

pub async fn service(ctx: Arc<Context>, payload: request::Payload) -> response::Response {
    ownership::authorize(&ctx.db, &payload.auth.user, &Resource::Menu(payload.id.clone()))
        .await
        .map_err(|_| response::Error::FailedToDeleteMenu)?
        .into_result()
        .map_err(|reason| match reason {
            DenyReason::NotFound => response::Error::MenuNotFound,
            DenyReason::NotOwner => response::Error::NotMenuOwner,
        })?;

    match ctx.db.menus.delete_by_id(&payload.id).await {
        Ok(true) => Ok(response::Success::MenuDeleted),
        Ok(false) => Err(response::Error::MenuNotFound),
        Err(_) => Err(response::Error::FailedToDeleteMenu),
    }
}
