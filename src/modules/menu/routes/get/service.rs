use super::types::{request, response};
use crate::{modules::menu::repository::MenuWithItems, types::Context};
use std::sync::Arc;

pub async fn service(ctx: Arc<Context>, payload: request::Payload) -> response::Response {
    let menu = ctx
        .db
        .menus
        .find_by_id(&payload.id)
        .await
        .map_err(|_| response::Error::FailedToFetchMenu)?
        .ok_or(response::Error::MenuNotFound)?;

    let items = ctx
        .db
        .menu_items
        .find_many_by_menu_id(&menu.id)
        .await
        .map_err(|_| response::Error::FailedToFetchMenu)?;

    Ok(response::Success::Menu(MenuWithItems { menu, items }))
}
