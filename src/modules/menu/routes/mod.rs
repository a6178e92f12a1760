mod add_item;
mod delete;
mod get;
mod update;

use crate::types::Context;
use axum::routing::{get, post, Router};
use std::sync::Arc;

pub fn get_router() -> Router<Arc<Context>> {
    Router::new()
        .route(
            "/:menu_id",
            get(get::handler)
                .put(update::handler)
                .delete(delete::handler),
        )
        .route("/:menu_id/items", post(add_item::handler))
}
