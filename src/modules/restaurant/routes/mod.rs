mod create;
mod create_menu;
mod delete;
mod get;
mod set_daily_menu;
mod update;

use crate::types::Context;
use axum::routing::{get, post, put, Router};
use std::sync::Arc;

pub fn get_router() -> Router<Arc<Context>> {
    Router::new()
        .route("/", post(create::handler))
        .route(
            "/:id",
            get(get::handler)
                .put(update::handler)
                .delete(delete::handler),
        )
        .route("/:id/daily-menu", put(set_daily_menu::handler))
        .route("/:id/menus", post(create_menu::handler))
}
