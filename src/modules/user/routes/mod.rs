mod assign_role;
mod delete;
mod get;
mod list;
mod update;

use crate::types::Context;
use axum::routing::{get, put, Router};
use std::sync::Arc;

pub fn get_router() -> Router<Arc<Context>> {
    Router::new()
        .route("/", get(list::handler))
        .route(
            "/:id",
            get(get::handler)
                .put(update::handler)
                .delete(delete::handler),
        )
        .route("/:id/role", put(assign_role::handler))
}
