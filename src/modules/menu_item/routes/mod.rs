mod delete;
mod update;

use crate::types::Context;
use axum::routing::{put, Router};
use std::sync::Arc;

pub fn get_router() -> Router<Arc<Context>> {
    Router::new().route("/:item_id", put(update::handler).delete(delete::handler))
}
