use super::types::{request, response};
use crate::types::Context;
use std::sync::Arc;

pub async fn service(ctx: Arc<Context>, payload: request::Payload) -> response::Response {
    ctx.db
        .users
        .find_many(payload.pagination)
        .await
        .map(response::Success::Users)
        .map_err(|_| response::Error::FailedToFetchUsers)
}
