use super::types::{request, response};
use crate::types::Context;
use std::sync::Arc;

pub async fn service(ctx: Arc<Context>, payload: request::Payload) -> response::Response {
    match ctx.db.users.delete_by_id(&payload.id).await {
        Ok(true) => Ok(response::Success::UserDeleted),
        Ok(false) => Err(response::Error::UserNotFound),
        Err(_) => Err(response::Error::FailedToDeleteUser),
    }
}
