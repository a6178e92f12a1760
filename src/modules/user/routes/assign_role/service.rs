use super::types::{request, response};
use crate::types::Context;
use std::sync::Arc;

pub async fn service(ctx: Arc<Context>, payload: request::Payload) -> response::Response {
    let user = ctx
        .db
        .users
        .update_role_by_id(&payload.id, payload.body.role)
        .await
        .map_err(|_| response::Error::FailedToAssignRole)?
        .ok_or(response::Error::UserNotFound)?;

    tracing::info!(user_id = %user.id, role = %user.role, "Assigned user role");

    Ok(response::Success::RoleAssigned(user))
}
