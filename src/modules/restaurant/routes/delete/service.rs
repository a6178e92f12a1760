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
        &Resource::Restaurant(payload.id.clone()),
    )
    .await
    .map_err(|_| response::Error::FailedToDeleteRestaurant)?
    .into_result()
    .map_err(|reason| match reason {
        DenyReason::NotFound => response::Error::RestaurantNotFound,
        DenyReason::NotOwner => response::Error::NotRestaurantOwner,
    })?;

    match ctx.db.restaurants.delete_by_id(&payload.id).await {
        Ok(true) => Ok(response::Success::RestaurantDeleted),
        Ok(false) => Err(response::Error::RestaurantNotFound),
        Err(_) => Err(response::Error::FailedToDeleteRestaurant),
    }
}
