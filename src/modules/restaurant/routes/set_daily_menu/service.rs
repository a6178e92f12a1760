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
    .map_err(|_| response::Error::FailedToSetDailyMenu)?
    .into_result()
    .map_err(|reason| match reason {
        DenyReason::NotFound => response::Error::RestaurantNotFound,
        DenyReason::NotOwner => response::Error::NotRestaurantOwner,
    })?;

    let updated = ctx
        .db
        .restaurants
        .set_daily_menu(&payload.id, &payload.body.menu_id)
        .await
        .map_err(|_| response::Error::FailedToSetDailyMenu)?;

    if !updated {
        // admins skip the owner lookup, so the restaurant may still be missing
        ctx.db
            .restaurants
            .find_by_id(&payload.id)
            .await
            .map_err(|_| response::Error::FailedToSetDailyMenu)?
            .ok_or(response::Error::RestaurantNotFound)?;

        tracing::warn!(
            restaurant_id = %payload.id,
            menu_id = %payload.body.menu_id,
            "Refused to set a daily menu from outside the restaurant"
        );
        return Err(response::Error::MenuNotInRestaurant);
    }

    ctx.db
        .restaurants
        .find_by_id(&payload.id)
        .await
        .map_err(|_| response::Error::FailedToSetDailyMenu)?
        .map(response::Success::DailyMenuSet)
        .ok_or(response::Error::RestaurantNotFound)
}
