use super::types::{request, response};
use crate::{modules::restaurant::repository::RestaurantWithMenus, types::Context};
use std::sync::Arc;

pub async fn service(ctx: Arc<Context>, payload: request::Payload) -> response::Response {
    let restaurant = ctx
        .db
        .restaurants
        .find_by_id(&payload.id)
        .await
        .map_err(|_| response::Error::FailedToFetchRestaurant)?
        .ok_or(response::Error::RestaurantNotFound)?;

    let menus = ctx
        .db
        .menus
        .find_many_with_items_by_restaurant_id(&restaurant.id)
        .await
        .map_err(|_| response::Error::FailedToFetchRestaurant)?;

    Ok(response::Success::Restaurant(RestaurantWithMenus {
        restaurant,
        menus,
    }))
}
