mod common;

use axum::http::{Method, StatusCode};
use common::TestApp;
use serde_json::{json, Value};

async fn create_restaurant(app: &TestApp, token: &str, name: &str) -> Value {
    let (status, body) = app
        .request(
            Method::POST,
            "/api/v1/restaurants",
            Some(token),
            Some(json!({ "name": name, "address": "12 Market Street" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body
}

async fn create_menu(app: &TestApp, token: &str, restaurant_id: &str, name: &str) -> Value {
    let (status, body) = app
        .request(
            Method::POST,
            &format!("/api/v1/restaurants/{restaurant_id}/menus"),
            Some(token),
            Some(json!({ "name": name })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body
}

async fn add_item(app: &TestApp, token: &str, menu_id: &str, name: &str) -> Value {
    let (status, body) = app
        .request(
            Method::POST,
            &format!("/api/v1/menus/{menu_id}/items"),
            Some(token),
            Some(json!({ "name": name, "description": "House special", "price": "12.50" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body
}

fn id(value: &Value) -> &str {
    value["id"].as_str().unwrap()
}

#[tokio::test]
async fn owner_builds_a_restaurant_with_menus() {
    let app = TestApp::new();
    let owner = app.user("09121234567", "owner@example.com").await;
    let claims = app.ctx.auth.tokens.validate(&owner).unwrap();

    let restaurant = create_restaurant(&app, &owner, "Bistro").await;
    assert_eq!(restaurant["user_id"], claims.sub.as_str());
    assert!(restaurant["daily_menu_id"].is_null());

    let menu = create_menu(&app, &owner, id(&restaurant), "Lunch").await;
    let item = add_item(&app, &owner, id(&menu), "Soup").await;
    assert_eq!(item["price"], "12.50");

    let (status, body) = app
        .request(
            Method::GET,
            &format!("/api/v1/restaurants/{}", id(&restaurant)),
            Some(&owner),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Bistro");
    assert_eq!(body["menus"][0]["name"], "Lunch");
    assert_eq!(body["menus"][0]["items"][0]["name"], "Soup");

    let (status, body) = app
        .request(
            Method::GET,
            &format!("/api/v1/menus/{}", id(&menu)),
            Some(&owner),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn reading_requires_a_session() {
    let app = TestApp::new();
    let owner = app.user("09121234567", "owner@example.com").await;
    let restaurant = create_restaurant(&app, &owner, "Bistro").await;

    let (status, _) = app
        .request(
            Method::GET,
            &format!("/api/v1/restaurants/{}", id(&restaurant)),
            None,
            None,
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn only_the_owner_or_an_admin_can_change_a_restaurant() {
    let app = TestApp::new();
    let owner = app.user("09121234567", "owner@example.com").await;
    let intruder = app.user("09127654321", "intruder@example.com").await;
    let admin = app.admin("09120000001", "admin@example.com").await;
    let restaurant = create_restaurant(&app, &owner, "Bistro").await;
    let uri = format!("/api/v1/restaurants/{}", id(&restaurant));

    let (status, body) = app
        .request(
            Method::PUT,
            &uri,
            Some(&intruder),
            Some(json!({ "name": "Taken" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "You are not the owner of this restaurant");

    let (status, body) = app
        .request(Method::PUT, &uri, Some(&owner), Some(json!({ "name": "Bistro 2" })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Bistro 2");
    assert_eq!(body["address"], "12 Market Street");

    let (status, body) = app
        .request(Method::PUT, &uri, Some(&admin), Some(json!({ "address": "1 Side Road" })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["address"], "1 Side Road");

    let (status, _) = app
        .request(
            Method::PUT,
            "/api/v1/restaurants/does-not-exist",
            Some(&owner),
            Some(json!({ "name": "Ghost" })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.request(Method::DELETE, &uri, Some(&intruder), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.request(Method::DELETE, &uri, Some(&owner), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.request(Method::GET, &uri, Some(&owner), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn ownership_follows_menus_and_items() {
    let app = TestApp::new();
    let owner = app.user("09121234567", "owner@example.com").await;
    let intruder = app.user("09127654321", "intruder@example.com").await;
    let restaurant = create_restaurant(&app, &owner, "Bistro").await;
    let menu = create_menu(&app, &owner, id(&restaurant), "Lunch").await;
    let item = add_item(&app, &owner, id(&menu), "Soup").await;

    let (status, _) = app
        .request(
            Method::POST,
            &format!("/api/v1/restaurants/{}/menus", id(&restaurant)),
            Some(&intruder),
            Some(json!({ "name": "Sneaky" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app
        .request(
            Method::PUT,
            &format!("/api/v1/menus/{}", id(&menu)),
            Some(&intruder),
            Some(json!({ "name": "Sneaky" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "You are not the owner of this menu");

    let item_uri = format!("/api/v1/menu-items/{}", id(&item));

    let (status, body) = app
        .request(Method::DELETE, &item_uri, Some(&intruder), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "You are not the owner of this menu item");

    let (status, body) = app
        .request(
            Method::PUT,
            &item_uri,
            Some(&owner),
            Some(json!({ "price": 9 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["price"], "9");
    assert_eq!(body["name"], "Soup");

    let (status, _) = app
        .request(Method::DELETE, &item_uri, Some(&owner), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .request(Method::DELETE, &item_uri, Some(&owner), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn items_under_a_deleted_menu_are_gone() {
    let app = TestApp::new();
    let owner = app.user("09121234567", "owner@example.com").await;
    let restaurant = create_restaurant(&app, &owner, "Bistro").await;
    let menu = create_menu(&app, &owner, id(&restaurant), "Lunch").await;
    let item = add_item(&app, &owner, id(&menu), "Soup").await;

    let (status, _) = app
        .request(
            Method::DELETE,
            &format!("/api/v1/menus/{}", id(&menu)),
            Some(&owner),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .request(
            Method::PUT,
            &format!("/api/v1/menu-items/{}", id(&item)),
            Some(&owner),
            Some(json!({ "name": "Stew" })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn item_price_must_be_positive() {
    let app = TestApp::new();
    let owner = app.user("09121234567", "owner@example.com").await;
    let restaurant = create_restaurant(&app, &owner, "Bistro").await;
    let menu = create_menu(&app, &owner, id(&restaurant), "Lunch").await;

    for price in [json!(0), json!("-1.25")] {
        let (status, body) = app
            .request(
                Method::POST,
                &format!("/api/v1/menus/{}/items", id(&menu)),
                Some(&owner),
                Some(json!({ "name": "Free lunch", "price": price })),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["errors"]["price"].is_array());
    }
}

#[tokio::test]
async fn daily_menu_must_come_from_the_same_restaurant() {
    let app = TestApp::new();
    let owner = app.user("09121234567", "owner@example.com").await;
    let first = create_restaurant(&app, &owner, "Bistro").await;
    let second = create_restaurant(&app, &owner, "Cafe").await;
    let own_menu = create_menu(&app, &owner, id(&first), "Lunch").await;
    let foreign_menu = create_menu(&app, &owner, id(&second), "Brunch").await;
    let uri = format!("/api/v1/restaurants/{}/daily-menu", id(&first));

    let (status, body) = app
        .request(
            Method::PUT,
            &uri,
            Some(&owner),
            Some(json!({ "menu_id": id(&own_menu) })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["daily_menu_id"], id(&own_menu));

    let (status, body) = app
        .request(
            Method::PUT,
            &uri,
            Some(&owner),
            Some(json!({ "menu_id": id(&foreign_menu) })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Menu does not belong to this restaurant");

    let (_, body) = app
        .request(
            Method::GET,
            &format!("/api/v1/restaurants/{}", id(&first)),
            Some(&owner),
            None,
        )
        .await;
    assert_eq!(body["daily_menu_id"], id(&own_menu));
}

#[tokio::test]
async fn deleting_the_daily_menu_clears_it() {
    let app = TestApp::new();
    let owner = app.user("09121234567", "owner@example.com").await;
    let restaurant = create_restaurant(&app, &owner, "Bistro").await;
    let menu = create_menu(&app, &owner, id(&restaurant), "Lunch").await;

    let (status, _) = app
        .request(
            Method::PUT,
            &format!("/api/v1/restaurants/{}/daily-menu", id(&restaurant)),
            Some(&owner),
            Some(json!({ "menu_id": id(&menu) })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .request(
            Method::DELETE,
            &format!("/api/v1/menus/{}", id(&menu)),
            Some(&owner),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = app
        .request(
            Method::GET,
            &format!("/api/v1/restaurants/{}", id(&restaurant)),
            Some(&owner),
            None,
        )
        .await;
    assert!(body["daily_menu_id"].is_null());
    assert!(body["menus"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn menus_under_a_deleted_restaurant_are_gone() {
    let app = TestApp::new();
    let owner = app.user("09121234567", "owner@example.com").await;
    let admin = app.admin("09120000001", "admin@example.com").await;
    let restaurant = create_restaurant(&app, &owner, "Bistro").await;
    let menu = create_menu(&app, &owner, id(&restaurant), "Lunch").await;

    let (status, _) = app
        .request(
            Method::DELETE,
            &format!("/api/v1/restaurants/{}", id(&restaurant)),
            Some(&owner),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .request(
            Method::GET,
            &format!("/api/v1/menus/{}", id(&menu)),
            Some(&owner),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = app
        .request(
            Method::POST,
            &format!("/api/v1/menus/{}/items", id(&menu)),
            Some(&admin),
            Some(json!({ "name": "Soup", "price": "4.00" })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Menu not found");
}

#[tokio::test]
async fn admin_setting_a_daily_menu_on_a_missing_restaurant_is_not_found() {
    let app = TestApp::new();
    let admin = app.admin("09120000001", "admin@example.com").await;

    let (status, body) = app
        .request(
            Method::PUT,
            "/api/v1/restaurants/missing/daily-menu",
            Some(&admin),
            Some(json!({ "menu_id": "nope" })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Restaurant not found");
}
