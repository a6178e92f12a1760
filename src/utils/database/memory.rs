use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use ulid::Ulid;

use crate::modules::{
    auth::service::otp::Channel,
    menu::repository::{self as menu, CreateMenuPayload, Menu, MenuRepository, MenuWithItems},
    menu_item::repository::{
        self as menu_item, CreateMenuItemPayload, MenuItem, MenuItemRepository,
        UpdateMenuItemPayload,
    },
    restaurant::repository::{
        self as restaurant, CreateRestaurantPayload, Restaurant, RestaurantRepository,
        UpdateRestaurantPayload,
    },
    user::repository::{
        self as user, CreateUserPayload, Role, UpdateUserPayload, User, UserRepository,
    },
};
use crate::utils::pagination::{Paginated, Pagination};

#[derive(Default)]
struct Tables {
    users: HashMap<String, User>,
    restaurants: HashMap<String, Restaurant>,
    menus: HashMap<String, Menu>,
    menu_items: HashMap<String, MenuItem>,
}

impl Tables {
    fn live_restaurant(&self, id: &str) -> Option<&Restaurant> {
        self.restaurants
            .get(id)
            .filter(|restaurant| restaurant.deleted_at.is_none())
    }

    fn live_menu(&self, id: &str) -> Option<&Menu> {
        self.menus.get(id).filter(|menu| menu.deleted_at.is_none())
    }

    fn live_menu_item(&self, id: &str) -> Option<&MenuItem> {
        self.menu_items
            .get(id)
            .filter(|item| item.deleted_at.is_none())
    }

    fn live_items_of(&self, menu_id: &str) -> Vec<MenuItem> {
        let mut items = self
            .menu_items
            .values()
            .filter(|item| item.menu_id == menu_id && item.deleted_at.is_none())
            .cloned()
            .collect::<Vec<_>>();
        items.sort_by(|a, b| (a.created_at, &a.id).cmp(&(b.created_at, &b.id)));
        items
    }
}

/// Process-local store backing every repository trait, used by tests and by
/// runs without a database.
#[derive(Clone, Default)]
pub struct MemoryDatabase {
    tables: Arc<RwLock<Tables>>,
}

fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

#[async_trait]
impl UserRepository for MemoryDatabase {
    async fn create(&self, payload: CreateUserPayload) -> Result<User, user::Error> {
        let user = User {
            id: Ulid::new().to_string(),
            phone_number: payload.phone_number,
            email: payload.email,
            password_hash: payload.password_hash,
            role: Role::User,
            sms_code: None,
            sms_code_expires_at: None,
            email_code: None,
            email_code_expires_at: None,
            created_at: now(),
            updated_at: None,
            deleted_at: None,
        };

        let mut tables = self.tables.write().await;
        tables.users.insert(user.id.clone(), user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>, user::Error> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .get(id)
            .filter(|user| user.deleted_at.is_none())
            .cloned())
    }

    async fn find_by_phone_number(&self, phone_number: &str) -> Result<Option<User>, user::Error> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|user| user.phone_number == phone_number && user.deleted_at.is_none())
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, user::Error> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|user| user.email == email && user.deleted_at.is_none())
            .cloned())
    }

    async fn find_by_email_or_phone_number(
        &self,
        email: &str,
        phone_number: &str,
    ) -> Result<Option<User>, user::Error> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|user| user.email == email || user.phone_number == phone_number)
            .cloned())
    }

    async fn find_other_by_email_or_phone_number(
        &self,
        id: &str,
        email: Option<&str>,
        phone_number: Option<&str>,
    ) -> Result<Option<User>, user::Error> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .filter(|user| user.id != id)
            .find(|user| {
                email == Some(user.email.as_str())
                    || phone_number == Some(user.phone_number.as_str())
            })
            .cloned())
    }

    async fn find_many(&self, pagination: Pagination) -> Result<Paginated<User>, user::Error> {
        let tables = self.tables.read().await;
        let mut users = tables
            .users
            .values()
            .filter(|user| user.deleted_at.is_none())
            .cloned()
            .collect::<Vec<_>>();
        users.sort_by(|a, b| (a.created_at, &a.id).cmp(&(b.created_at, &b.id)));

        let total = users.len() as u32;
        let page = users
            .into_iter()
            .skip(pagination.offset() as usize)
            .take(pagination.per_page() as usize)
            .collect();

        Ok(Paginated::new(
            page,
            total,
            pagination.page(),
            pagination.per_page(),
        ))
    }

    async fn update_by_id(
        &self,
        id: &str,
        payload: UpdateUserPayload,
    ) -> Result<Option<User>, user::Error> {
        let mut tables = self.tables.write().await;
        let Some(user) = tables
            .users
            .get_mut(id)
            .filter(|user| user.deleted_at.is_none())
        else {
            return Ok(None);
        };

        if let Some(phone_number) = payload.phone_number {
            user.phone_number = phone_number;
        }
        if let Some(email) = payload.email {
            user.email = email;
        }
        if let Some(password_hash) = payload.password_hash {
            user.password_hash = password_hash;
        }
        user.updated_at = Some(now());

        Ok(Some(user.clone()))
    }

    async fn update_role_by_id(&self, id: &str, role: Role) -> Result<Option<User>, user::Error> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .users
            .get_mut(id)
            .filter(|user| user.deleted_at.is_none())
            .map(|user| {
                user.role = role;
                user.updated_at = Some(now());
                user.clone()
            }))
    }

    async fn delete_by_id(&self, id: &str) -> Result<bool, user::Error> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .users
            .get_mut(id)
            .filter(|user| user.deleted_at.is_none())
            .map(|user| user.deleted_at = Some(now()))
            .is_some())
    }

    async fn set_verification_code(
        &self,
        id: &str,
        channel: Channel,
        code: &str,
        expires_at: NaiveDateTime,
    ) -> Result<(), user::Error> {
        let mut tables = self.tables.write().await;
        if let Some(user) = tables.users.get_mut(id) {
            match channel {
                Channel::Sms => {
                    user.sms_code = Some(code.to_string());
                    user.sms_code_expires_at = Some(expires_at);
                }
                Channel::Email => {
                    user.email_code = Some(code.to_string());
                    user.email_code_expires_at = Some(expires_at);
                }
            }
            user.updated_at = Some(now());
        }
        Ok(())
    }

    async fn consume_verification_code(
        &self,
        id: &str,
        channel: Channel,
        code: &str,
        now: NaiveDateTime,
    ) -> Result<bool, user::Error> {
        let mut tables = self.tables.write().await;
        let Some(user) = tables
            .users
            .get_mut(id)
            .filter(|user| user.deleted_at.is_none())
        else {
            return Ok(false);
        };

        let (stored_code, stored_expiry) = match channel {
            Channel::Sms => (&mut user.sms_code, &mut user.sms_code_expires_at),
            Channel::Email => (&mut user.email_code, &mut user.email_code_expires_at),
        };

        let matches = stored_code.as_deref() == Some(code)
            && stored_expiry.map_or(false, |expires_at| expires_at >= now);
        if !matches {
            return Ok(false);
        }

        *stored_code = None;
        *stored_expiry = None;
        user.updated_at = Some(now);
        Ok(true)
    }
}

#[async_trait]
impl RestaurantRepository for MemoryDatabase {
    async fn create(
        &self,
        payload: CreateRestaurantPayload,
    ) -> Result<Restaurant, restaurant::Error> {
        let restaurant = Restaurant {
            id: Ulid::new().to_string(),
            name: payload.name,
            address: payload.address,
            user_id: payload.user_id,
            daily_menu_id: None,
            created_at: now(),
            updated_at: None,
            deleted_at: None,
        };

        let mut tables = self.tables.write().await;
        tables
            .restaurants
            .insert(restaurant.id.clone(), restaurant.clone());
        Ok(restaurant)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Restaurant>, restaurant::Error> {
        let tables = self.tables.read().await;
        Ok(tables.live_restaurant(id).cloned())
    }

    async fn update_by_id(
        &self,
        id: &str,
        payload: UpdateRestaurantPayload,
    ) -> Result<Option<Restaurant>, restaurant::Error> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .restaurants
            .get_mut(id)
            .filter(|restaurant| restaurant.deleted_at.is_none())
            .map(|restaurant| {
                if let Some(name) = payload.name {
                    restaurant.name = name;
                }
                if let Some(address) = payload.address {
                    restaurant.address = address;
                }
                restaurant.updated_at = Some(now());
                restaurant.clone()
            }))
    }

    async fn delete_by_id(&self, id: &str) -> Result<bool, restaurant::Error> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .restaurants
            .get_mut(id)
            .filter(|restaurant| restaurant.deleted_at.is_none())
            .map(|restaurant| restaurant.deleted_at = Some(now()))
            .is_some())
    }

    async fn set_daily_menu(&self, id: &str, menu_id: &str) -> Result<bool, restaurant::Error> {
        let mut tables = self.tables.write().await;
        let belongs = tables
            .live_menu(menu_id)
            .map_or(false, |menu| menu.restaurant_id == id);
        if !belongs {
            return Ok(false);
        }

        Ok(tables
            .restaurants
            .get_mut(id)
            .filter(|restaurant| restaurant.deleted_at.is_none())
            .map(|restaurant| {
                restaurant.daily_menu_id = Some(menu_id.to_string());
                restaurant.updated_at = Some(now());
            })
            .is_some())
    }

    async fn find_owner_id(&self, id: &str) -> Result<Option<String>, restaurant::Error> {
        let tables = self.tables.read().await;
        Ok(tables
            .live_restaurant(id)
            .map(|restaurant| restaurant.user_id.clone()))
    }
}

#[async_trait]
impl MenuRepository for MemoryDatabase {
    async fn create(&self, payload: CreateMenuPayload) -> Result<Menu, menu::Error> {
        let menu = Menu {
            id: Ulid::new().to_string(),
            name: payload.name,
            restaurant_id: payload.restaurant_id,
            created_at: now(),
            updated_at: None,
            deleted_at: None,
        };

        let mut tables = self.tables.write().await;
        tables.menus.insert(menu.id.clone(), menu.clone());
        Ok(menu)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Menu>, menu::Error> {
        let tables = self.tables.read().await;
        Ok(tables
            .live_menu(id)
            .filter(|menu| tables.live_restaurant(&menu.restaurant_id).is_some())
            .cloned())
    }

    async fn find_many_with_items_by_restaurant_id(
        &self,
        restaurant_id: &str,
    ) -> Result<Vec<MenuWithItems>, menu::Error> {
        let tables = self.tables.read().await;
        let mut menus = tables
            .menus
            .values()
            .filter(|menu| menu.restaurant_id == restaurant_id && menu.deleted_at.is_none())
            .cloned()
            .collect::<Vec<_>>();
        menus.sort_by(|a, b| (a.created_at, &a.id).cmp(&(b.created_at, &b.id)));

        Ok(menus
            .into_iter()
            .map(|menu| {
                let items = tables.live_items_of(&menu.id);
                MenuWithItems { menu, items }
            })
            .collect())
    }

    async fn update_by_id(&self, id: &str, name: String) -> Result<Option<Menu>, menu::Error> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .menus
            .get_mut(id)
            .filter(|menu| menu.deleted_at.is_none())
            .map(|menu| {
                menu.name = name;
                menu.updated_at = Some(now());
                menu.clone()
            }))
    }

    async fn delete_by_id(&self, id: &str) -> Result<bool, menu::Error> {
        let mut tables = self.tables.write().await;
        let deleted = tables
            .menus
            .get_mut(id)
            .filter(|menu| menu.deleted_at.is_none())
            .map(|menu| menu.deleted_at = Some(now()))
            .is_some();

        if deleted {
            for restaurant in tables.restaurants.values_mut() {
                if restaurant.daily_menu_id.as_deref() == Some(id) {
                    restaurant.daily_menu_id = None;
                    restaurant.updated_at = Some(now());
                }
            }
        }

        Ok(deleted)
    }

    async fn find_owner_id(&self, id: &str) -> Result<Option<String>, menu::Error> {
        let tables = self.tables.read().await;
        Ok(tables
            .live_menu(id)
            .and_then(|menu| tables.live_restaurant(&menu.restaurant_id))
            .map(|restaurant| restaurant.user_id.clone()))
    }
}

#[async_trait]
impl MenuItemRepository for MemoryDatabase {
    async fn create(&self, payload: CreateMenuItemPayload) -> Result<MenuItem, menu_item::Error> {
        let item = MenuItem {
            id: Ulid::new().to_string(),
            name: payload.name,
            description: payload.description,
            price: payload.price,
            menu_id: payload.menu_id,
            created_at: now(),
            updated_at: None,
            deleted_at: None,
        };

        let mut tables = self.tables.write().await;
        tables.menu_items.insert(item.id.clone(), item.clone());
        Ok(item)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<MenuItem>, menu_item::Error> {
        let tables = self.tables.read().await;
        Ok(tables.live_menu_item(id).cloned())
    }

    async fn find_many_by_menu_id(&self, menu_id: &str) -> Result<Vec<MenuItem>, menu_item::Error> {
        let tables = self.tables.read().await;
        Ok(tables.live_items_of(menu_id))
    }

    async fn update_by_id(
        &self,
        id: &str,
        payload: UpdateMenuItemPayload,
    ) -> Result<Option<MenuItem>, menu_item::Error> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .menu_items
            .get_mut(id)
            .filter(|item| item.deleted_at.is_none())
            .map(|item| {
                if let Some(name) = payload.name {
                    item.name = name;
                }
                if let Some(description) = payload.description {
                    item.description = description;
                }
                if let Some(price) = payload.price {
                    item.price = price;
                }
                item.updated_at = Some(now());
                item.clone()
            }))
    }

    async fn delete_by_id(&self, id: &str) -> Result<bool, menu_item::Error> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .menu_items
            .get_mut(id)
            .filter(|item| item.deleted_at.is_none())
            .map(|item| item.deleted_at = Some(now()))
            .is_some())
    }

    async fn find_owner_id(&self, id: &str) -> Result<Option<String>, menu_item::Error> {
        let tables = self.tables.read().await;
        Ok(tables
            .live_menu_item(id)
            .and_then(|item| tables.live_menu(&item.menu_id))
            .and_then(|menu| tables.live_restaurant(&menu.restaurant_id))
            .map(|restaurant| restaurant.user_id.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigdecimal::BigDecimal;
    use chrono::Duration;

    async fn seed_chain(db: &MemoryDatabase) -> (Restaurant, Menu, MenuItem) {
        let restaurant = RestaurantRepository::create(
            db,
            CreateRestaurantPayload {
                name: "Bistro".to_string(),
                address: "1 Main St".to_string(),
                user_id: "owner".to_string(),
            },
        )
        .await
        .unwrap();
        let menu = MenuRepository::create(
            db,
            CreateMenuPayload {
                name: "Lunch".to_string(),
                restaurant_id: restaurant.id.clone(),
            },
        )
        .await
        .unwrap();
        let item = MenuItemRepository::create(
            db,
            CreateMenuItemPayload {
                name: "Soup".to_string(),
                description: "Tomato".to_string(),
                price: BigDecimal::from(5),
                menu_id: menu.id.clone(),
            },
        )
        .await
        .unwrap();

        (restaurant, menu, item)
    }

    #[tokio::test]
    async fn owner_resolves_through_the_whole_chain() {
        let db = MemoryDatabase::default();
        let (restaurant, menu, item) = seed_chain(&db).await;

        assert_eq!(
            RestaurantRepository::find_owner_id(&db, &restaurant.id)
                .await
                .unwrap()
                .as_deref(),
            Some("owner")
        );
        assert_eq!(
            MenuRepository::find_owner_id(&db, &menu.id)
                .await
                .unwrap()
                .as_deref(),
            Some("owner")
        );
        assert_eq!(
            MenuItemRepository::find_owner_id(&db, &item.id)
                .await
                .unwrap()
                .as_deref(),
            Some("owner")
        );
    }

    #[tokio::test]
    async fn soft_deleted_parent_breaks_the_chain() {
        let db = MemoryDatabase::default();
        let (restaurant, menu, item) = seed_chain(&db).await;

        assert!(RestaurantRepository::delete_by_id(&db, &restaurant.id)
            .await
            .unwrap());
        assert!(MenuItemRepository::find_owner_id(&db, &item.id)
            .await
            .unwrap()
            .is_none());
        assert!(RestaurantRepository::find_by_id(&db, &restaurant.id)
            .await
            .unwrap()
            .is_none());
        assert!(MenuRepository::find_by_id(&db, &menu.id)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn deleting_the_daily_menu_clears_the_reference() {
        let db = MemoryDatabase::default();
        let (restaurant, menu, _) = seed_chain(&db).await;

        assert!(db.set_daily_menu(&restaurant.id, &menu.id).await.unwrap());
        assert!(MenuRepository::delete_by_id(&db, &menu.id).await.unwrap());

        let restaurant = RestaurantRepository::find_by_id(&db, &restaurant.id)
            .await
            .unwrap()
            .unwrap();
        assert!(restaurant.daily_menu_id.is_none());
    }

    #[tokio::test]
    async fn verification_code_is_consumed_once() {
        let db = MemoryDatabase::default();
        let user = UserRepository::create(
            &db,
            CreateUserPayload {
                phone_number: "09120000000".to_string(),
                email: "a@example.com".to_string(),
                password_hash: "hash".to_string(),
            },
        )
        .await
        .unwrap();
        let issued_at = now();

        db.set_verification_code(
            &user.id,
            Channel::Sms,
            "123456",
            issued_at + Duration::minutes(5),
        )
        .await
        .unwrap();

        assert!(db
            .consume_verification_code(&user.id, Channel::Sms, "123456", issued_at)
            .await
            .unwrap());
        assert!(!db
            .consume_verification_code(&user.id, Channel::Sms, "123456", issued_at)
            .await
            .unwrap());
    }
}
