use async_trait::async_trait;
use bigdecimal::BigDecimal;
use chrono::NaiveDateTime;
use serde::Serialize;
use sqlx::{FromRow, PgExecutor};
use ulid::Ulid;

use crate::utils::database::DatabaseConnection;

type Result<T> = std::result::Result<T, Error>;

#[derive(Serialize, Clone, Debug, FromRow)]
pub struct MenuItem {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: BigDecimal,
    pub menu_id: String,
    pub created_at: NaiveDateTime,
    pub updated_at: Option<NaiveDateTime>,
    #[serde(skip_serializing)]
    pub deleted_at: Option<NaiveDateTime>,
}

pub struct CreateMenuItemPayload {
    pub name: String,
    pub description: String,
    pub price: BigDecimal,
    pub menu_id: String,
}

#[derive(Default)]
pub struct UpdateMenuItemPayload {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<BigDecimal>,
}

#[derive(Debug)]
pub enum Error {
    UnexpectedError,
}

#[async_trait]
pub trait MenuItemRepository: Send + Sync {
    async fn create(&self, payload: CreateMenuItemPayload) -> Result<MenuItem>;

    async fn find_by_id(&self, id: &str) -> Result<Option<MenuItem>>;

    async fn find_many_by_menu_id(&self, menu_id: &str) -> Result<Vec<MenuItem>>;

    async fn update_by_id(
        &self,
        id: &str,
        payload: UpdateMenuItemPayload,
    ) -> Result<Option<MenuItem>>;

    async fn delete_by_id(&self, id: &str) -> Result<bool>;

    async fn find_owner_id(&self, id: &str) -> Result<Option<String>>;
}

pub async fn create<'e, E: PgExecutor<'e>>(
    e: E,
    payload: CreateMenuItemPayload,
) -> Result<MenuItem> {
    sqlx::query_as::<_, MenuItem>(
        "
        INSERT INTO menu_items (id, name, description, price, menu_id)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        ",
    )
    .bind(Ulid::new().to_string())
    .bind(payload.name)
    .bind(payload.description)
    .bind(payload.price)
    .bind(payload.menu_id)
    .fetch_one(e)
    .await
    .map_err(|err| {
        tracing::error!("Error occurred while creating a menu item: {}", err);
        Error::UnexpectedError
    })
}

pub async fn find_by_id<'e, E: PgExecutor<'e>>(e: E, id: &str) -> Result<Option<MenuItem>> {
    sqlx::query_as::<_, MenuItem>(
        "SELECT * FROM menu_items WHERE id = $1 AND deleted_at IS NULL",
    )
    .bind(id)
    .fetch_optional(e)
    .await
    .map_err(|err| {
        tracing::error!("Error occurred while fetching menu item {}: {}", id, err);
        Error::UnexpectedError
    })
}

pub async fn find_many_by_menu_id<'e, E: PgExecutor<'e>>(
    e: E,
    menu_id: &str,
) -> Result<Vec<MenuItem>> {
    sqlx::query_as::<_, MenuItem>(
        "
        SELECT * FROM menu_items
        WHERE
            menu_id = $1
            AND deleted_at IS NULL
        ORDER BY created_at, id
        ",
    )
    .bind(menu_id)
    .fetch_all(e)
    .await
    .map_err(|err| {
        tracing::error!("Error occurred while fetching items of menu {}: {}", menu_id, err);
        Error::UnexpectedError
    })
}

pub async fn update_by_id<'e, E: PgExecutor<'e>>(
    e: E,
    id: &str,
    payload: UpdateMenuItemPayload,
) -> Result<Option<MenuItem>> {
    sqlx::query_as::<_, MenuItem>(
        "
        UPDATE menu_items SET
            name = COALESCE($1, name),
            description = COALESCE($2, description),
            price = COALESCE($3, price),
            updated_at = NOW()
        WHERE
            id = $4
            AND deleted_at IS NULL
        RETURNING *
        ",
    )
    .bind(payload.name)
    .bind(payload.description)
    .bind(payload.price)
    .bind(id)
    .fetch_optional(e)
    .await
    .map_err(|err| {
        tracing::error!("Error occurred while updating menu item {}: {}", id, err);
        Error::UnexpectedError
    })
}

pub async fn delete_by_id<'e, E: PgExecutor<'e>>(e: E, id: &str) -> Result<bool> {
    sqlx::query(
        "UPDATE menu_items SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
    )
    .bind(id)
    .execute(e)
    .await
    .map(|result| result.rows_affected() > 0)
    .map_err(|err| {
        tracing::error!("Error occurred while deleting menu item {}: {}", id, err);
        Error::UnexpectedError
    })
}

pub async fn find_owner_id<'e, E: PgExecutor<'e>>(e: E, id: &str) -> Result<Option<String>> {
    sqlx::query_scalar::<_, String>(
        "
        SELECT restaurants.user_id FROM menu_items
        INNER JOIN menus ON menus.id = menu_items.menu_id
        INNER JOIN restaurants ON restaurants.id = menus.restaurant_id
        WHERE
            menu_items.id = $1
            AND menu_items.deleted_at IS NULL
            AND menus.deleted_at IS NULL
            AND restaurants.deleted_at IS NULL
        ",
    )
    .bind(id)
    .fetch_optional(e)
    .await
    .map_err(|err| {
        tracing::error!("Error occurred while resolving owner of menu item {}: {}", id, err);
        Error::UnexpectedError
    })
}

#[async_trait]
impl MenuItemRepository for DatabaseConnection {
    async fn create(&self, payload: CreateMenuItemPayload) -> Result<MenuItem> {
        create(&self.pool, payload).await
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<MenuItem>> {
        find_by_id(&self.pool, id).await
    }

    async fn find_many_by_menu_id(&self, menu_id: &str) -> Result<Vec<MenuItem>> {
        find_many_by_menu_id(&self.pool, menu_id).await
    }

    async fn update_by_id(
        &self,
        id: &str,
        payload: UpdateMenuItemPayload,
    ) -> Result<Option<MenuItem>> {
        update_by_id(&self.pool, id, payload).await
    }

    async fn delete_by_id(&self, id: &str) -> Result<bool> {
        delete_by_id(&self.pool, id).await
    }

    async fn find_owner_id(&self, id: &str) -> Result<Option<String>> {
        find_owner_id(&self.pool, id).await
    }
}
