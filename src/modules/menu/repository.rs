use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde::Serialize;
use sqlx::{FromRow, PgExecutor, PgPool};
use std::collections::HashMap;
use ulid::Ulid;

use crate::modules::{menu_item::repository::MenuItem, restaurant};
use crate::utils::database::DatabaseConnection;

type Result<T> = std::result::Result<T, Error>;

#[derive(Serialize, Clone, Debug, FromRow)]
pub struct Menu {
    pub id: String,
    pub name: String,
    pub restaurant_id: String,
    pub created_at: NaiveDateTime,
    pub updated_at: Option<NaiveDateTime>,
    #[serde(skip_serializing)]
    pub deleted_at: Option<NaiveDateTime>,
}

#[derive(Serialize, Clone, Debug)]
pub struct MenuWithItems {
    #[serde(flatten)]
    pub menu: Menu,
    pub items: Vec<MenuItem>,
}

pub struct CreateMenuPayload {
    pub name: String,
    pub restaurant_id: String,
}

#[derive(Debug)]
pub enum Error {
    UnexpectedError,
}

#[async_trait]
pub trait MenuRepository: Send + Sync {
    async fn create(&self, payload: CreateMenuPayload) -> Result<Menu>;

    /// A menu under a soft-deleted restaurant is not found.
    async fn find_by_id(&self, id: &str) -> Result<Option<Menu>>;

    async fn find_many_with_items_by_restaurant_id(
        &self,
        restaurant_id: &str,
    ) -> Result<Vec<MenuWithItems>>;

    async fn update_by_id(&self, id: &str, name: String) -> Result<Option<Menu>>;

    /// Soft delete. Clears the owning restaurant's daily menu if it pointed
    /// at this menu.
    async fn delete_by_id(&self, id: &str) -> Result<bool>;

    async fn find_owner_id(&self, id: &str) -> Result<Option<String>>;
}

pub async fn create<'e, E: PgExecutor<'e>>(e: E, payload: CreateMenuPayload) -> Result<Menu> {
    sqlx::query_as::<_, Menu>(
        "
        INSERT INTO menus (id, name, restaurant_id)
        VALUES ($1, $2, $3)
        RETURNING *
        ",
    )
    .bind(Ulid::new().to_string())
    .bind(payload.name)
    .bind(payload.restaurant_id)
    .fetch_one(e)
    .await
    .map_err(|err| {
        tracing::error!("Error occurred while creating a menu: {}", err);
        Error::UnexpectedError
    })
}

pub async fn find_by_id<'e, E: PgExecutor<'e>>(e: E, id: &str) -> Result<Option<Menu>> {
    sqlx::query_as::<_, Menu>(
        "
        SELECT menus.* FROM menus
        INNER JOIN restaurants ON restaurants.id = menus.restaurant_id
        WHERE
            menus.id = $1
            AND menus.deleted_at IS NULL
            AND restaurants.deleted_at IS NULL
        ",
    )
    .bind(id)
    .fetch_optional(e)
    .await
    .map_err(|err| {
        tracing::error!("Error occurred while fetching menu {}: {}", id, err);
        Error::UnexpectedError
    })
}

pub async fn find_many_with_items_by_restaurant_id<'e, E: PgExecutor<'e> + Copy>(
    e: E,
    restaurant_id: &str,
) -> Result<Vec<MenuWithItems>> {
    let menus = sqlx::query_as::<_, Menu>(
        "
        SELECT * FROM menus
        WHERE
            restaurant_id = $1
            AND deleted_at IS NULL
        ORDER BY created_at, id
        ",
    )
    .bind(restaurant_id)
    .fetch_all(e)
    .await
    .map_err(|err| {
        tracing::error!(
            "Error occurred while fetching menus of restaurant {}: {}",
            restaurant_id,
            err
        );
        Error::UnexpectedError
    })?;

    let menu_ids = menus.iter().map(|menu| menu.id.clone()).collect::<Vec<_>>();

    let items = sqlx::query_as::<_, MenuItem>(
        "
        SELECT * FROM menu_items
        WHERE
            menu_id = ANY($1)
            AND deleted_at IS NULL
        ORDER BY created_at, id
        ",
    )
    .bind(&menu_ids)
    .fetch_all(e)
    .await
    .map_err(|err| {
        tracing::error!(
            "Error occurred while fetching menu items of restaurant {}: {}",
            restaurant_id,
            err
        );
        Error::UnexpectedError
    })?;

    let mut items_by_menu: HashMap<String, Vec<MenuItem>> = HashMap::new();
    for item in items {
        items_by_menu
            .entry(item.menu_id.clone())
            .or_default()
            .push(item);
    }

    Ok(menus
        .into_iter()
        .map(|menu| {
            let items = items_by_menu.remove(&menu.id).unwrap_or_default();
            MenuWithItems { menu, items }
        })
        .collect())
}

pub async fn update_by_id<'e, E: PgExecutor<'e>>(
    e: E,
    id: &str,
    name: String,
) -> Result<Option<Menu>> {
    sqlx::query_as::<_, Menu>(
        "
        UPDATE menus SET
            name = $1,
            updated_at = NOW()
        WHERE
            id = $2
            AND deleted_at IS NULL
        RETURNING *
        ",
    )
    .bind(name)
    .bind(id)
    .fetch_optional(e)
    .await
    .map_err(|err| {
        tracing::error!("Error occurred while updating menu {}: {}", id, err);
        Error::UnexpectedError
    })
}

pub async fn soft_delete_by_id<'e, E: PgExecutor<'e>>(e: E, id: &str) -> Result<bool> {
    sqlx::query("UPDATE menus SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL")
        .bind(id)
        .execute(e)
        .await
        .map(|result| result.rows_affected() > 0)
        .map_err(|err| {
            tracing::error!("Error occurred while deleting menu {}: {}", id, err);
            Error::UnexpectedError
        })
}

pub async fn delete_by_id(pool: &PgPool, id: &str) -> Result<bool> {
    let mut tx = pool.begin().await.map_err(|err| {
        tracing::error!("Error occurred while starting a transaction: {}", err);
        Error::UnexpectedError
    })?;

    let deleted = soft_delete_by_id(&mut *tx, id).await?;

    if deleted {
        restaurant::repository::clear_daily_menu(&mut *tx, id)
            .await
            .map_err(|_| Error::UnexpectedError)?;
    }

    tx.commit().await.map_err(|err| {
        tracing::error!("Error occurred while committing menu deletion: {}", err);
        Error::UnexpectedError
    })?;

    Ok(deleted)
}

pub async fn find_owner_id<'e, E: PgExecutor<'e>>(e: E, id: &str) -> Result<Option<String>> {
    sqlx::query_scalar::<_, String>(
        "
        SELECT restaurants.user_id FROM menus
        INNER JOIN restaurants ON restaurants.id = menus.restaurant_id
        WHERE
            menus.id = $1
            AND menus.deleted_at IS NULL
            AND restaurants.deleted_at IS NULL
        ",
    )
    .bind(id)
    .fetch_optional(e)
    .await
    .map_err(|err| {
        tracing::error!("Error occurred while resolving owner of menu {}: {}", id, err);
        Error::UnexpectedError
    })
}

#[async_trait]
impl MenuRepository for DatabaseConnection {
    async fn create(&self, payload: CreateMenuPayload) -> Result<Menu> {
        create(&self.pool, payload).await
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Menu>> {
        find_by_id(&self.pool, id).await
    }

    async fn find_many_with_items_by_restaurant_id(
        &self,
        restaurant_id: &str,
    ) -> Result<Vec<MenuWithItems>> {
        find_many_with_items_by_restaurant_id(&self.pool, restaurant_id).await
    }

    async fn update_by_id(&self, id: &str, name: String) -> Result<Option<Menu>> {
        update_by_id(&self.pool, id, name).await
    }

    async fn delete_by_id(&self, id: &str) -> Result<bool> {
        delete_by_id(&self.pool, id).await
    }

    async fn find_owner_id(&self, id: &str) -> Result<Option<String>> {
        find_owner_id(&self.pool, id).await
    }
}
