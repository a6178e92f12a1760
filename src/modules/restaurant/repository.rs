use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde::Serialize;
use sqlx::{FromRow, PgExecutor};
use ulid::Ulid;

use crate::modules::menu::repository::MenuWithItems;
use crate::utils::database::DatabaseConnection;

type Result<T> = std::result::Result<T, Error>;

#[derive(Serialize, Clone, Debug, FromRow)]
pub struct Restaurant {
    pub id: String,
    pub name: String,
    pub address: String,
    pub user_id: String,
    pub daily_menu_id: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: Option<NaiveDateTime>,
    #[serde(skip_serializing)]
    pub deleted_at: Option<NaiveDateTime>,
}

#[derive(Serialize, Clone, Debug)]
pub struct RestaurantWithMenus {
    #[serde(flatten)]
    pub restaurant: Restaurant,
    pub menus: Vec<MenuWithItems>,
}

pub struct CreateRestaurantPayload {
    pub name: String,
    pub address: String,
    pub user_id: String,
}

#[derive(Default)]
pub struct UpdateRestaurantPayload {
    pub name: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug)]
pub enum Error {
    UnexpectedError,
}

#[async_trait]
pub trait RestaurantRepository: Send + Sync {
    async fn create(&self, payload: CreateRestaurantPayload) -> Result<Restaurant>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Restaurant>>;

    async fn update_by_id(
        &self,
        id: &str,
        payload: UpdateRestaurantPayload,
    ) -> Result<Option<Restaurant>>;

    async fn delete_by_id(&self, id: &str) -> Result<bool>;

    /// Points the restaurant at one of its own live menus. Returns false and
    /// leaves the reference alone when the menu belongs elsewhere.
    async fn set_daily_menu(&self, id: &str, menu_id: &str) -> Result<bool>;

    async fn find_owner_id(&self, id: &str) -> Result<Option<String>>;
}

pub async fn create<'e, E: PgExecutor<'e>>(
    e: E,
    payload: CreateRestaurantPayload,
) -> Result<Restaurant> {
    sqlx::query_as::<_, Restaurant>(
        "
        INSERT INTO restaurants (id, name, address, user_id)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        ",
    )
    .bind(Ulid::new().to_string())
    .bind(payload.name)
    .bind(payload.address)
    .bind(payload.user_id)
    .fetch_one(e)
    .await
    .map_err(|err| {
        tracing::error!("Error occurred while creating a restaurant: {}", err);
        Error::UnexpectedError
    })
}

pub async fn find_by_id<'e, E: PgExecutor<'e>>(e: E, id: &str) -> Result<Option<Restaurant>> {
    sqlx::query_as::<_, Restaurant>(
        "SELECT * FROM restaurants WHERE id = $1 AND deleted_at IS NULL",
    )
    .bind(id)
    .fetch_optional(e)
    .await
    .map_err(|err| {
        tracing::error!("Error occurred while fetching restaurant {}: {}", id, err);
        Error::UnexpectedError
    })
}

pub async fn update_by_id<'e, E: PgExecutor<'e>>(
    e: E,
    id: &str,
    payload: UpdateRestaurantPayload,
) -> Result<Option<Restaurant>> {
    sqlx::query_as::<_, Restaurant>(
        "
        UPDATE restaurants SET
            name = COALESCE($1, name),
            address = COALESCE($2, address),
            updated_at = NOW()
        WHERE
            id = $3
            AND deleted_at IS NULL
        RETURNING *
        ",
    )
    .bind(payload.name)
    .bind(payload.address)
    .bind(id)
    .fetch_optional(e)
    .await
    .map_err(|err| {
        tracing::error!("Error occurred while updating restaurant {}: {}", id, err);
        Error::UnexpectedError
    })
}

pub async fn delete_by_id<'e, E: PgExecutor<'e>>(e: E, id: &str) -> Result<bool> {
    sqlx::query(
        "UPDATE restaurants SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
    )
    .bind(id)
    .execute(e)
    .await
    .map(|result| result.rows_affected() > 0)
    .map_err(|err| {
        tracing::error!("Error occurred while deleting restaurant {}: {}", id, err);
        Error::UnexpectedError
    })
}

pub async fn set_daily_menu<'e, E: PgExecutor<'e>>(e: E, id: &str, menu_id: &str) -> Result<bool> {
    sqlx::query(
        "
        UPDATE restaurants SET
            daily_menu_id = $1,
            updated_at = NOW()
        WHERE
            id = $2
            AND deleted_at IS NULL
            AND EXISTS (
                SELECT 1 FROM menus
                WHERE
                    menus.id = $1
                    AND menus.restaurant_id = $2
                    AND menus.deleted_at IS NULL
            )
        ",
    )
    .bind(menu_id)
    .bind(id)
    .execute(e)
    .await
    .map(|result| result.rows_affected() > 0)
    .map_err(|err| {
        tracing::error!(
            "Error occurred while setting daily menu of restaurant {}: {}",
            id,
            err
        );
        Error::UnexpectedError
    })
}

pub async fn clear_daily_menu<'e, E: PgExecutor<'e>>(e: E, menu_id: &str) -> Result<()> {
    sqlx::query(
        "UPDATE restaurants SET daily_menu_id = NULL, updated_at = NOW() WHERE daily_menu_id = $1",
    )
    .bind(menu_id)
    .execute(e)
    .await
    .map(|_| ())
    .map_err(|err| {
        tracing::error!(
            "Error occurred while clearing daily menu reference to {}: {}",
            menu_id,
            err
        );
        Error::UnexpectedError
    })
}

pub async fn find_owner_id<'e, E: PgExecutor<'e>>(e: E, id: &str) -> Result<Option<String>> {
    sqlx::query_scalar::<_, String>(
        "SELECT user_id FROM restaurants WHERE id = $1 AND deleted_at IS NULL",
    )
    .bind(id)
    .fetch_optional(e)
    .await
    .map_err(|err| {
        tracing::error!("Error occurred while resolving owner of restaurant {}: {}", id, err);
        Error::UnexpectedError
    })
}

#[async_trait]
impl RestaurantRepository for DatabaseConnection {
    async fn create(&self, payload: CreateRestaurantPayload) -> Result<Restaurant> {
        create(&self.pool, payload).await
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Restaurant>> {
        find_by_id(&self.pool, id).await
    }

    async fn update_by_id(
        &self,
        id: &str,
        payload: UpdateRestaurantPayload,
    ) -> Result<Option<Restaurant>> {
        update_by_id(&self.pool, id, payload).await
    }

    async fn delete_by_id(&self, id: &str) -> Result<bool> {
        delete_by_id(&self.pool, id).await
    }

    async fn set_daily_menu(&self, id: &str, menu_id: &str) -> Result<bool> {
        set_daily_menu(&self.pool, id, menu_id).await
    }

    async fn find_owner_id(&self, id: &str) -> Result<Option<String>> {
        find_owner_id(&self.pool, id).await
    }
}
