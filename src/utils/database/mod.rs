mod memory;

pub use memory::MemoryDatabase;

use crate::modules::{
    menu::repository::MenuRepository, menu_item::repository::MenuItemRepository,
    restaurant::repository::RestaurantRepository, user::repository::UserRepository,
};
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::sync::Arc;

#[derive(Clone)]
pub struct DatabaseConnection {
    pub pool: PgPool,
}

pub async fn connect(database_url: &str) -> Result<DatabaseConnection, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(4)
        .connect(database_url)
        .await
        .map_err(|err| {
            tracing::error!("Error connecting to database: {}", err);
            err
        })?;

    Ok(DatabaseConnection { pool })
}

pub async fn migrate(db_conn: &DatabaseConnection) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!().run(&db_conn.pool).await.map_err(|err| {
        tracing::error!("Failed to run database migrations: {}", err);
        err
    })
}

/// Handles to every repository the handlers and the auth core read from.
#[derive(Clone)]
pub struct Database {
    pub users: Arc<dyn UserRepository>,
    pub restaurants: Arc<dyn RestaurantRepository>,
    pub menus: Arc<dyn MenuRepository>,
    pub menu_items: Arc<dyn MenuItemRepository>,
}

impl Database {
    pub fn postgres(db_conn: DatabaseConnection) -> Self {
        Self {
            users: Arc::new(db_conn.clone()),
            restaurants: Arc::new(db_conn.clone()),
            menus: Arc::new(db_conn.clone()),
            menu_items: Arc::new(db_conn),
        }
    }

    pub fn memory() -> Self {
        Self::from_memory(MemoryDatabase::default())
    }

    pub fn from_memory(db: MemoryDatabase) -> Self {
        Self {
            users: Arc::new(db.clone()),
            restaurants: Arc::new(db.clone()),
            menus: Arc::new(db.clone()),
            menu_items: Arc::new(db),
        }
    }
}
