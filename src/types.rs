pub use crate::utils::database;
use crate::modules::auth::service::token::TokenService;
use async_trait::async_trait;
use std::env;

#[derive(Clone, Debug, PartialEq)]
pub enum AppEnvironment {
    Production,
    Development,
}

impl AppEnvironment {
    pub fn from(raw_environment: String) -> Self {
        match raw_environment.as_ref() {
            "production" => Self::Production,
            _ => Self::Development,
        }
    }
}

#[derive(Clone)]
pub struct AppContext {
    pub host: String,
    pub environment: AppEnvironment,
    pub port: u16,
    pub url: String,
}

#[derive(Clone)]
pub struct AuthContext {
    pub tokens: TokenService,
}

#[derive(Clone)]
pub struct Context {
    pub app: AppContext,
    pub db: database::Database,
    pub auth: AuthContext,
}

impl Context {
    /// A development context over an empty in-memory store.
    pub fn in_memory(jwt_secret: &[u8]) -> Self {
        Self {
            app: AppContext {
                host: "127.0.0.1".to_string(),
                environment: AppEnvironment::Development,
                port: 8000,
                url: "http://127.0.0.1:8000".to_string(),
            },
            db: database::Database::memory(),
            auth: AuthContext {
                tokens: TokenService::new(jwt_secret),
            },
        }
    }
}

#[derive(Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Clone)]
pub struct AppConfig {
    pub host: String,
    pub environment: AppEnvironment,
    pub port: u16,
    pub url: String,
}

#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
}

#[derive(Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub app: AppConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} not set")]
    Missing(&'static str),
    #[error("Invalid {0}")]
    Invalid(&'static str),
}

#[derive(Debug, thiserror::Error)]
pub enum ContextError {
    #[error("database connection failed: {0}")]
    Connection(#[from] sqlx::Error),
    #[error("database migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

fn env_or(key: &str, fallback: &str) -> String {
    env::var(key).unwrap_or_else(|_| fallback.to_string())
}

impl DatabaseConfig {
    /// Prefers `DATABASE_URL`, otherwise assembles one from the `DB_*` variables.
    fn from_env() -> Self {
        if let Ok(url) = env::var("DATABASE_URL") {
            return Self { url };
        }

        let url = format!(
            "postgres://{}:{}@{}:{}/{}?sslmode={}",
            env_or("DB_USER", "user"),
            env_or("DB_PASSWORD", "password"),
            env_or("DB_HOST", "localhost"),
            env_or("DB_PORT", "5432"),
            env_or("DB_NAME", "mydatabase"),
            env_or("DB_SSLMODE", "disable"),
        );

        Self { url }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = env_or("HOST", "0.0.0.0");
        let environment = env_or("APP_ENV", "development");
        let port = env_or("PORT", "8000")
            .parse::<u16>()
            .map_err(|_| ConfigError::Invalid("PORT"))?;
        let url = env::var("URL").unwrap_or_else(|_| format!("http://{}:{}", host, port));
        let jwt_secret = env::var("JWT_SECRET").map_err(|_| ConfigError::Missing("JWT_SECRET"))?;

        if jwt_secret.trim().is_empty() {
            return Err(ConfigError::Invalid("JWT_SECRET"));
        }

        Ok(Self {
            database: DatabaseConfig::from_env(),
            app: AppConfig {
                host,
                environment: AppEnvironment::from(environment),
                port,
                url,
            },
            auth: AuthConfig { jwt_secret },
        })
    }
}

#[async_trait]
pub trait ToContext {
    async fn to_context(self) -> Result<Context, ContextError>;
}

#[async_trait]
impl ToContext for Config {
    async fn to_context(self) -> Result<Context, ContextError> {
        let db_conn = database::connect(self.database.url.as_str()).await?;
        database::migrate(&db_conn).await?;

        tracing::debug!("Database connection established and migrated");

        Ok(Context {
            app: AppContext {
                host: self.app.host,
                environment: self.app.environment,
                port: self.app.port,
                url: self.app.url,
            },
            db: database::Database::postgres(db_conn),
            auth: AuthContext {
                tokens: TokenService::new(self.auth.jwt_secret.as_bytes()),
            },
        })
    }
}
