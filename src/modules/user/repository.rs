use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgExecutor, Row};
use ulid::Ulid;

use crate::modules::auth::service::otp::Channel;
use crate::utils::database::DatabaseConnection;
use crate::utils::pagination::{Paginated, Pagination};

type Result<T> = std::result::Result<T, Error>;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

#[derive(Debug, thiserror::Error)]
#[error("Invalid user role: {0}")]
pub struct InvalidRole(pub String);

impl TryFrom<String> for Role {
    type Error = InvalidRole;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        match value.as_ref() {
            "admin" => Ok(Role::Admin),
            "user" => Ok(Role::User),
            _ => Err(InvalidRole(value)),
        }
    }
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }

    /// Whether a holder of this role may do what `required` may do.
    pub fn satisfies(&self, required: Role) -> bool {
        match (self, required) {
            (Role::Admin, _) => true,
            (Role::User, Role::User) => true,
            (Role::User, Role::Admin) => false,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Serialize, Clone, Debug, FromRow)]
pub struct User {
    pub id: String,
    pub phone_number: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    #[sqlx(try_from = "String")]
    pub role: Role,
    #[serde(skip_serializing)]
    pub sms_code: Option<String>,
    #[serde(skip_serializing)]
    pub sms_code_expires_at: Option<NaiveDateTime>,
    #[serde(skip_serializing)]
    pub email_code: Option<String>,
    #[serde(skip_serializing)]
    pub email_code_expires_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: Option<NaiveDateTime>,
    #[serde(skip_serializing)]
    pub deleted_at: Option<NaiveDateTime>,
}

impl User {
    /// The outstanding code for a channel and when it stops being accepted.
    pub fn verification_code(&self, channel: Channel) -> (Option<&str>, Option<NaiveDateTime>) {
        match channel {
            Channel::Sms => (self.sms_code.as_deref(), self.sms_code_expires_at),
            Channel::Email => (self.email_code.as_deref(), self.email_code_expires_at),
        }
    }
}

pub struct CreateUserPayload {
    pub phone_number: String,
    pub email: String,
    pub password_hash: String,
}

#[derive(Default)]
pub struct UpdateUserPayload {
    pub phone_number: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
}

#[derive(Debug)]
pub enum Error {
    UnexpectedError,
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, payload: CreateUserPayload) -> Result<User>;

    async fn find_by_id(&self, id: &str) -> Result<Option<User>>;

    async fn find_by_phone_number(&self, phone_number: &str) -> Result<Option<User>>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Matches soft-deleted users too, since they keep their unique phone and email.
    async fn find_by_email_or_phone_number(
        &self,
        email: &str,
        phone_number: &str,
    ) -> Result<Option<User>>;

    /// Like `find_by_email_or_phone_number`, but skips the user `id` and
    /// ignores whichever of `email` or `phone_number` is absent.
    async fn find_other_by_email_or_phone_number(
        &self,
        id: &str,
        email: Option<&str>,
        phone_number: Option<&str>,
    ) -> Result<Option<User>>;

    async fn find_many(&self, pagination: Pagination) -> Result<Paginated<User>>;

    async fn update_by_id(&self, id: &str, payload: UpdateUserPayload) -> Result<Option<User>>;

    async fn update_role_by_id(&self, id: &str, role: Role) -> Result<Option<User>>;

    /// Soft delete. Returns whether a live user was found.
    async fn delete_by_id(&self, id: &str) -> Result<bool>;

    /// Replaces whatever code the channel held before.
    async fn set_verification_code(
        &self,
        id: &str,
        channel: Channel,
        code: &str,
        expires_at: NaiveDateTime,
    ) -> Result<()>;

    /// Clears the channel's code only if it still equals `code` and has not
    /// expired at `now`. Returns whether the code was consumed.
    async fn consume_verification_code(
        &self,
        id: &str,
        channel: Channel,
        code: &str,
        now: NaiveDateTime,
    ) -> Result<bool>;
}

fn code_columns(channel: Channel) -> (&'static str, &'static str) {
    match channel {
        Channel::Sms => ("sms_code", "sms_code_expires_at"),
        Channel::Email => ("email_code", "email_code_expires_at"),
    }
}

pub async fn create<'e, E: PgExecutor<'e>>(e: E, payload: CreateUserPayload) -> Result<User> {
    sqlx::query_as::<_, User>(
        "
        INSERT INTO users (id, phone_number, email, password_hash, role)
        VALUES ($1, $2, $3, $4, 'user')
        RETURNING *
        ",
    )
    .bind(Ulid::new().to_string())
    .bind(payload.phone_number)
    .bind(payload.email)
    .bind(payload.password_hash)
    .fetch_one(e)
    .await
    .map_err(|err| {
        tracing::error!("Error occured while creating a user account: {}", err);
        Error::UnexpectedError
    })
}

pub async fn find_by_id<'e, E: PgExecutor<'e>>(e: E, id: &str) -> Result<Option<User>> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1 AND deleted_at IS NULL")
        .bind(id)
        .fetch_optional(e)
        .await
        .map_err(|err| {
            tracing::error!("Error occurred while fetching user with id {}: {}", id, err);
            Error::UnexpectedError
        })
}

pub async fn find_by_phone_number<'e, E: PgExecutor<'e>>(
    e: E,
    phone_number: &str,
) -> Result<Option<User>> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE phone_number = $1 AND deleted_at IS NULL")
        .bind(phone_number)
        .fetch_optional(e)
        .await
        .map_err(|err| {
            tracing::error!("Error occurred in find_by_phone_number: {}", err);
            Error::UnexpectedError
        })
}

pub async fn find_by_email<'e, E: PgExecutor<'e>>(e: E, email: &str) -> Result<Option<User>> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1 AND deleted_at IS NULL")
        .bind(email)
        .fetch_optional(e)
        .await
        .map_err(|err| {
            tracing::error!("Error occurred in find_by_email: {}", err);
            Error::UnexpectedError
        })
}

pub async fn find_by_email_or_phone_number<'e, E: PgExecutor<'e>>(
    e: E,
    email: &str,
    phone_number: &str,
) -> Result<Option<User>> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1 OR phone_number = $2")
        .bind(email)
        .bind(phone_number)
        .fetch_optional(e)
        .await
        .map_err(|err| {
            tracing::error!("Error occurred in find_by_email_or_phone_number: {}", err);
            Error::UnexpectedError
        })
}

pub async fn find_other_by_email_or_phone_number<'e, E: PgExecutor<'e>>(
    e: E,
    id: &str,
    email: Option<&str>,
    phone_number: Option<&str>,
) -> Result<Option<User>> {
    sqlx::query_as::<_, User>(
        "
        SELECT * FROM users
        WHERE
            id <> $1
            AND (email = $2 OR phone_number = $3)
        LIMIT 1
        ",
    )
    .bind(id)
    .bind(email)
    .bind(phone_number)
    .fetch_optional(e)
    .await
    .map_err(|err| {
        tracing::error!(
            "Error occurred in find_other_by_email_or_phone_number: {}",
            err
        );
        Error::UnexpectedError
    })
}

pub async fn find_many<'e, E: PgExecutor<'e> + Copy>(
    e: E,
    pagination: Pagination,
) -> Result<Paginated<User>> {
    let total = sqlx::query("SELECT COUNT(*) AS total FROM users WHERE deleted_at IS NULL")
        .fetch_one(e)
        .await
        .and_then(|row| row.try_get::<i64, _>("total"))
        .map_err(|err| {
            tracing::error!("Error occurred while counting users: {}", err);
            Error::UnexpectedError
        })?;

    let users = sqlx::query_as::<_, User>(
        "
        SELECT * FROM users
        WHERE deleted_at IS NULL
        ORDER BY created_at, id
        LIMIT $1
        OFFSET $2
        ",
    )
    .bind(pagination.per_page() as i64)
    .bind(pagination.offset() as i64)
    .fetch_all(e)
    .await
    .map_err(|err| {
        tracing::error!("Error occurred while fetching users: {}", err);
        Error::UnexpectedError
    })?;

    Ok(Paginated::new(
        users,
        total as u32,
        pagination.page(),
        pagination.per_page(),
    ))
}

pub async fn update_by_id<'e, E: PgExecutor<'e>>(
    e: E,
    id: &str,
    payload: UpdateUserPayload,
) -> Result<Option<User>> {
    sqlx::query_as::<_, User>(
        "
        UPDATE users SET
            phone_number = COALESCE($1, phone_number),
            email = COALESCE($2, email),
            password_hash = COALESCE($3, password_hash),
            updated_at = NOW()
        WHERE
            id = $4
            AND deleted_at IS NULL
        RETURNING *
        ",
    )
    .bind(payload.phone_number)
    .bind(payload.email)
    .bind(payload.password_hash)
    .bind(id)
    .fetch_optional(e)
    .await
    .map_err(|err| {
        tracing::error!(
            "Error occurred while trying to update a user by id {}: {}",
            id,
            err
        );
        Error::UnexpectedError
    })
}

pub async fn update_role_by_id<'e, E: PgExecutor<'e>>(
    e: E,
    id: &str,
    role: Role,
) -> Result<Option<User>> {
    sqlx::query_as::<_, User>(
        "
        UPDATE users SET
            role = $1,
            updated_at = NOW()
        WHERE
            id = $2
            AND deleted_at IS NULL
        RETURNING *
        ",
    )
    .bind(role.as_str())
    .bind(id)
    .fetch_optional(e)
    .await
    .map_err(|err| {
        tracing::error!("Error occurred while updating role of user {}: {}", id, err);
        Error::UnexpectedError
    })
}

pub async fn delete_by_id<'e, E: PgExecutor<'e>>(e: E, id: &str) -> Result<bool> {
    sqlx::query("UPDATE users SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL")
        .bind(id)
        .execute(e)
        .await
        .map(|result| result.rows_affected() > 0)
        .map_err(|err| {
            tracing::error!("Error occurred while deleting user {}: {}", id, err);
            Error::UnexpectedError
        })
}

pub async fn set_verification_code<'e, E: PgExecutor<'e>>(
    e: E,
    id: &str,
    channel: Channel,
    code: &str,
    expires_at: NaiveDateTime,
) -> Result<()> {
    let (code_column, expiry_column) = code_columns(channel);

    sqlx::query(&format!(
        "UPDATE users SET {code_column} = $1, {expiry_column} = $2, updated_at = NOW() WHERE id = $3"
    ))
    .bind(code)
    .bind(expires_at)
    .bind(id)
    .execute(e)
    .await
    .map(|_| ())
    .map_err(|err| {
        tracing::error!(
            "Error occurred while saving {} verification code for user {}: {}",
            channel,
            id,
            err
        );
        Error::UnexpectedError
    })
}

pub async fn consume_verification_code<'e, E: PgExecutor<'e>>(
    e: E,
    id: &str,
    channel: Channel,
    code: &str,
    now: NaiveDateTime,
) -> Result<bool> {
    let (code_column, expiry_column) = code_columns(channel);

    sqlx::query(&format!(
        "
        UPDATE users SET
            {code_column} = NULL,
            {expiry_column} = NULL,
            updated_at = NOW()
        WHERE
            id = $1
            AND deleted_at IS NULL
            AND {code_column} = $2
            AND {expiry_column} >= $3
        "
    ))
    .bind(id)
    .bind(code)
    .bind(now)
    .execute(e)
    .await
    .map(|result| result.rows_affected() == 1)
    .map_err(|err| {
        tracing::error!(
            "Error occurred while consuming {} verification code for user {}: {}",
            channel,
            id,
            err
        );
        Error::UnexpectedError
    })
}

#[async_trait]
impl UserRepository for DatabaseConnection {
    async fn create(&self, payload: CreateUserPayload) -> Result<User> {
        create(&self.pool, payload).await
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>> {
        find_by_id(&self.pool, id).await
    }

    async fn find_by_phone_number(&self, phone_number: &str) -> Result<Option<User>> {
        find_by_phone_number(&self.pool, phone_number).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        find_by_email(&self.pool, email).await
    }

    async fn find_by_email_or_phone_number(
        &self,
        email: &str,
        phone_number: &str,
    ) -> Result<Option<User>> {
        find_by_email_or_phone_number(&self.pool, email, phone_number).await
    }

    async fn find_other_by_email_or_phone_number(
        &self,
        id: &str,
        email: Option<&str>,
        phone_number: Option<&str>,
    ) -> Result<Option<User>> {
        find_other_by_email_or_phone_number(&self.pool, id, email, phone_number).await
    }

    async fn find_many(&self, pagination: Pagination) -> Result<Paginated<User>> {
        find_many(&self.pool, pagination).await
    }

    async fn update_by_id(&self, id: &str, payload: UpdateUserPayload) -> Result<Option<User>> {
        update_by_id(&self.pool, id, payload).await
    }

    async fn update_role_by_id(&self, id: &str, role: Role) -> Result<Option<User>> {
        update_role_by_id(&self.pool, id, role).await
    }

    async fn delete_by_id(&self, id: &str) -> Result<bool> {
        delete_by_id(&self.pool, id).await
    }

    async fn set_verification_code(
        &self,
        id: &str,
        channel: Channel,
        code: &str,
        expires_at: NaiveDateTime,
    ) -> Result<()> {
        set_verification_code(&self.pool, id, channel, code, expires_at).await
    }

    async fn consume_verification_code(
        &self,
        id: &str,
        channel: Channel,
        code: &str,
        now: NaiveDateTime,
    ) -> Result<bool> {
        consume_verification_code(&self.pool, id, channel, code, now).await
    }
}
