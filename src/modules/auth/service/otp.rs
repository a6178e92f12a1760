use chrono::{Duration, NaiveDateTime, Utc};
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    modules::{
        notification::{
            self,
            service::{Backend, Notification},
        },
        user::{self, repository::User},
    },
    types::Context,
    utils::code,
};

pub const CODE_DIGITS: u32 = 6;
pub const CODE_VALIDITY_MINUTES: i64 = 5;

/// Where a login code is delivered. Each channel holds its own code.
#[derive(Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Sms,
    Email,
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Channel::Sms => f.write_str("sms"),
            Channel::Email => f.write_str("email"),
        }
    }
}

impl Channel {
    fn backend(&self) -> Backend {
        match self {
            Channel::Sms => Backend::Sms,
            Channel::Email => Backend::Email,
        }
    }
}

#[derive(Debug, PartialEq)]
pub enum RequestError {
    UserNotFound,
    UnexpectedError,
}

#[derive(Debug, PartialEq)]
pub enum VerificationError {
    UserNotFound,
    InvalidCode,
    Expired,
    UnexpectedError,
}

/// Looks up the user a channel address belongs to: a phone number for sms,
/// an email address for email.
async fn find_user(
    ctx: &Context,
    channel: Channel,
    address: &str,
) -> Result<Option<User>, user::repository::Error> {
    match channel {
        Channel::Sms => ctx.db.users.find_by_phone_number(address).await,
        Channel::Email => ctx.db.users.find_by_email(address).await,
    }
}

pub async fn request(
    ctx: Arc<Context>,
    channel: Channel,
    address: &str,
) -> Result<(), RequestError> {
    request_at(ctx, channel, address, Utc::now().naive_utc()).await
}

pub async fn request_at(
    ctx: Arc<Context>,
    channel: Channel,
    address: &str,
    now: NaiveDateTime,
) -> Result<(), RequestError> {
    let user = find_user(&ctx, channel, address)
        .await
        .map_err(|_| RequestError::UnexpectedError)?
        .ok_or(RequestError::UserNotFound)?;

    let code = code::generate(CODE_DIGITS);
    let expires_at = now + Duration::minutes(CODE_VALIDITY_MINUTES);

    ctx.db
        .users
        .set_verification_code(&user.id, channel, &code, expires_at)
        .await
        .map_err(|_| RequestError::UnexpectedError)?;

    notification::service::send(
        ctx.clone(),
        Notification::verification_code_requested(user, code),
        channel.backend(),
    )
    .await
    .map_err(|_| {
        tracing::error!("Failed to dispatch {} verification code", channel);
        RequestError::UnexpectedError
    })
}

pub async fn verify(
    ctx: Arc<Context>,
    channel: Channel,
    address: &str,
    code: &str,
) -> Result<User, VerificationError> {
    verify_at(ctx, channel, address, code, Utc::now().naive_utc()).await
}

pub async fn verify_at(
    ctx: Arc<Context>,
    channel: Channel,
    address: &str,
    code: &str,
    now: NaiveDateTime,
) -> Result<User, VerificationError> {
    let user = find_user(&ctx, channel, address)
        .await
        .map_err(|_| VerificationError::UnexpectedError)?
        .ok_or(VerificationError::UserNotFound)?;

    let (stored_code, expires_at) = user.verification_code(channel);

    match stored_code {
        Some(stored_code) if !stored_code.is_empty() && stored_code == code => (),
        _ => return Err(VerificationError::InvalidCode),
    }

    match expires_at {
        Some(expires_at) if now <= expires_at => (),
        _ => return Err(VerificationError::Expired),
    }

    let consumed = ctx
        .db
        .users
        .consume_verification_code(&user.id, channel, code, now)
        .await
        .map_err(|_| VerificationError::UnexpectedError)?;

    // another request consumed or replaced the code in between
    if !consumed {
        return Err(VerificationError::InvalidCode);
    }

    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::user::repository::CreateUserPayload;

    const PHONE_NUMBER: &str = "09121234567";
    const EMAIL: &str = "owner@example.com";

    async fn setup() -> (Arc<Context>, User) {
        let ctx = Arc::new(Context::in_memory(b"secret"));
        let user = ctx
            .db
            .users
            .create(CreateUserPayload {
                phone_number: PHONE_NUMBER.to_string(),
                email: EMAIL.to_string(),
                password_hash: "hash".to_string(),
            })
            .await
            .unwrap();
        (ctx, user)
    }

    async fn stored_code(ctx: &Context, id: &str, channel: Channel) -> String {
        let user = ctx.db.users.find_by_id(id).await.unwrap().unwrap();
        user.verification_code(channel).0.unwrap().to_string()
    }

    #[tokio::test]
    async fn issued_code_has_six_digits() {
        let (ctx, user) = setup().await;
        request(ctx.clone(), Channel::Sms, PHONE_NUMBER).await.unwrap();

        let code = stored_code(&ctx, &user.id, Channel::Sms).await;
        assert_eq!(code.len(), CODE_DIGITS as usize);
        assert!(code.chars().all(|c| c.is_ascii_digit()));
    }

    #[tokio::test]
    async fn code_works_once() {
        let (ctx, user) = setup().await;
        request(ctx.clone(), Channel::Sms, PHONE_NUMBER).await.unwrap();
        let code = stored_code(&ctx, &user.id, Channel::Sms).await;

        let verified = verify(ctx.clone(), Channel::Sms, PHONE_NUMBER, &code)
            .await
            .unwrap();
        assert_eq!(verified.id, user.id);

        assert_eq!(
            verify(ctx, Channel::Sms, PHONE_NUMBER, &code).await.unwrap_err(),
            VerificationError::InvalidCode
        );
    }

    #[tokio::test]
    async fn new_code_replaces_the_previous_one() {
        let (ctx, user) = setup().await;
        let now = Utc::now().naive_utc();

        request_at(ctx.clone(), Channel::Email, EMAIL, now).await.unwrap();
        let first = stored_code(&ctx, &user.id, Channel::Email).await;

        // regenerate until the draw differs from the first code
        let mut second = first.clone();
        while second == first {
            request_at(ctx.clone(), Channel::Email, EMAIL, now).await.unwrap();
            second = stored_code(&ctx, &user.id, Channel::Email).await;
        }

        assert_eq!(
            verify_at(ctx.clone(), Channel::Email, EMAIL, &first, now)
                .await
                .unwrap_err(),
            VerificationError::InvalidCode
        );
        assert!(verify_at(ctx, Channel::Email, EMAIL, &second, now)
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn code_expires_after_five_minutes() {
        let (ctx, user) = setup().await;
        let now = Utc::now().naive_utc();
        request_at(ctx.clone(), Channel::Sms, PHONE_NUMBER, now)
            .await
            .unwrap();
        let code = stored_code(&ctx, &user.id, Channel::Sms).await;

        let later = now + Duration::minutes(CODE_VALIDITY_MINUTES) + Duration::seconds(1);
        assert_eq!(
            verify_at(ctx.clone(), Channel::Sms, PHONE_NUMBER, &code, later)
                .await
                .unwrap_err(),
            VerificationError::Expired
        );

        // an expired attempt leaves the code in place
        assert_eq!(stored_code(&ctx, &user.id, Channel::Sms).await, code);
    }

    #[tokio::test]
    async fn wrong_code_can_be_retried() {
        let (ctx, user) = setup().await;
        request(ctx.clone(), Channel::Sms, PHONE_NUMBER).await.unwrap();
        let code = stored_code(&ctx, &user.id, Channel::Sms).await;
        let wrong = if code == "000000" { "111111" } else { "000000" };

        assert_eq!(
            verify(ctx.clone(), Channel::Sms, PHONE_NUMBER, wrong)
                .await
                .unwrap_err(),
            VerificationError::InvalidCode
        );
        assert!(verify(ctx, Channel::Sms, PHONE_NUMBER, &code).await.is_ok());
    }

    #[tokio::test]
    async fn channels_are_independent() {
        let (ctx, _) = setup().await;
        request(ctx.clone(), Channel::Sms, PHONE_NUMBER).await.unwrap();

        assert_eq!(
            verify(ctx, Channel::Email, EMAIL, "123456")
                .await
                .unwrap_err(),
            VerificationError::InvalidCode
        );
    }

    #[tokio::test]
    async fn unknown_address_is_reported() {
        let (ctx, _) = setup().await;

        assert_eq!(
            request(ctx.clone(), Channel::Sms, "09999999999")
                .await
                .unwrap_err(),
            RequestError::UserNotFound
        );
        assert_eq!(
            verify(ctx, Channel::Email, "nobody@example.com", "123456")
                .await
                .unwrap_err(),
            VerificationError::UserNotFound
        );
    }
}
