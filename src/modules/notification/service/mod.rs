mod email;
mod sms;

use crate::{modules::user::repository::User, types::Context};
use std::sync::Arc;

pub enum Backend {
    Email,
    Sms,
}

pub mod types {
    use crate::modules::user::repository::User;

    #[derive(Clone)]
    pub struct Registered {
        pub user: User,
    }

    #[derive(Clone)]
    pub struct VerificationCodeRequested {
        pub user: User,
        pub code: String,
    }
}

#[derive(Clone)]
pub enum Notification {
    Registered(types::Registered),
    VerificationCodeRequested(types::VerificationCodeRequested),
}

impl Notification {
    pub fn registered(user: User) -> Self {
        Notification::Registered(types::Registered { user })
    }

    pub fn verification_code_requested(user: User, code: String) -> Self {
        Notification::VerificationCodeRequested(types::VerificationCodeRequested { user, code })
    }
}

#[derive(Debug)]
pub enum Error {
    NotSent,
}

pub type Result<T> = std::result::Result<T, Error>;

pub async fn send(ctx: Arc<Context>, notification: Notification, backend: Backend) -> Result<()> {
    match backend {
        Backend::Email => email::send(ctx, notification).await,
        Backend::Sms => sms::send(ctx, notification).await,
    }
}
