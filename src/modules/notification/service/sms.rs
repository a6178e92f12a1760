use super::{Error, Notification, Result};
use crate::types::Context;
use std::sync::Arc;

pub async fn send(_: Arc<Context>, notification: Notification) -> Result<()> {
    match notification {
        Notification::VerificationCodeRequested(n) => {
            tracing::info!(
                to = %n.user.phone_number,
                code = %n.code,
                "Verification code sent by sms"
            );
            Ok(())
        }
        Notification::Registered(_) => {
            tracing::warn!("Welcome messages are not delivered by sms");
            Err(Error::NotSent)
        }
    }
}
