use super::{types, Notification, Result};
use crate::types::Context;
use std::sync::Arc;

pub async fn send(ctx: Arc<Context>, notification: Notification) -> Result<()> {
    match notification {
        Notification::Registered(n) => send_welcome(ctx, n).await,
        Notification::VerificationCodeRequested(n) => send_verification_code(n).await,
    }
}

async fn send_welcome(ctx: Arc<Context>, notification: types::Registered) -> Result<()> {
    tracing::info!(
        to = %notification.user.email,
        "Welcome email sent, sign in at {}",
        ctx.app.url
    );
    Ok(())
}

// No mail provider is wired in, the log line is the delivery.
async fn send_verification_code(notification: types::VerificationCodeRequested) -> Result<()> {
    tracing::info!(
        to = %notification.user.email,
        code = %notification.code,
        "Verification code emailed"
    );
    Ok(())
}
