pub mod request {
    use crate::modules::auth::service::otp::Channel;
    use serde::Deserialize;

    #[derive(Deserialize)]
    pub struct SmsBody {
        pub phone_number: String,
    }

    #[derive(Deserialize)]
    pub struct EmailBody {
        pub email: String,
    }

    pub struct Payload {
        pub channel: Channel,
        pub address: String,
    }
}

pub mod response {
    use crate::modules::auth::service::otp::Channel;
    use axum::{extract::Json, http::StatusCode, response::IntoResponse};
    use serde_json::json;

    pub enum Success {
        CodeSent(Channel),
    }

    impl IntoResponse for Success {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::CodeSent(Channel::Sms) => (
                    StatusCode::OK,
                    Json(json!({ "message": "Check your phone for a login code" })),
                )
                    .into_response(),
                Self::CodeSent(Channel::Email) => (
                    StatusCode::OK,
                    Json(json!({ "message": "Check your email for a login code" })),
                )
                    .into_response(),
            }
        }
    }

    pub enum Error {
        UserNotFound,
        FailedToSendCode,
    }

    impl IntoResponse for Error {
        fn into_response(self) -> axum::response::Response {
            match self {
                Error::UserNotFound => (
                    StatusCode::NOT_FOUND,
                    Json(json!({ "error": "User not found" })),
                )
                    .into_response(),
                Error::FailedToSendCode => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Failed to send login code" })),
                )
                    .into_response(),
            }
        }
    }

    pub type Response = Result<Success, Error>;
}
