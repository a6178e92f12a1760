pub mod request {
    use crate::modules::auth::service::otp::Channel;
    use serde::Deserialize;

    #[derive(Deserialize)]
    pub struct SmsBody {
        pub phone_number: String,
        pub code: String,
    }

    #[derive(Deserialize)]
    pub struct EmailBody {
        pub email: String,
        pub code: String,
    }

    pub struct Payload {
        pub channel: Channel,
        pub address: String,
        pub code: String,
    }
}

pub mod response {
    use axum::{extract::Json, http::StatusCode, response::IntoResponse};
    use serde_json::json;

    pub enum Success {
        SignedIn(String),
    }

    impl IntoResponse for Success {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::SignedIn(token) => {
                    (StatusCode::OK, Json(json!({ "token": token }))).into_response()
                }
            }
        }
    }

    pub enum Error {
        UserNotFound,
        InvalidCode,
        CodeExpired,
        FailedToVerifyCode,
        FailedToIssueToken,
    }

    impl IntoResponse for Error {
        fn into_response(self) -> axum::response::Response {
            match self {
                Error::UserNotFound => (
                    StatusCode::NOT_FOUND,
                    Json(json!({ "error": "User not found" })),
                )
                    .into_response(),
                Error::InvalidCode => (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({ "error": "Invalid code" })),
                )
                    .into_response(),
                Error::CodeExpired => (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({ "error": "Code has expired" })),
                )
                    .into_response(),
                Error::FailedToVerifyCode => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Failed to verify code" })),
                )
                    .into_response(),
                Error::FailedToIssueToken => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Failed to issue token" })),
                )
                    .into_response(),
            }
        }
    }

    pub type Response = Result<Success, Error>;
}
