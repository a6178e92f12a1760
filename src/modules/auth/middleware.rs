use super::service::token::{Identity, TokenService};
use crate::modules::user::repository::Role;
use crate::types::Context;
use axum::extract::FromRequestParts;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::RequestPartsExt;
use axum::{async_trait, Json};
use axum::{extract::Extension, http::request::Parts, response::Response};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

const BEARER_PREFIX: &str = "Bearer ";

#[derive(Debug, PartialEq)]
pub enum Error {
    MissingHeader,
    InvalidFormat,
    InvalidToken,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let message = match self {
            Error::MissingHeader => "Authorization header is missing",
            Error::InvalidFormat => "Invalid token format",
            Error::InvalidToken => "Invalid token",
        };

        (StatusCode::UNAUTHORIZED, Json(json!({ "error": message }))).into_response()
    }
}

fn extract_bearer(header: &str) -> Result<&str, Error> {
    header
        .strip_prefix(BEARER_PREFIX)
        .filter(|token| !token.is_empty())
        .ok_or(Error::InvalidFormat)
}

/// Resolves a raw `Authorization` header value to the identity its token carries.
pub fn authenticate(tokens: &TokenService, header: Option<&[u8]>) -> Result<Identity, Error> {
    let header = header.ok_or(Error::MissingHeader)?;
    let header = std::str::from_utf8(header).map_err(|_| Error::InvalidFormat)?;
    let token = extract_bearer(header)?;

    tokens
        .validate(token)
        .map(|claims| claims.identity())
        .map_err(|err| {
            tracing::warn!("Rejected session token: {}", err);
            Error::InvalidToken
        })
}

async fn get_identity_from_request(parts: &mut Parts) -> Result<Identity, Response> {
    let Extension(ctx) = parts
        .extract::<Extension<Arc<Context>>>()
        .await
        .map_err(|err| {
            tracing::error!("Request context is not installed: {}", err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Sorry an error occurred" })),
            )
                .into_response()
        })?;

    let header = parts
        .headers
        .get(header::AUTHORIZATION)
        .map(|value| value.as_bytes());

    authenticate(&ctx.auth.tokens, header).map_err(IntoResponse::into_response)
}

#[derive(Serialize, Clone, Debug)]
pub struct Auth {
    pub user: Identity,
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for Auth {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _: &S) -> Result<Self, Self::Rejection> {
        get_identity_from_request(parts)
            .await
            .map(|user| Self { user })
    }
}

#[derive(Serialize, Clone, Debug)]
pub struct AdminAuth {
    pub user: Identity,
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for AdminAuth {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _: &S) -> Result<Self, Self::Rejection> {
        let user = get_identity_from_request(parts).await?;

        if !user.role.satisfies(Role::Admin) {
            return Err((
                StatusCode::FORBIDDEN,
                Json(json!({ "error": "You are not authorized to perform this action" })),
            )
                .into_response());
        }

        Ok(Self { user })
    }
}
