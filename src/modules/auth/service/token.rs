use chrono::{Duration, NaiveDateTime, Utc};
use jsonwebtoken::{errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::modules::user::repository::{Role, User};

pub const TOKEN_VALIDITY_HOURS: i64 = 24;

/// The authenticated caller a token speaks for.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Identity {
    pub id: String,
    pub phone_number: String,
    pub role: Role,
}

impl From<&User> for Identity {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            phone_number: user.phone_number.clone(),
            role: user.role,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Claims {
    pub sub: String,
    pub phone_number: String,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn identity(&self) -> Identity {
        Identity {
            id: self.sub.clone(),
            phone_number: self.phone_number.clone(),
            role: self.role,
        }
    }
}

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("token signature does not match")]
    InvalidSignature,
    #[error("token could not be parsed")]
    Malformed,
    #[error("token has expired")]
    Expired,
    #[error("token could not be signed")]
    SigningFailed,
}

type Result<T> = std::result::Result<T, Error>;

/// Issues and checks HS256 session tokens with a secret fixed at construction.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl TokenService {
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
        }
    }

    pub fn issue(&self, identity: &Identity) -> Result<String> {
        self.issue_at(identity, Utc::now().naive_utc())
    }

    pub fn issue_at(&self, identity: &Identity, now: NaiveDateTime) -> Result<String> {
        let issued_at = now.and_utc().timestamp();
        let claims = Claims {
            sub: identity.id.clone(),
            phone_number: identity.phone_number.clone(),
            role: identity.role,
            iat: issued_at,
            exp: (now + Duration::hours(TOKEN_VALIDITY_HOURS))
                .and_utc()
                .timestamp(),
        };

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).map_err(
            |err| {
                tracing::error!("Failed to sign session token: {}", err);
                Error::SigningFailed
            },
        )
    }

    pub fn validate(&self, token: &str) -> Result<Claims> {
        self.validate_at(token, Utc::now().naive_utc())
    }

    pub fn validate_at(&self, token: &str, now: NaiveDateTime) -> Result<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        // expiry is compared against the supplied clock below
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let claims = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|err| match err.kind() {
                ErrorKind::InvalidSignature
                | ErrorKind::InvalidAlgorithm
                | ErrorKind::InvalidAlgorithmName => Error::InvalidSignature,
                ErrorKind::ExpiredSignature => Error::Expired,
                _ => Error::Malformed,
            })?;

        if now.and_utc().timestamp() >= claims.exp {
            return Err(Error::Expired);
        }

        Ok(claims)
    }
}
