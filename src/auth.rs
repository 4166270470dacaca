//! Token issuing and verification.
//!
//! Tokens are stateless HS256 JWTs with a one-day validity window; nothing
//! is persisted and there is no revocation list. A token is trusted until
//! expiry even if the user's row changes afterwards.

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::{header::AUTHORIZATION, request::Parts};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::AppState;

/// Fixed validity window for issued tokens.
pub fn token_ttl() -> chrono::Duration {
    chrono::Duration::days(1)
}

#[derive(Clone)]
pub struct Keys {
    pub encoding: EncodingKey,
    pub decoding: DecodingKey,
}

impl Keys {
    pub fn from_secret(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: String,
    pub role: String,
    /// Expiry as a unix timestamp.
    pub exp: usize,
}

pub fn issue(user_id: i64, role: &str, keys: &Keys) -> Result<String, AppError> {
    let exp = (chrono::Utc::now() + token_ttl()).timestamp() as usize;
    let claims = Claims {
        sub: user_id.to_string(),
        role: role.to_string(),
        exp,
    };
    Ok(encode(&Header::default(), &claims, &keys.encoding)?)
}

pub fn verify(token: &str, keys: &Keys) -> Result<Claims, AppError> {
    decode::<Claims>(token, &keys.decoding, &Validation::new(Algorithm::HS256))
        .map(|data| data.claims)
        .map_err(|_| AppError::InvalidToken)
}

/// Identity decoded from the bearer token on protected routes.
///
/// Missing credentials reject with 401, a bad signature or expired token
/// with 403. The store is not consulted again.
#[derive(Debug)]
pub struct AuthUser {
    pub user_id: i64,
    pub role: String,
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .filter(|token| !token.is_empty())
            .ok_or(AppError::MissingToken)?;

        let claims = verify(token, &state.keys)?;
        let user_id = claims.sub.parse().map_err(|_| AppError::InvalidToken)?;

        Ok(Self {
            user_id,
            role: claims.role,
        })
    }
}
