use std::sync::atomic::{AtomicBool, Ordering};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::store::StoreError;

// Production mode suppresses internal detail in 500 bodies. Defaults to
// true so a missed call to `set_production` can never leak detail.
static PRODUCTION: AtomicBool = AtomicBool::new(true);

pub fn set_production(production: bool) {
    PRODUCTION.store(production, Ordering::Relaxed);
}

fn is_production() -> bool {
    PRODUCTION.load(Ordering::Relaxed)
}

#[derive(Debug)]
pub enum AppError {
    Validation(String),
    Conflict(String),
    NotFound(String),
    MissingToken,
    InvalidToken,
    LoginFail,
    Store(StoreError),
    PasswordHash(argon2::password_hash::Error),
    Jwt(jsonwebtoken::errors::Error),
}

impl From<StoreError> for AppError {
    fn from(inner: StoreError) -> Self {
        AppError::Store(inner)
    }
}

impl From<argon2::password_hash::Error> for AppError {
    fn from(inner: argon2::password_hash::Error) -> Self {
        AppError::PasswordHash(inner)
    }
}

impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(inner: jsonwebtoken::errors::Error) -> Self {
        AppError::Jwt(inner)
    }
}

fn internal(detail: String) -> (StatusCode, String) {
    tracing::error!("{detail}");
    let message = if is_production() {
        "Internal server error".to_string()
    } else {
        detail
    };
    (StatusCode::INTERNAL_SERVER_ERROR, message)
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::MissingToken => (
                StatusCode::UNAUTHORIZED,
                "Access denied. No token provided.".to_string(),
            ),
            AppError::InvalidToken => (
                StatusCode::FORBIDDEN,
                "Invalid or expired token.".to_string(),
            ),
            AppError::LoginFail => {
                (StatusCode::UNAUTHORIZED, "Invalid credentials.".to_string())
            }
            AppError::Store(StoreError::Database(e)) => {
                // Map known store-level failures the services did not
                // pre-validate; everything else is a generic 500.
                if let Some(db_err) = e.as_database_error() {
                    if db_err.is_unique_violation() {
                        return (
                            StatusCode::CONFLICT,
                            Json(json!({"error": "A record with this data already exists"})),
                        )
                            .into_response();
                    }
                }
                if matches!(e, sqlx::Error::RowNotFound) {
                    (StatusCode::NOT_FOUND, "Record not found".to_string())
                } else {
                    internal(format!("database error: {e}"))
                }
            }
            AppError::Store(StoreError::Corrupt(msg)) => {
                internal(format!("corrupt row: {msg}"))
            }
            AppError::PasswordHash(e) => internal(format!("password hashing error: {e}")),
            AppError::Jwt(e) => internal(format!("token error: {e}")),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
