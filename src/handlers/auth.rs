use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

use crate::{
    auth,
    error::AppError,
    extract::ValidJson,
    models::user::{LoginPayload, LoginResponse, RegisterPayload},
    AppState,
};

pub async fn register(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<RegisterPayload>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let (email, password, name) = match (
        payload.email.as_deref().map(str::trim).filter(|s| !s.is_empty()),
        payload.password.as_deref().filter(|s| !s.is_empty()),
        payload.name.as_deref().map(str::trim).filter(|s| !s.is_empty()),
    ) {
        (Some(email), Some(password), Some(name)) => (email, password, name),
        _ => {
            return Err(AppError::Validation(
                "Email, name, and password are required.".to_string(),
            ))
        }
    };

    if state.users.find_by_email(email).await?.is_some() {
        return Err(AppError::Conflict("Email already registered.".to_string()));
    }

    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)?
        .to_string();

    state.users.insert(email, name, &password_hash).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "User registered successfully." })),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<LoginPayload>,
) -> Result<Json<LoginResponse>, AppError> {
    let (email, password) = match (payload.email.as_deref(), payload.password.as_deref()) {
        (Some(email), Some(password)) if !email.is_empty() && !password.is_empty() => {
            (email, password)
        }
        _ => {
            return Err(AppError::Validation(
                "Email and password are required.".to_string(),
            ))
        }
    };

    // Unknown email and bad password are indistinguishable to the caller.
    let user = state
        .users
        .find_by_email(email)
        .await?
        .ok_or(AppError::LoginFail)?;

    let parsed_hash = PasswordHash::new(&user.password_hash)?;
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AppError::LoginFail)?;

    let token = auth::issue(user.id, &user.role, &state.keys)?;

    Ok(Json(LoginResponse {
        message: "Login successful.".to_string(),
        token,
        user: user.into(),
    }))
}
