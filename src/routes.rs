use axum::{
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method, StatusCode,
    },
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::{handlers, AppState};

/// Builds the full application router.
///
/// Mutating product routes are the only protected surface; protection
/// happens in the handlers through the `AuthUser` extractor. Requests
/// without an `Origin` header are not CORS requests and always pass.
pub fn router(state: AppState, allowed_origins: Vec<String>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(move |origin: &HeaderValue, _| {
            origin
                .to_str()
                .map(|origin| allowed_origins.iter().any(|allowed| allowed == origin))
                .unwrap_or(false)
        }))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
        .allow_credentials(true);

    Router::new()
        .route("/health", get(handlers::health::check))
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
        .route(
            "/products",
            get(handlers::products::list).post(handlers::products::create),
        )
        .route("/products/search", get(handlers::products::search))
        .route(
            "/products/:id",
            get(handlers::products::get_one)
                .put(handlers::products::update)
                .delete(handlers::products::remove),
        )
        .fallback(not_found)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn not_found() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "Route not found" })),
    )
}
