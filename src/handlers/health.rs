use axum::{extract::State, Json};
use chrono::{SecondsFormat, Utc};
use serde_json::{json, Value};

use crate::AppState;

pub async fn check(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "OK",
        "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        "environment": state.environment,
    }))
}
