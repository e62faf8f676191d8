use axum::{extract::State, routing::get, Json, Router};
use serde_json::{json, Value};

use crate::state::AppState;

pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
}

pub async fn root(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "Backend running",
        "message": "Welcome to Resume Manager API",
        "loginUrl": format!("{}/login", state.config.frontend_url),
    }))
}

pub async fn health(State(state): State<AppState>) -> Json<Value> {
    let store = if state.resumes.ping().await {
        "connected"
    } else {
        "disconnected"
    };
    Json(json!({ "status": "OK", "storeConnectionState": store }))
}
