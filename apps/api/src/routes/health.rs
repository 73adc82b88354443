use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Status object consumed by the keep-alive pinger and external monitors.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "ResumeWise API",
        "version": env!("CARGO_PKG_VERSION"),
        "environment": state.config.environment
    }))
}
