//! Liveness handler

use axum::extract::State;
use axum::response::Response;
use serde_json::json;

use crate::state::AppState;
use crate::utils::errors::Result;
use crate::utils::response;

/// Round-trip both backing stores
pub async fn health_check(State(state): State<AppState>) -> Result<Response> {
    state.db.health_check().await?;
    let redis_ok = state.services.sessions.health_check().await?;

    Ok(response::page(json!({
        "status": if redis_ok { "ok" } else { "degraded" },
        "service": "gatherly",
    })))
}
