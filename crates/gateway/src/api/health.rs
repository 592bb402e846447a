use axum::extract::State;
use axum::response::Json;

use crate::state::AppState;

/// GET /healthz — liveness probe with a couple of gauge-style counts.
pub async fn healthz(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "live_sessions": state.sessions.len(),
        "tenants": state.tenants.len(),
    }))
}
