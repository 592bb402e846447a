use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};

use crate::state::AppState;

/// GET /v1/tenants/:id — tenant policy introspection (exact match, no
/// demo fallback: callers probing a tenant id want to know it is unknown).
pub async fn get_tenant(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match state.tenants.get(&id) {
        Some(tenant) => (StatusCode::OK, Json(serde_json::json!(tenant))).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": format!("unknown tenant: {id}") })),
        )
            .into_response(),
    }
}
