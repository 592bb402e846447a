pub mod chat;
pub mod health;
pub mod tenants;
pub mod ws;

use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;

/// Build the full API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/healthz", get(health::healthz))
        .route("/v1/chat", post(chat::chat))
        .route("/v1/ws", get(ws::chat_ws))
        .route("/v1/tenants/:id", get(tenants::get_tenant))
}
