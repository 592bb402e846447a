//! Chat endpoint — one agent turn per request.
//!
//! `POST /v1/chat` with `{tenant_id, session_id, message, lead?}`;
//! the optional `lead` seeds the session before the turn runs.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use serde::Deserialize;

use ig_domain::error::Error;
use ig_domain::lead::Lead;

use crate::runtime::handle_turn;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatRequestBody {
    #[serde(default = "default_tenant")]
    pub tenant_id: String,
    pub session_id: String,
    pub message: String,
    /// Optional lead seed, replacing the session's lead wholesale.
    #[serde(default)]
    pub lead: Option<Lead>,
}

fn default_tenant() -> String {
    "dev".into()
}

pub async fn chat(
    State(state): State<AppState>,
    Json(body): Json<ChatRequestBody>,
) -> impl IntoResponse {
    if let Some(lead) = body.lead {
        state.sessions.set_lead(&body.session_id, lead);
    }

    match handle_turn(&state, &body.tenant_id, &body.session_id, &body.message).await {
        Ok(outcome) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "reply": outcome.reply,
                "lead": outcome.lead,
            })),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(session_id = %body.session_id, error = %e, "turn failed");
            let status = error_status(&e);
            (
                status,
                Json(serde_json::json!({ "error": e.to_string() })),
            )
                .into_response()
        }
    }
}

/// Map turn failures onto HTTP statuses: backend faults are upstream
/// errors, malformed tool arguments are unprocessable, the rest are ours.
fn error_status(e: &Error) -> StatusCode {
    match e {
        Error::Backend { .. } => StatusCode::BAD_GATEWAY,
        Error::Decode(_) => StatusCode::UNPROCESSABLE_ENTITY,
        Error::TurnDeadlineExceeded { .. } => StatusCode::GATEWAY_TIMEOUT,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
