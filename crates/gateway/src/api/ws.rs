//! WebSocket endpoint — the streaming variant of the chat surface.
//!
//! Flow:
//! 1. Client connects to `GET /v1/ws`
//! 2. Client sends one JSON frame `{tenant_id, session_id, message}` per turn
//! 3. Gateway replies with one `{reply, lead}` frame per input
//!
//! Frames on one connection are processed strictly sequentially; the
//! connection terminates on the first failed turn, malformed frame, or
//! transport closure.

use axum::extract::ws::{Message as WsFrame, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};

use ig_domain::lead::Lead;

use crate::runtime::handle_turn;
use crate::state::AppState;

fn default_tenant() -> String {
    "dev".into()
}

#[derive(Debug, Deserialize)]
struct TurnFrame {
    #[serde(default = "default_tenant")]
    tenant_id: String,
    session_id: String,
    message: String,
}

#[derive(Debug, Serialize)]
struct ReplyFrame {
    reply: String,
    lead: Lead,
}

/// GET /v1/ws — upgrade to WebSocket.
pub async fn chat_ws(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(mut socket: WebSocket, state: AppState) {
    let conn_id = uuid::Uuid::new_v4();
    tracing::debug!(%conn_id, "chat websocket connected");

    while let Some(frame) = socket.recv().await {
        let frame = match frame {
            Ok(WsFrame::Text(text)) => text,
            Ok(WsFrame::Close(_)) | Err(_) => break,
            // Pings/pongs are answered by axum; ignore binary frames.
            Ok(_) => continue,
        };

        let turn: TurnFrame = match serde_json::from_str(&frame) {
            Ok(t) => t,
            Err(e) => {
                tracing::warn!(%conn_id, error = %e, "malformed turn frame, closing");
                break;
            }
        };

        let outcome = match handle_turn(
            &state,
            &turn.tenant_id,
            &turn.session_id,
            &turn.message,
        )
        .await
        {
            Ok(o) => o,
            Err(e) => {
                tracing::error!(%conn_id, session_id = %turn.session_id, error = %e, "turn failed, closing");
                break;
            }
        };

        let reply = ReplyFrame {
            reply: outcome.reply,
            lead: outcome.lead,
        };
        let payload = match serde_json::to_string(&reply) {
            Ok(p) => p,
            Err(e) => {
                tracing::error!(%conn_id, error = %e, "reply serialization failed, closing");
                break;
            }
        };

        if socket.send(WsFrame::Text(payload)).await.is_err() {
            break;
        }
    }

    tracing::debug!(%conn_id, "chat websocket closed");
}
