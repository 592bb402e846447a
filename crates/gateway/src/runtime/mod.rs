//! Turn runtime: the per-message façade and the tool-calling orchestrator.

pub mod prompts;
pub mod tools;
pub mod turn;

use ig_domain::error::Result;
use ig_domain::lead::Lead;
use ig_domain::tool::Message;

use crate::state::AppState;

/// What one handled turn produces.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    pub reply: String,
    pub lead: Lead,
}

/// Handle one inbound user message for `(tenant_id, session_id)`.
///
/// Each turn starts from a fresh transcript — system prompt, developer
/// prompt, the user's message — and runs the tool loop to completion. Only
/// the lead persists across turns; history is recorded on the session for
/// inspection but not replayed. On failure the error propagates with no
/// partial reply.
pub async fn handle_turn(
    state: &AppState,
    tenant_id: &str,
    session_id: &str,
    user_message: &str,
) -> Result<TurnOutcome> {
    let transcript = vec![
        Message::system(prompts::SYSTEM_PROMPT),
        Message::developer(prompts::DEVELOPER_PROMPT),
        Message::user(user_message),
    ];

    let reply = turn::run_turn(state, tenant_id, session_id, transcript).await?;

    state.sessions.append_history(session_id, "user", user_message);
    state.sessions.append_history(session_id, "assistant", &reply);

    let lead = state.sessions.snapshot(session_id).lead;
    Ok(TurnOutcome { reply, lead })
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Test support
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[cfg(test)]
pub(crate) mod test_support {
    use std::collections::VecDeque;
    use std::sync::Arc;

    use parking_lot::Mutex;

    use ig_domain::config::Config;
    use ig_domain::error::{Error, Result};
    use ig_providers::{ChatRequest, ChatResponse, CompletionBackend};
    use ig_sessions::SessionStore;
    use ig_tools::{StubCrmExporter, StubScheduler};

    use crate::state::AppState;
    use crate::tenants::TenantDirectory;

    /// A completion backend that replays a fixed script of responses and
    /// records the transcript length of every request it saw.
    pub struct ScriptedBackend {
        script: Mutex<VecDeque<ChatResponse>>,
        pub seen_transcript_lens: Mutex<Vec<usize>>,
    }

    impl ScriptedBackend {
        pub fn new(script: Vec<ChatResponse>) -> Self {
            Self {
                script: Mutex::new(script.into()),
                seen_transcript_lens: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait::async_trait]
    impl CompletionBackend for ScriptedBackend {
        async fn complete(&self, req: &ChatRequest) -> Result<ChatResponse> {
            self.seen_transcript_lens.lock().push(req.messages.len());
            self.script.lock().pop_front().ok_or_else(|| Error::Backend {
                backend: "scripted".into(),
                message: "script exhausted".into(),
            })
        }

        fn backend_id(&self) -> &str {
            "scripted"
        }
    }

    /// Shorthand: a plain-text final response.
    pub fn text_response(content: &str) -> ChatResponse {
        ChatResponse {
            content: content.into(),
            tool_calls: Vec::new(),
            model: "scripted".into(),
            finish_reason: Some("stop".into()),
        }
    }

    /// Shorthand: a response requesting the given tool calls.
    pub fn tool_call_response(calls: Vec<ig_domain::tool::ToolCall>) -> ChatResponse {
        ChatResponse {
            content: String::new(),
            tool_calls: calls,
            model: "scripted".into(),
            finish_reason: Some("tool_calls".into()),
        }
    }

    /// An AppState wired to a scripted backend and stub effectors.
    pub fn scripted_state(script: Vec<ChatResponse>) -> AppState {
        state_with_backend(Arc::new(ScriptedBackend::new(script)))
    }

    pub fn state_with_backend(backend: Arc<ScriptedBackend>) -> AppState {
        let config = Arc::new(Config::default());
        AppState {
            sessions: Arc::new(SessionStore::new(config.sessions.default_language.clone())),
            tenants: Arc::new(TenantDirectory::new(&config.tenants)),
            backend,
            crm: Arc::new(StubCrmExporter),
            scheduler: Arc::new(StubScheduler::default()),
            config,
        }
    }
}
