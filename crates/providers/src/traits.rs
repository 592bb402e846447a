use ig_domain::error::Result;
use ig_domain::tool::{Message, ToolCall, ToolDefinition};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Request / Response types
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A backend-agnostic chat completion request.
#[derive(Debug, Clone, Default)]
pub struct ChatRequest {
    /// The full turn transcript to submit.
    pub messages: Vec<Message>,
    /// Tool definitions the model may invoke.
    pub tools: Vec<ToolDefinition>,
    /// Sampling temperature. `None` lets the backend use its configured
    /// default.
    pub temperature: Option<f32>,
}

/// A backend-agnostic chat completion response: either a final textual
/// answer (`tool_calls` empty) or a batch of tool-call requests.
#[derive(Debug, Clone)]
pub struct ChatResponse {
    pub content: String,
    pub tool_calls: Vec<ToolCall>,
    /// The model that actually produced the response.
    pub model: String,
    pub finish_reason: Option<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Backend trait
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// The completion backend capability the orchestrator consumes.
///
/// Treated as a black box: the core depends on nothing beyond
/// "transcript + tool schemas in, text or tool calls out". Tests substitute
/// scripted in-memory implementations.
#[async_trait::async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Submit the transcript and wait for the full response.
    async fn complete(&self, req: &ChatRequest) -> Result<ChatResponse>;

    /// A unique identifier for this backend instance (used in errors/logs).
    fn backend_id(&self) -> &str;
}
