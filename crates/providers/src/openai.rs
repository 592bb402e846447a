//! OpenAI-compatible chat completions adapter.
//!
//! Works with OpenAI and any other endpoint that follows the chat
//! completions contract. Tool calling uses the `tools` / `tool_choice`
//! fields with function-style definitions.

use serde_json::Value;

use ig_domain::config::LlmConfig;
use ig_domain::error::{Error, Result};
use ig_domain::tool::{Message, Role, ToolCall, ToolDefinition};

use crate::traits::{ChatRequest, ChatResponse, CompletionBackend};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Adapter struct
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub struct OpenAiBackend {
    base_url: String,
    api_key: String,
    model: String,
    default_temperature: f32,
    client: reqwest::Client,
}

impl OpenAiBackend {
    /// Build the adapter from the `[llm]` config section. The API key is
    /// read from the environment variable named by `api_key_env`.
    pub fn from_config(cfg: &LlmConfig) -> Result<Self> {
        let api_key = std::env::var(&cfg.api_key_env)
            .map_err(|_| Error::Config(format!("{} is not set", cfg.api_key_env)))?;

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(cfg.timeout_secs))
            .build()
            .map_err(|e| Error::Backend {
                backend: "openai".into(),
                message: e.to_string(),
            })?;

        Ok(Self {
            base_url: cfg.base_url.trim_end_matches('/').to_owned(),
            api_key,
            model: cfg.model.clone(),
            default_temperature: cfg.temperature,
            client,
        })
    }

    fn build_body(&self, req: &ChatRequest) -> Value {
        let messages: Vec<Value> = req.messages.iter().map(msg_to_wire).collect();

        let mut body = serde_json::json!({
            "model": self.model,
            "messages": messages,
            "temperature": req.temperature.unwrap_or(self.default_temperature),
        });

        if !req.tools.is_empty() {
            let tools: Vec<Value> = req.tools.iter().map(tool_to_wire).collect();
            body["tools"] = Value::Array(tools);
            body["tool_choice"] = Value::String("auto".into());
        }

        body
    }
}

#[async_trait::async_trait]
impl CompletionBackend for OpenAiBackend {
    async fn complete(&self, req: &ChatRequest) -> Result<ChatResponse> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = self.build_body(req);

        tracing::debug!(url = %url, messages = req.messages.len(), "chat completion request");

        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Backend {
                backend: "openai".into(),
                message: e.to_string(),
            })?;

        let status = resp.status();
        let resp_text = resp.text().await.map_err(|e| Error::Backend {
            backend: "openai".into(),
            message: e.to_string(),
        })?;

        if !status.is_success() {
            return Err(Error::Backend {
                backend: "openai".into(),
                message: format!("HTTP {} - {}", status.as_u16(), resp_text),
            });
        }

        let resp_json: Value = serde_json::from_str(&resp_text)?;
        parse_chat_response(&resp_json)
    }

    fn backend_id(&self) -> &str {
        "openai"
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Wire conversion
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

fn role_to_str(role: Role) -> &'static str {
    match role {
        Role::System => "system",
        Role::User => "user",
        Role::Assistant => "assistant",
        Role::Tool => "tool",
    }
}

fn msg_to_wire(msg: &Message) -> Value {
    match msg.role {
        Role::Tool => serde_json::json!({
            "role": "tool",
            "tool_call_id": msg.tool_call_id.as_deref().unwrap_or(""),
            "name": msg.name.as_deref().unwrap_or(""),
            "content": msg.content,
        }),
        Role::Assistant if !msg.tool_calls.is_empty() => {
            let tool_calls: Vec<Value> = msg
                .tool_calls
                .iter()
                .map(|tc| {
                    serde_json::json!({
                        "id": tc.call_id,
                        "type": "function",
                        "function": {
                            "name": tc.tool_name,
                            "arguments": tc.arguments.to_string(),
                        }
                    })
                })
                .collect();
            serde_json::json!({
                "role": "assistant",
                "content": if msg.content.is_empty() { Value::Null } else { Value::String(msg.content.clone()) },
                "tool_calls": tool_calls,
            })
        }
        _ => {
            let mut obj = serde_json::json!({
                "role": role_to_str(msg.role),
                "content": msg.content,
            });
            // Named system messages carry the developer instructions.
            if let Some(name) = &msg.name {
                obj["name"] = Value::String(name.clone());
            }
            obj
        }
    }
}

fn tool_to_wire(tool: &ToolDefinition) -> Value {
    serde_json::json!({
        "type": "function",
        "function": {
            "name": tool.name,
            "description": tool.description,
            "parameters": tool.parameters,
        }
    })
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Response parsing
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

fn parse_chat_response(body: &Value) -> Result<ChatResponse> {
    let choice = body
        .get("choices")
        .and_then(|c| c.as_array())
        .and_then(|a| a.first())
        .ok_or_else(|| Error::Backend {
            backend: "openai".into(),
            message: "no choices in response".into(),
        })?;

    let message = choice.get("message").ok_or_else(|| Error::Backend {
        backend: "openai".into(),
        message: "no message in choice".into(),
    })?;

    let content = message
        .get("content")
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .to_string();

    let finish_reason = choice
        .get("finish_reason")
        .and_then(|v| v.as_str())
        .map(String::from);

    let model = body
        .get("model")
        .and_then(|v| v.as_str())
        .unwrap_or("unknown")
        .to_string();

    Ok(ChatResponse {
        content,
        tool_calls: parse_tool_calls(message)?,
        model,
        finish_reason,
    })
}

/// Tool-call argument payloads arrive as embedded JSON strings; a payload
/// that does not parse is a decode failure, not something to coerce.
fn parse_tool_calls(message: &Value) -> Result<Vec<ToolCall>> {
    let arr = match message.get("tool_calls").and_then(|v| v.as_array()) {
        Some(a) => a,
        None => return Ok(Vec::new()),
    };

    arr.iter()
        .map(|tc| {
            let call_id = tc
                .get("id")
                .and_then(|v| v.as_str())
                .ok_or_else(|| Error::Decode("tool call without id".into()))?
                .to_string();
            let func = tc
                .get("function")
                .ok_or_else(|| Error::Decode("tool call without function".into()))?;
            let tool_name = func
                .get("name")
                .and_then(|v| v.as_str())
                .ok_or_else(|| Error::Decode("tool call without name".into()))?
                .to_string();
            let args_str = func.get("arguments").and_then(|v| v.as_str()).unwrap_or("{}");
            let arguments: Value = serde_json::from_str(args_str)
                .map_err(|e| Error::Decode(format!("tool '{tool_name}' arguments: {e}")))?;
            Ok(ToolCall {
                call_id,
                tool_name,
                arguments,
            })
        })
        .collect()
}
