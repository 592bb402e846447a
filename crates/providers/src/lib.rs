//! Completion backend adapters for the intake gateway.
//!
//! The orchestrator depends only on the [`CompletionBackend`] trait; the
//! shipped adapter speaks the OpenAI chat-completions wire format and works
//! against any compatible endpoint (OpenAI, Azure-style gateways, Ollama,
//! vLLM, ...).

pub mod openai;
pub mod traits;

pub use openai::OpenAiBackend;
pub use traits::{ChatRequest, ChatResponse, CompletionBackend};
