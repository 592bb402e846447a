//! Gateway configuration tree.
//!
//! Deserialized from `intakegw.toml`; every section and field has a serde
//! default so an empty file (or no file at all) yields a runnable dev
//! configuration. Secrets are never stored here — the LLM API key is read
//! from the environment variable named by `llm.api_key_env`.

use serde::{Deserialize, Serialize};

use crate::tenant::TenantConfig;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Top-level config
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub orchestrator: OrchestratorConfig,
    #[serde(default)]
    pub sessions: SessionsConfig,
    /// Tenants beyond the baked-in demo tenant.
    #[serde(default)]
    pub tenants: Vec<TenantConfig>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Server
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "d_host")]
    pub host: String,
    #[serde(default = "d_port")]
    pub port: u16,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default = "d_max_concurrent")]
    pub max_concurrent_requests: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: d_host(),
            port: d_port(),
            cors: CorsConfig::default(),
            max_concurrent_requests: d_max_concurrent(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Allowed origins; a single `"*"` entry allows all (dev only).
    #[serde(default = "d_origins")]
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: d_origins(),
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Completion backend
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Base URL of an OpenAI-compatible chat completions endpoint.
    #[serde(default = "d_llm_url")]
    pub base_url: String,
    #[serde(default = "d_llm_model")]
    pub model: String,
    #[serde(default = "d_temperature")]
    pub temperature: f32,
    /// Environment variable holding the API key.
    #[serde(default = "d_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "d_llm_timeout")]
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: d_llm_url(),
            model: d_llm_model(),
            temperature: d_temperature(),
            api_key_env: d_api_key_env(),
            timeout_secs: d_llm_timeout(),
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Orchestrator limits
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    /// Ceiling on model ↔ tool round trips within one turn.
    #[serde(default = "d_max_rounds")]
    pub max_tool_rounds: u32,
    /// Wall-clock deadline for one whole turn.
    #[serde(default = "d_turn_timeout")]
    pub turn_timeout_secs: u64,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            max_tool_rounds: d_max_rounds(),
            turn_timeout_secs: d_turn_timeout(),
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Session lifecycle
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionsConfig {
    /// Default conversation language for new sessions.
    #[serde(default = "d_language")]
    pub default_language: String,
    /// Sessions idle longer than this are evicted by the sweep task.
    #[serde(default = "d_max_idle")]
    pub max_idle_secs: u64,
    #[serde(default = "d_sweep_interval")]
    pub sweep_interval_secs: u64,
}

impl Default for SessionsConfig {
    fn default() -> Self {
        Self {
            default_language: d_language(),
            max_idle_secs: d_max_idle(),
            sweep_interval_secs: d_sweep_interval(),
        }
    }
}

// ── serde default helpers ──────────────────────────────────────────

fn d_host() -> String {
    "127.0.0.1".into()
}
fn d_port() -> u16 {
    8000
}
fn d_origins() -> Vec<String> {
    vec!["*".into()]
}
fn d_max_concurrent() -> usize {
    256
}
fn d_llm_url() -> String {
    "https://api.openai.com/v1".into()
}
fn d_llm_model() -> String {
    "gpt-4o-mini".into()
}
fn d_temperature() -> f32 {
    0.2
}
fn d_api_key_env() -> String {
    "OPENAI_API_KEY".into()
}
fn d_llm_timeout() -> u64 {
    60
}
fn d_max_rounds() -> u32 {
    8
}
fn d_turn_timeout() -> u64 {
    120
}
fn d_language() -> String {
    "en".into()
}
fn d_max_idle() -> u64 {
    86_400
}
fn d_sweep_interval() -> u64 {
    600
}
