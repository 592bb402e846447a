/// Shared error type used across all intake gateway crates.
///
/// Every error kind aborts the turn it occurred in; nothing is retried
/// inside the core.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("IO: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The completion backend call failed (network or backend fault).
    #[error("backend {backend}: {message}")]
    Backend { backend: String, message: String },

    /// Tool-call arguments did not match the tool's declared schema.
    #[error("tool arguments: {0}")]
    Decode(String),

    /// The model requested a tool this gateway does not expose.
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    /// A tool's internal precondition failed during dispatch.
    #[error("tool dispatch: {0}")]
    Dispatch(String),

    /// The tool loop exceeded the configured round ceiling.
    #[error("tool loop limit reached ({rounds} rounds)")]
    RoundLimitExceeded { rounds: u32 },

    /// The whole turn exceeded the configured deadline.
    #[error("turn deadline exceeded ({secs}s)")]
    TurnDeadlineExceeded { secs: u64 },

    #[error("config: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
