use thiserror::Error;

/// Plugin error types
#[derive(Error, Debug)]
pub enum PluginError {
    #[error("upstream request failed with {status}: {message}")]
    Http { status: u16, message: String },

    #[error("precondition failed: {0}")]
    Precondition(String),

    #[error("decode error: {0}")]
    Decode(String),

    #[error("no new run detected after {attempts} polls ({waited_ms}ms)")]
    DetectionTimeout { attempts: usize, waited_ms: u64 },

    #[error("operation cancelled: {0}")]
    Cancelled(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("operation not supported: {0}")]
    NotSupported(String),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type PluginResult<T> = Result<T, PluginError>;

impl From<serde_json::Error> for PluginError {
    fn from(err: serde_json::Error) -> Self {
        PluginError::Decode(err.to_string())
    }
}
