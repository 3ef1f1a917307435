use thiserror::Error;

/// Unified error type for the version and PR comment actions
#[derive(Error, Debug)]
pub enum ActionError {
    #[error("Invalid version number: {0}")]
    InvalidVersionFormat(String),

    #[error("Exceeded max iterations ({attempts}) finding a unique revision for {version}")]
    ResolutionExhausted { version: String, attempts: usize },

    #[error("Failed to list repository tags")]
    TagFetch(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Missing required input: {0}")]
    MissingInput(String),

    #[error("Workflow context error: {0}")]
    Context(String),

    #[error("GitHub API error: {0}")]
    Api(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in version-actions
pub type Result<T> = std::result::Result<T, ActionError>;

impl ActionError {
    /// Create a version format error for the offending text
    pub fn invalid_version(text: impl Into<String>) -> Self {
        ActionError::InvalidVersionFormat(text.into())
    }

    /// Wrap the underlying cause of a failed tag listing
    pub fn tag_fetch(cause: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        ActionError::TagFetch(cause.into())
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        ActionError::Config(msg.into())
    }

    pub fn missing_input(name: impl Into<String>) -> Self {
        ActionError::MissingInput(name.into())
    }

    pub fn context(msg: impl Into<String>) -> Self {
        ActionError::Context(msg.into())
    }

    pub fn api(msg: impl Into<String>) -> Self {
        ActionError::Api(msg.into())
    }
}
