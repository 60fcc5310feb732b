use eventsource_stream::EventStreamError;
use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResearchError {
    #[error("Input required")]
    InputRequired,

    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Request failed: {status} - {body}")]
    Status { status: StatusCode, body: String },

    #[error("Stream error: {0}")]
    Stream(#[from] EventStreamError<reqwest::Error>),

    #[error("Failed to parse research event: {0}")]
    Parse(#[from] serde_json::Error),

    /// Error returned by a caller-supplied hook, passed through untouched.
    #[error(transparent)]
    Hook(anyhow::Error),

    #[error("Server is shutting down")]
    ShuttingDown,
}

impl ResearchError {
    /// Unwrap the caller's own error when the stream was aborted by a hook.
    pub fn into_hook_error(self) -> Option<anyhow::Error> {
        match self {
            ResearchError::Hook(err) => Some(err),
            _ => None,
        }
    }
}

pub type ResearchResult<T> = Result<T, ResearchError>;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Environment variable '{env_var}' is required but not set.")]
    MissingEnvVar { env_var: String },

    #[error("Invalid value for environment variable '{env_var}': {reason}")]
    InvalidEnvVar { env_var: String, reason: String },

    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}
