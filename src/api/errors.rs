use thiserror::Error;

/// Failures observable when talking to the Calricula backend.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("network request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("request '{operation}' timed out after {duration_ms}ms")]
    Timeout { operation: String, duration_ms: u64 },

    #[error("server responded {status}: {message}")]
    Status { status: u16, message: String },

    #[error("unexpected response from {path}: {message}")]
    Decode { path: String, message: String },

    #[error("invalid path segment '{0}'")]
    InvalidSegment(String),

    #[error("client configuration error: {0}")]
    Config(String),
}

impl ApiError {
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: message.into(),
        }
    }

    /// Short text suitable for an error panel.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Transport(_) => "Could not reach the server.".to_string(),
            ApiError::Timeout { .. } => "The server took too long to respond.".to_string(),
            ApiError::Status { status: 401, .. } => "Your session has expired. Sign in again.".to_string(),
            ApiError::Status { status: 403, .. } => "You do not have access to this record.".to_string(),
            ApiError::Status { status: 404, .. } => "The record was not found.".to_string(),
            ApiError::Status { message, .. } => message.clone(),
            ApiError::Decode { .. } => "The server sent data this client does not understand.".to_string(),
            ApiError::InvalidSegment(_) => "The record id is not valid.".to_string(),
            ApiError::Config(message) => message.clone(),
        }
    }
}
