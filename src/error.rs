//! Common error type and result alias.
//!
//! Every client call returns `AppResult<T>`; nothing is swallowed. Use
//! [`AppError::kind`] to branch on the failure class without matching payloads.
use thiserror::Error;

pub type AppResult<T> = std::result::Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid {field}: {message}")]
    Validation { field: &'static str, message: String },

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Apiframe API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Invalid JSON in response: {0}")]
    Json(#[from] serde_json::Error),
}

/// Coarse failure class of an [`AppError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Config,
    Validation,
    Transport,
    Api,
    Decode,
}

impl AppError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        AppError::Validation { field, message: message.into() }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Config(_) => ErrorKind::Config,
            AppError::Validation { .. } => ErrorKind::Validation,
            AppError::Http(_) => ErrorKind::Transport,
            AppError::Api { .. } => ErrorKind::Api,
            AppError::Json(_) => ErrorKind::Decode,
        }
    }

    /// The remote service's message for `Api` errors, the display text otherwise.
    pub fn message(&self) -> String {
        match self {
            AppError::Api { message, .. } => message.clone(),
            AppError::Validation { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}
