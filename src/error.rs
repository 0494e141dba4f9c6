use thiserror::Error;

use crate::validation::FieldErrors;

/// Text shown when a failure carries no usable message of its own.
pub const GENERIC_FAILURE: &str = "Something went wrong. Please try again.";

#[derive(Error, Debug)]
pub enum StewardError {
    #[error("not signed in. Run: steward login <username>")]
    NotAuthenticated,

    #[error("{0}")]
    Validation(FieldErrors),

    #[error("{0}")]
    Transport(String),

    #[error("request timed out after {0}s")]
    Timeout(u64),

    #[error("{0}")]
    NotFound(String),

    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("unexpected response: {0}")]
    MalformedResponse(String),

    #[error("failed to load list: {0}")]
    ListFailed(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("unknown record type '{0}', expected one of: departments, employees, owners, suppliers, assets")]
    UnknownEntity(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

impl StewardError {
    /// Message suitable for an inline error banner.
    ///
    /// Field-level validation errors come first (one `field: message` line
    /// each), then whatever the server said, then the transport message.
    pub fn user_message(&self) -> String {
        let message = match self {
            StewardError::Validation(fields) => fields.to_string(),
            StewardError::Server { message, .. } => message.clone(),
            StewardError::NotFound(message)
            | StewardError::Transport(message)
            | StewardError::ListFailed(message) => message.clone(),
            StewardError::Http(source) => source.to_string(),
            other => other.to_string(),
        };

        if message.trim().is_empty() {
            GENERIC_FAILURE.to_string()
        } else {
            message
        }
    }

    /// Whether this failure is a client-side or server-side field validation failure.
    pub fn is_validation(&self) -> bool {
        matches!(self, StewardError::Validation(_))
    }
}

pub type Result<T> = std::result::Result<T, StewardError>;
