//! Decoding of failed responses into [`StewardError`].
//!
//! Error bodies are JSON objects that may carry any of `message`, `title`
//! or a structured `errors` map (field -> string or list of strings). None
//! of these are guaranteed; a body that is not JSON at all is tolerated.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

use crate::error::StewardError;
use crate::validation::FieldErrors;

#[derive(Debug, Default)]
struct ErrorBody {
    message: Option<String>,
    title: Option<String>,
    errors: BTreeMap<String, FieldMessages>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FieldMessages {
    One(String),
    Many(Vec<String>),
}

impl ErrorBody {
    /// Decode each part on its own, so a malformed `errors` entry does not
    /// cost the `title` or `message`.
    fn parse(body: &str) -> Self {
        let Ok(Value::Object(mut object)) = serde_json::from_str::<Value>(body) else {
            return Self::default();
        };

        let mut text = |key: &str| match object.remove(key) {
            Some(Value::String(text)) => Some(text),
            _ => None,
        };
        let message = text("message");
        let title = text("title");

        let errors = match object.remove("errors") {
            Some(Value::Object(fields)) => fields
                .into_iter()
                .filter_map(|(field, value)| {
                    match serde_json::from_value::<FieldMessages>(value) {
                        Ok(messages) => Some((field, messages)),
                        Err(_) => {
                            tracing::debug!(field = %field, "ignoring malformed field error");
                            None
                        }
                    }
                })
                .collect(),
            _ => BTreeMap::new(),
        };

        Self {
            message,
            title,
            errors,
        }
    }

    fn field_errors(&self) -> FieldErrors {
        let mut fields = FieldErrors::new();
        for (field, messages) in &self.errors {
            match messages {
                FieldMessages::One(message) => fields.add(field.as_str(), message.as_str()),
                FieldMessages::Many(list) => {
                    for message in list {
                        fields.add(field.as_str(), message.as_str());
                    }
                }
            }
        }
        fields
    }

    /// `title` first, then `message`; blank strings do not count.
    fn summary(&self) -> Option<String> {
        [self.title.as_deref(), self.message.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|text| !text.is_empty())
            .map(str::to_string)
    }
}

/// Build the error for a non-2xx response.
pub fn error_from_response(status: reqwest::StatusCode, body: &str) -> StewardError {
    let parsed = ErrorBody::parse(body);

    let fields = parsed.field_errors();
    if !fields.is_empty() {
        return StewardError::Validation(fields);
    }

    let summary = parsed.summary();
    if status == reqwest::StatusCode::NOT_FOUND {
        return StewardError::NotFound(summary.unwrap_or_else(|| "record not found".to_string()));
    }

    StewardError::Server {
        status: status.as_u16(),
        message: summary
            .unwrap_or_else(|| format!("Request failed with status {}", status.as_u16())),
    }
}

/// Map a reqwest transport failure, keeping timeouts distinguishable.
pub fn transport_error(error: reqwest::Error, timeout_secs: u64) -> StewardError {
    if error.is_timeout() {
        StewardError::Timeout(timeout_secs)
    } else if error.is_decode() {
        StewardError::MalformedResponse(error.to_string())
    } else {
        StewardError::Transport(error.to_string())
    }
}
