// Error types for the registry client.
//
// Every non-2xx response is classified before it reaches a caller: either a
// structured `AppError` decoded from the backend, or a `ClientError` when the
// body is not one. Transport and decoding failures keep their own variants.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

use crate::normalize::{normalize, pretty_json, value_to_string};

// ── Backend error taxonomy ──────────────────────────────────────────

/// Classification the backend attaches to a business error.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::IntoStaticStr,
)]
pub enum ErrorKind {
    InternalError,
    DuplicateError,
    ValidationError,
    NotFoundError,
}

/// Payload of an [`AppError`]: a plain message or an arbitrary JSON document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorInfo {
    Text(String),
    Structured(Value),
}

impl ErrorInfo {
    /// Build from a JSON value, collapsing JSON strings into [`ErrorInfo::Text`].
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::String(text) => Self::Text(text),
            other => Self::Structured(other),
        }
    }

    /// Flatten every `{message, target}` fragment in the payload.
    pub fn normalized(&self) -> Self {
        match self {
            Self::Text(text) => Self::Text(text.clone()),
            Self::Structured(value) => Self::from_value(normalize(value)),
        }
    }
}

impl std::fmt::Display for ErrorInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Structured(value) => f.write_str(&value_to_string(value)),
        }
    }
}

impl From<&str> for ErrorInfo {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<String> for ErrorInfo {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<Value> for ErrorInfo {
    fn from(value: Value) -> Self {
        Self::from_value(value)
    }
}

/// Structured business error returned by the backend.
///
/// Wire shape: `{ "type": "ValidationError", "info": ... }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Error)]
#[error("{kind}: {info}")]
pub struct AppError {
    #[serde(rename = "type")]
    pub kind: ErrorKind,
    pub info: ErrorInfo,
}

impl AppError {
    pub fn new(kind: ErrorKind, info: impl Into<ErrorInfo>) -> Self {
        Self {
            kind,
            info: info.into(),
        }
    }

    /// Copy of this error with its `info` payload normalized for display.
    pub fn normalized(&self) -> Self {
        Self {
            kind: self.kind,
            info: self.info.normalized(),
        }
    }

    /// Two-part pane text: the error type as a heading, then the info body.
    pub fn render(&self) -> String {
        format!("{}\n{}", self.kind, self.info)
    }
}

/// Failure whose body could not be read as an [`AppError`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Error)]
#[error("{message}")]
pub struct ClientError {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<Value>,
}

impl ClientError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            info: None,
        }
    }

    pub fn with_info(message: impl Into<String>, info: Value) -> Self {
        Self {
            message: message.into(),
            info: Some(info),
        }
    }

    /// The message, followed by the normalized raw body when one was kept.
    pub fn render(&self) -> String {
        match &self.info {
            Some(info) => format!("{}\n{}", self.message, pretty_json(&normalize(info))),
            None => self.message.clone(),
        }
    }
}

// ── Crate error ─────────────────────────────────────────────────────

/// Top-level error type for the `vreg-api` crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Structured error decoded from a failed response.
    #[error(transparent)]
    App(#[from] AppError),

    /// Failed response whose body was not a structured error.
    #[error(transparent)]
    Client(#[from] ClientError),

    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or HTTP client construction error.
    #[error("TLS error: {0}")]
    Tls(String),

    /// A request body could not be encoded as JSON.
    #[error("Failed to encode request body: {0}")]
    Encode(#[from] serde_json::Error),

    /// A success body did not match the expected record, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// The structured backend error, if this is one.
    pub fn app_error(&self) -> Option<&AppError> {
        match self {
            Self::App(err) => Some(err),
            _ => None,
        }
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::App(err) => err.kind == ErrorKind::NotFoundError,
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            _ => false,
        }
    }
}

// ── Classification ──────────────────────────────────────────────────

const UNREADABLE_SERVER_ERROR: &str = "Fail to read server error.";

/// Classify the body of a failed (non-2xx) response.
///
/// A body that is not JSON yields a [`ClientError`] naming the status. A JSON
/// body that decodes as an [`AppError`] is returned with its info normalized;
/// any other JSON is kept as the `info` of a generic [`ClientError`].
pub fn classify_error(status: u16, body: &str) -> Error {
    let parsed: Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(e) => {
            warn!(status, error = %e, "failed to parse error response body");
            return ClientError::new(format!(
                "Fail to read response error with status {status}."
            ))
            .into();
        }
    };

    match AppError::deserialize(&parsed) {
        Ok(app) => app.normalized().into(),
        Err(_) => ClientError::with_info(UNREADABLE_SERVER_ERROR, parsed).into(),
    }
}
