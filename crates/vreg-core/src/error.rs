// ── Core error types ──
//
// What a controller records in `LoadingState::Error`. Backend errors keep
// their classified shape; transport failures are reduced to connection,
// timeout, or configuration problems. Everything else is stringified.

use thiserror::Error;
use vreg_api::{AppError, ClientError};

/// Unified error type for the core crate.
///
/// `Clone + PartialEq` so it can be published through a `watch` channel and
/// compared in tests.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    // ── Backend errors ───────────────────────────────────────────────
    /// Structured business error (duplicate, validation, not found, internal).
    #[error(transparent)]
    App(AppError),

    /// Failed response whose body was not a structured error.
    #[error(transparent)]
    Client(ClientError),

    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to registry at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Registry request timed out")]
    Timeout,

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub fn app_error(&self) -> Option<&AppError> {
        match self {
            Self::App(err) => Some(err),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.app_error()
            .is_some_and(|err| err.kind == vreg_api::ErrorKind::NotFoundError)
    }

    /// Text for an error pane: a heading line followed by the details.
    pub fn render(&self) -> String {
        match self {
            Self::App(err) => err.render(),
            Self::Client(err) => err.render(),
            other => other.to_string(),
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<vreg_api::Error> for CoreError {
    fn from(err: vreg_api::Error) -> Self {
        match err {
            vreg_api::Error::App(app) => CoreError::App(app),
            vreg_api::Error::Client(client) => CoreError::Client(client),
            vreg_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Internal(err.to_string())
                }
            }
            vreg_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("invalid registry URL: {e}"),
            },
            vreg_api::Error::Tls(message) => CoreError::Config { message },
            other @ (vreg_api::Error::Encode(_) | vreg_api::Error::Deserialization { .. }) => {
                CoreError::Internal(other.to_string())
            }
        }
    }
}

impl From<tokio::task::JoinError> for CoreError {
    fn from(err: tokio::task::JoinError) -> Self {
        CoreError::Internal(format!("background task failed: {err}"))
    }
}
