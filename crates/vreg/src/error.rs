//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors. Backend errors
//! carry the normalized error pane as help text.

use miette::Diagnostic;
use thiserror::Error;

use vreg_config::ConfigError;
use vreg_core::CoreError;
use vreg_core::vreg_api::ErrorKind;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
    pub const VALIDATION: i32 = 9;
    pub const SERVER: i32 = 10;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to the registry at {url}")]
    #[diagnostic(
        code(vreg::connection_failed),
        help(
            "Check that the registry API is running and reachable.\n\
             Reason: {reason}\n\
             For self-signed development backends try --insecure (-k)."
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Request to the registry timed out")]
    #[diagnostic(
        code(vreg::timeout),
        help("Increase the timeout with --timeout or check the registry's responsiveness.")
    )]
    Timeout,

    // ── Backend errors ───────────────────────────────────────────────
    #[error("Could not {action}: not found")]
    #[diagnostic(code(vreg::not_found), help("{pane}"))]
    NotFound { action: String, pane: String },

    #[error("Could not {action}: already exists")]
    #[diagnostic(code(vreg::conflict), help("{pane}"))]
    Conflict { action: String, pane: String },

    #[error("Could not {action}: rejected by the registry")]
    #[diagnostic(code(vreg::rejected), help("{pane}"))]
    Rejected { action: String, pane: String },

    #[error("Could not {action}: registry error")]
    #[diagnostic(code(vreg::server_error), help("{pane}"))]
    Server { action: String, pane: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(vreg::validation))]
    Validation { field: String, reason: String },

    #[error("Invalid {entity} details")]
    #[diagnostic(code(vreg::invalid_form), help("{details}"))]
    InvalidForm { entity: String, details: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("No registry API hostname configured")]
    #[diagnostic(
        code(vreg::no_hostname),
        help(
            "Pass --api-hostname, set VREG_API_HOSTNAME, or run: vreg config init\n\
             Config file: {path}"
        )
    )]
    NoHostname { path: String },

    #[error(transparent)]
    #[diagnostic(code(vreg::config))]
    Config(ConfigError),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("'{action}' needs {what}")]
    #[diagnostic(
        code(vreg::input_required),
        help("Pass it as a flag when running non-interactively.")
    )]
    InputRequired { action: String, what: String },

    // ── IO / Serialization / Internal ────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render JSON: {0}")]
    #[diagnostic(code(vreg::json))]
    Json(#[from] serde_json::Error),

    #[error("Failed to render YAML: {0}")]
    #[diagnostic(code(vreg::yaml))]
    Yaml(#[from] serde_yaml::Error),

    #[error("Failed to render TOML: {0}")]
    #[diagnostic(code(vreg::toml))]
    Toml(#[from] toml::ser::Error),

    #[error("{0}")]
    #[diagnostic(code(vreg::internal))]
    Internal(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout => exit_code::TIMEOUT,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Conflict { .. } => exit_code::CONFLICT,
            Self::Rejected { .. } | Self::InvalidForm { .. } => exit_code::VALIDATION,
            Self::Server { .. } => exit_code::SERVER,
            Self::Validation { .. } | Self::InputRequired { .. } | Self::NoHostname { .. } => {
                exit_code::USAGE
            }
            _ => exit_code::GENERAL,
        }
    }

    /// Wrap a core failure, naming the attempted action ("create vehicle").
    pub fn from_core(err: CoreError, action: impl Into<String>) -> Self {
        let action = action.into();
        let pane = err.render();
        match err {
            CoreError::App(app) => match app.kind {
                ErrorKind::NotFoundError => CliError::NotFound { action, pane },
                ErrorKind::DuplicateError => CliError::Conflict { action, pane },
                ErrorKind::ValidationError => CliError::Rejected { action, pane },
                ErrorKind::InternalError => CliError::Server { action, pane },
            },
            CoreError::Client(_) => CliError::Server { action, pane },
            CoreError::ConnectionFailed { url, reason } => {
                CliError::ConnectionFailed { url, reason }
            }
            CoreError::Timeout => CliError::Timeout,
            CoreError::Config { message } => CliError::Validation {
                field: "configuration".into(),
                reason: message,
            },
            CoreError::Internal(message) => CliError::Internal(message),
        }
    }
}

// ── Conversions ──────────────────────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        Self::from_core(err, "complete the request")
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::MissingHostname => CliError::NoHostname {
                path: vreg_config::config_path().display().to_string(),
            },
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            other => CliError::Config(other),
        }
    }
}
