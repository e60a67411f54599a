//! Configuration for the vreg client.
//!
//! A TOML file layered with `VREG_*` environment variables (and the legacy
//! `API_HOSTNAME` variable), translated into `vreg_core::RegistryConfig`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use vreg_core::{RegistryConfig, TlsVerification};

/// Legacy variable naming the backend host, honoured when nothing else does.
pub const LEGACY_HOSTNAME_ENV: &str = "API_HOSTNAME";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no API hostname configured (set api_hostname, VREG_API_HOSTNAME, or API_HOSTNAME)")]
    MissingHostname,

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── Settings ────────────────────────────────────────────────────────

/// On-disk settings (`config.toml`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Settings {
    /// Backend host, optionally with a port (e.g. `registry.example.com`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_hostname: Option<String>,

    /// `https` unless talking to a local development backend.
    #[serde(default = "default_scheme")]
    pub scheme: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Accept invalid TLS certificates.
    #[serde(default)]
    pub insecure: bool,

    /// Path to a custom CA certificate (PEM).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca_cert: Option<PathBuf>,

    /// Default `limit` for list commands.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_hostname: None,
            scheme: default_scheme(),
            timeout: default_timeout(),
            insecure: false,
            ca_cert: None,
            page_size: None,
        }
    }
}

fn default_scheme() -> String {
    "https".into()
}
fn default_timeout() -> u64 {
    30
}

impl Settings {
    /// Validate and build the runtime configuration.
    pub fn to_registry_config(&self) -> Result<RegistryConfig, ConfigError> {
        let hostname = self
            .api_hostname
            .as_deref()
            .map(str::trim)
            .filter(|h| !h.is_empty())
            .ok_or(ConfigError::MissingHostname)?;

        if !matches!(self.scheme.as_str(), "http" | "https") {
            return Err(ConfigError::Validation {
                field: "scheme".into(),
                reason: format!("expected 'http' or 'https', got '{}'", self.scheme),
            });
        }

        if self.timeout == 0 {
            return Err(ConfigError::Validation {
                field: "timeout".into(),
                reason: "must be at least 1 second".into(),
            });
        }

        let raw = format!("{}://{hostname}", self.scheme);
        let base_url = Url::parse(&raw).map_err(|e| ConfigError::Validation {
            field: "api_hostname".into(),
            reason: format!("'{hostname}' does not form a valid URL: {e}"),
        })?;

        let tls = if self.insecure {
            TlsVerification::DangerAcceptInvalid
        } else if let Some(ref ca_path) = self.ca_cert {
            TlsVerification::CustomCa(ca_path.clone())
        } else {
            TlsVerification::SystemDefaults
        };

        Ok(RegistryConfig {
            base_url,
            tls,
            timeout: Duration::from_secs(self.timeout),
        })
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("", "", "vreg").map_or_else(
        || {
            let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
            p.push(".config");
            p.push("vreg");
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

// ── Loading ─────────────────────────────────────────────────────────

/// Defaults < TOML file < `VREG_*` env; `API_HOSTNAME` only fills a gap.
pub fn figment_for(path: &Path) -> Figment {
    Figment::new()
        .merge(Serialized::defaults(Settings::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("VREG_"))
        .join(Env::raw().only(&[LEGACY_HOSTNAME_ENV]))
}

/// Load settings from the canonical config path + environment.
pub fn load_settings() -> Result<Settings, ConfigError> {
    load_settings_from(&config_path())
}

/// Load settings from `path` + environment. A missing file is not an error.
pub fn load_settings_from(path: &Path) -> Result<Settings, ConfigError> {
    Ok(figment_for(path).extract()?)
}

// ── Saving ──────────────────────────────────────────────────────────

/// Serialize settings to TOML at the canonical config path.
pub fn save_settings(settings: &Settings) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_settings_to(&path, settings)?;
    Ok(path)
}

pub fn save_settings_to(path: &Path, settings: &Settings) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(settings)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}
