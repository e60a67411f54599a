//! CLI configuration: thin wrapper around `vreg_config`.
//!
//! Adds `GlobalOpts` flag overrides (--api-hostname, --timeout, --insecure)
//! on top of the file + environment settings.

use vreg_core::RegistryConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub use vreg_config::{Settings, config_path, load_settings, save_settings};

/// Load settings and apply CLI flag overrides.
pub fn resolve_settings(global: &GlobalOpts) -> Result<Settings, CliError> {
    let mut settings = load_settings()?;
    apply_overrides(&mut settings, global);
    Ok(settings)
}

/// Flags take priority over the file and environment.
pub fn apply_overrides(settings: &mut Settings, global: &GlobalOpts) {
    if let Some(ref hostname) = global.api_hostname {
        settings.api_hostname = Some(hostname.clone());
    }
    if let Some(timeout) = global.timeout {
        settings.timeout = timeout;
    }
    if global.insecure {
        settings.insecure = true;
    }
}

pub fn registry_config(settings: &Settings) -> Result<RegistryConfig, CliError> {
    Ok(settings.to_registry_config()?)
}
