//! Config subcommand handlers.

use dialoguer::{Confirm, Input};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Settings};
use crate::error::CliError;
use crate::output;

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), global.quiet);
            Ok(())
        }

        ConfigCommand::Show => {
            let settings = config::resolve_settings(global)?;
            let out = toml::to_string_pretty(&settings)?;
            output::print_output(out.trim_end(), global.quiet);
            Ok(())
        }

        ConfigCommand::Init => {
            let config_path = config::config_path();
            eprintln!("vreg configuration");
            eprintln!("   Config path: {}\n", config_path.display());

            let settings = match global.api_hostname.clone() {
                // Non-interactive: take the flags as given.
                Some(hostname) => {
                    let mut settings = Settings {
                        api_hostname: Some(hostname),
                        ..Settings::default()
                    };
                    config::apply_overrides(&mut settings, global);
                    settings
                }
                None => prompt_settings(global)?,
            };

            // Refuse to save something that cannot be used.
            config::registry_config(&settings)?;

            let path = config::save_settings(&settings)?;
            output::print_status(
                &format!("Configuration saved to {}", path.display()),
                global.quiet,
                global.color,
            );
            Ok(())
        }
    }
}

fn prompt_settings(global: &GlobalOpts) -> Result<Settings, CliError> {
    if !crate::commands::util::is_interactive() {
        return Err(CliError::InputRequired {
            action: "config init".into(),
            what: "--api-hostname".into(),
        });
    }

    let defaults = Settings::default();

    let api_hostname: String = Input::new()
        .with_prompt("Registry API hostname (host[:port])")
        .interact_text()
        .map_err(prompt_err)?;

    let use_https = Confirm::new()
        .with_prompt("Use HTTPS?")
        .default(true)
        .interact()
        .map_err(prompt_err)?;

    let timeout: u64 = Input::new()
        .with_prompt("Request timeout (seconds)")
        .default(global.timeout.unwrap_or(defaults.timeout))
        .interact_text()
        .map_err(prompt_err)?;

    Ok(Settings {
        api_hostname: Some(api_hostname.trim().to_owned()),
        scheme: if use_https { "https" } else { "http" }.into(),
        timeout,
        insecure: global.insecure,
        ..defaults
    })
}
