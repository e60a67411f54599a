//! Command handlers, one module per entity.

pub mod config_cmd;
pub mod drivers;
pub mod logs;
pub mod util;
pub mod vehicles;

use vreg_core::Registry;

use crate::cli::{Command, GlobalOpts};
use crate::config::Settings;
use crate::error::CliError;

/// Route an entity command to its handler.
pub async fn dispatch(
    cmd: Command,
    registry: &Registry,
    settings: &Settings,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Vehicles(args) => {
            vehicles::handle(registry.vehicles(), args, settings, global).await
        }
        Command::Drivers(args) => drivers::handle(registry.drivers(), args, settings, global).await,
        Command::Logs(args) => logs::handle(registry, args, settings, global).await,
        Command::Config(_) | Command::Completions(_) => Err(CliError::Internal(
            "config and completions are handled before the registry is built".into(),
        )),
    }
}
