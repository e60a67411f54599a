//! Shared helpers for command handlers.

use std::future::Future;
use std::io::IsTerminal;

use tokio::task::JoinHandle;
use vreg_core::vreg_api::{self, EntityService, ListQuery};
use vreg_core::{CoreError, EntityController, LoadingState};

use crate::cli::ListArgs;
use crate::config::Settings;
use crate::error::CliError;

/// Pagination from `--limit` / `--page`, falling back to the configured page size.
pub fn list_query<F>(args: &ListArgs, settings: &Settings) -> ListQuery<F> {
    ListQuery::new()
        .with_limit(args.limit.or(settings.page_size))
        .with_page(args.page)
}

/// Wait for a controller operation and surface a recorded error.
pub async fn settle<S: EntityService>(
    controller: &EntityController<S>,
    handle: JoinHandle<()>,
    action: &str,
) -> Result<(), CliError> {
    handle.await.map_err(CoreError::from)?;
    outcome(controller, action)
}

/// Turn the controller's current `LoadingState::Error` into a `CliError`.
pub fn outcome<S: EntityService>(
    controller: &EntityController<S>,
    action: &str,
) -> Result<(), CliError> {
    match controller.loading() {
        LoadingState::Error(err) => {
            controller.dismiss_error();
            Err(CliError::from_core(err, action))
        }
        LoadingState::Idle | LoadingState::Loading(_) => Ok(()),
    }
}

/// Run a direct service call (single-record reads).
pub async fn fetch<T>(
    call: impl Future<Output = Result<T, vreg_api::Error>>,
    action: &str,
) -> Result<T, CliError> {
    call.await
        .map_err(|e| CliError::from_core(CoreError::from(e), action))
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::InputRequired {
            action: message.into(),
            what: "confirmation (--yes)".into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// Pick one of `items` interactively.
pub fn select(prompt: &str, items: &[String]) -> Result<usize, CliError> {
    dialoguer::Select::new()
        .with_prompt(prompt)
        .items(items)
        .default(0)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))
}

pub fn is_interactive() -> bool {
    std::io::stdin().is_terminal()
}

/// A flag value if given, else the record's current value.
pub fn or_current(value: Option<String>, current: &str) -> String {
    value.unwrap_or_else(|| current.to_owned())
}

/// Like [`or_current`] for optional fields.
pub fn or_current_opt(value: Option<String>, current: Option<&str>) -> Option<String> {
    value.or_else(|| current.map(str::to_owned))
}
