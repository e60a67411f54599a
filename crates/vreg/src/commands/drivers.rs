//! Driver command handlers.

use std::fmt::Write as _;

use tabled::Tabled;
use vreg_core::DriverController;
use vreg_core::vreg_api::{Driver, DriverUpdate, EntityService};

use crate::cli::{DriversArgs, DriversCommand, GlobalOpts};
use crate::config::Settings;
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct DriverRow {
    #[tabled(rename = "License ID")]
    license_id: String,
    #[tabled(rename = "Name")]
    name: String,
}

impl From<&Driver> for DriverRow {
    fn from(d: &Driver) -> Self {
        Self {
            license_id: d.license_id.clone(),
            name: d.full_name(),
        }
    }
}

fn detail(d: &Driver) -> String {
    output::detail_lines(&[
        ("License ID", d.license_id.clone()),
        ("First name", d.first_name.clone()),
        ("Second name", d.second_name.clone().unwrap_or_default()),
        ("Surname", d.surname.clone()),
        ("Second surname", d.second_surname.clone().unwrap_or_default()),
    ])
}

fn print_driver(d: &Driver, global: &GlobalOpts) -> Result<(), CliError> {
    let out = output::render_single(global.output, d, detail, |d| d.license_id.clone())?;
    output::print_output(&out, global.quiet);
    Ok(())
}

/// Run the driver form checks; every failing field is listed.
fn validate(driver: &Driver) -> Result<(), CliError> {
    let validation = driver.validate();
    if validation.is_valid() {
        return Ok(());
    }
    let mut details = String::new();
    for (field, message) in validation.iter() {
        let _ = writeln!(details, "{field}: {message}");
    }
    Err(CliError::InvalidForm {
        entity: "driver".into(),
        details: details.trim_end().to_owned(),
    })
}

/// Treat a blank optional name as "not given".
fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

// ── Handler ─────────────────────────────────────────────────────────

#[allow(clippy::too_many_lines)]
pub async fn handle(
    controller: &DriverController,
    args: DriversArgs,
    settings: &Settings,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        DriversCommand::List(list) => {
            let handle = controller.refresh(util::list_query(&list, settings));
            util::settle(controller, handle, "list drivers").await?;

            let drivers = controller.items().to_vec();
            let out = output::render_list(
                global.output,
                &drivers,
                |d| DriverRow::from(d),
                |d| d.license_id.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DriversCommand::Get { license_id } => {
            let driver =
                util::fetch(controller.service().get_by_id(&license_id), "get driver").await?;
            print_driver(&driver, global)
        }

        DriversCommand::Create { license_id, names } => {
            let driver = Driver {
                license_id,
                first_name: names.first_name,
                second_name: non_blank(names.second_name),
                surname: names.surname,
                second_surname: non_blank(names.second_surname),
            };
            validate(&driver)?;

            let handle = controller.create(driver);
            util::settle(controller, handle, "create driver").await?;

            output::print_status("Driver created", global.quiet, global.color);
            if let Some(created) = controller.items().iter().next() {
                print_driver(created, global)?;
            }
            Ok(())
        }

        DriversCommand::Update {
            license_id,
            first_name,
            second_name,
            surname,
            second_surname,
        } => {
            if first_name.is_none()
                && second_name.is_none()
                && surname.is_none()
                && second_surname.is_none()
            {
                return Err(CliError::Validation {
                    field: "update".into(),
                    reason: "pass at least one name to change".into(),
                });
            }
            let current =
                util::fetch(controller.service().get_by_id(&license_id), "update driver").await?;
            let body = DriverUpdate {
                first_name: util::or_current(first_name, &current.first_name),
                second_name: util::or_current_opt(second_name, current.second_name.as_deref()),
                surname: util::or_current(surname, &current.surname),
                second_surname: util::or_current_opt(
                    second_surname,
                    current.second_surname.as_deref(),
                ),
            };
            validate(&Driver {
                license_id: license_id.clone(),
                first_name: body.first_name.clone(),
                second_name: body.second_name.clone(),
                surname: body.surname.clone(),
                second_surname: body.second_surname.clone(),
            })?;

            let handle = controller.update(license_id, body);
            util::settle(controller, handle, "update driver").await?;
            output::print_status("Driver updated", global.quiet, global.color);
            Ok(())
        }

        DriversCommand::Delete { license_id } => {
            if !util::confirm(&format!("Delete driver '{license_id}'?"), global.yes)? {
                return Ok(());
            }
            let handle = controller.delete(license_id);
            util::settle(controller, handle, "delete driver").await?;
            output::print_status("Driver deleted", global.quiet, global.color);
            Ok(())
        }
    }
}
