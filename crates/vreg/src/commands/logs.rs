//! Vehicle log command handlers.

use tabled::Tabled;
use vreg_core::vreg_api::{
    EntityService, ListQuery, VehicleLog, VehicleLogCreate, VehicleLogFilter, VehicleLogUpdate,
};
use vreg_core::{Registry, VehicleLogController};

use crate::cli::{GlobalOpts, ListArgs, LogsArgs, LogsCommand};
use crate::config::Settings;
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct LogRow {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "Vehicle")]
    vehicle: String,
    #[tabled(rename = "Driver")]
    driver: String,
    #[tabled(rename = "Type")]
    log_type: String,
    #[tabled(rename = "Timestamp")]
    timestamp: String,
    #[tabled(rename = "Mileage")]
    mileage: String,
}

impl From<&VehicleLog> for LogRow {
    fn from(log: &VehicleLog) -> Self {
        Self {
            id: log.id,
            vehicle: log.vehicle.number.clone(),
            driver: log.driver.full_name(),
            log_type: log.log_type.to_string(),
            timestamp: format_timestamp(log),
            mileage: format_mileage(log.mileage_in_kilometers),
        }
    }
}

fn format_timestamp(log: &VehicleLog) -> String {
    log.timestamp.format("%Y-%m-%d %H:%M UTC").to_string()
}

fn format_mileage(km: f64) -> String {
    format!("{km:.1} km")
}

fn detail(log: &VehicleLog) -> String {
    output::detail_lines(&[
        ("ID", log.id.to_string()),
        (
            "Vehicle",
            format!(
                "{} ({} {})",
                log.vehicle.number, log.vehicle.brand, log.vehicle.model
            ),
        ),
        (
            "Driver",
            format!("{} ({})", log.driver.full_name(), log.driver.license_id),
        ),
        ("Type", log.log_type.to_string()),
        ("Timestamp", format_timestamp(log)),
        ("Mileage", format_mileage(log.mileage_in_kilometers)),
    ])
}

fn print_log(log: &VehicleLog, global: &GlobalOpts) -> Result<(), CliError> {
    let out = output::render_single(global.output, log, detail, |l| l.id.to_string())?;
    output::print_output(&out, global.quiet);
    Ok(())
}

fn log_query(
    list: &ListArgs,
    settings: &Settings,
    filter: VehicleLogFilter,
) -> ListQuery<VehicleLogFilter> {
    let query = util::list_query(list, settings);
    if filter.is_empty() {
        query
    } else {
        query.with_filter(filter)
    }
}

// ── Log form lookups ────────────────────────────────────────────────

/// Resolve the vehicle and driver for a new log, prompting for any not given.
async fn resolve_references(
    registry: &Registry,
    vehicle_number: Option<String>,
    driver_license_id: Option<String>,
) -> Result<(String, String), CliError> {
    if let (Some(vehicle), Some(driver)) = (&vehicle_number, &driver_license_id) {
        return Ok((vehicle.clone(), driver.clone()));
    }
    if !util::is_interactive() {
        return Err(CliError::InputRequired {
            action: "logs create".into(),
            what: "--vehicle-number and --driver-license-id".into(),
        });
    }

    registry.prepare_log_form().join().await?;
    util::outcome(registry.vehicles(), "load vehicles")?;
    util::outcome(registry.drivers(), "load drivers")?;

    let vehicle = match vehicle_number {
        Some(number) => number,
        None => {
            let vehicles = registry.vehicles().items().to_vec();
            if vehicles.is_empty() {
                return Err(CliError::Validation {
                    field: "vehicle".into(),
                    reason: "no vehicles are registered".into(),
                });
            }
            let labels: Vec<String> = vehicles
                .iter()
                .map(|v| format!("{}  {} {}", v.number, v.brand, v.model))
                .collect();
            let picked = util::select("Vehicle", &labels)?;
            vehicles
                .get(picked)
                .map(|v| v.number.clone())
                .ok_or_else(|| CliError::Internal("vehicle selection out of range".into()))?
        }
    };

    let driver = match driver_license_id {
        Some(license_id) => license_id,
        None => {
            let drivers = registry.drivers().items().to_vec();
            if drivers.is_empty() {
                return Err(CliError::Validation {
                    field: "driver".into(),
                    reason: "no drivers are registered".into(),
                });
            }
            let labels: Vec<String> = drivers
                .iter()
                .map(|d| format!("{}  {}", d.license_id, d.full_name()))
                .collect();
            let picked = util::select("Driver", &labels)?;
            drivers
                .get(picked)
                .map(|d| d.license_id.clone())
                .ok_or_else(|| CliError::Internal("driver selection out of range".into()))?
        }
    };

    Ok((vehicle, driver))
}

// ── Handler ─────────────────────────────────────────────────────────

#[allow(clippy::too_many_lines)]
pub async fn handle(
    registry: &Registry,
    args: LogsArgs,
    settings: &Settings,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let controller: &VehicleLogController = registry.logs();

    match args.command {
        LogsCommand::List {
            list,
            vehicle_number,
            driver_license_id,
            date,
        } => {
            let filter = VehicleLogFilter {
                vehicle_number,
                driver_license_id,
                date,
            };
            let handle = controller.refresh(log_query(&list, settings, filter));
            util::settle(controller, handle, "list vehicle logs").await?;

            let logs = controller.items().to_vec();
            let out = output::render_list(
                global.output,
                &logs,
                |l| LogRow::from(l),
                |l| l.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        LogsCommand::Get { id } => {
            let log = util::fetch(controller.service().get_by_id(&id), "get vehicle log").await?;
            print_log(&log, global)
        }

        LogsCommand::Create {
            vehicle_number,
            driver_license_id,
            log_type,
            mileage,
        } => {
            if mileage < 0.0 {
                return Err(CliError::Validation {
                    field: "mileage".into(),
                    reason: "must not be negative".into(),
                });
            }
            let (vehicle_number, driver_license_id) =
                resolve_references(registry, vehicle_number, driver_license_id).await?;

            let handle = controller.create(VehicleLogCreate {
                vehicle_number,
                driver_license_id,
                log_type,
                mileage_in_kilometers: mileage,
            });
            util::settle(controller, handle, "create vehicle log").await?;

            output::print_status("Vehicle log created", global.quiet, global.color);
            if let Some(created) = controller.items().iter().next() {
                print_log(created, global)?;
            }
            Ok(())
        }

        LogsCommand::Update {
            id,
            log_type,
            mileage,
        } => {
            if log_type.is_none() && mileage.is_none() {
                return Err(CliError::Validation {
                    field: "update".into(),
                    reason: "pass --log-type and/or --mileage".into(),
                });
            }
            let current =
                util::fetch(controller.service().get_by_id(&id), "update vehicle log").await?;
            let body = VehicleLogUpdate {
                log_type: log_type.unwrap_or(current.log_type),
                mileage_in_kilometers: mileage.unwrap_or(current.mileage_in_kilometers),
            };

            let handle = controller.update(id, body);
            util::settle(controller, handle, "update vehicle log").await?;
            output::print_status("Vehicle log updated", global.quiet, global.color);
            Ok(())
        }

        LogsCommand::Delete { id } => {
            if !util::confirm(&format!("Delete vehicle log {id}?"), global.yes)? {
                return Ok(());
            }
            let handle = controller.delete(id);
            util::settle(controller, handle, "delete vehicle log").await?;
            output::print_status("Vehicle log deleted", global.quiet, global.color);
            Ok(())
        }
    }
}
