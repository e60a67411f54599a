//! Vehicle command handlers.

use tabled::Tabled;
use vreg_core::VehicleController;
use vreg_core::vreg_api::{EntityService, Vehicle, VehicleUpdate};

use crate::cli::{GlobalOpts, VehiclesArgs, VehiclesCommand};
use crate::config::Settings;
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct VehicleRow {
    #[tabled(rename = "Number")]
    number: String,
    #[tabled(rename = "Brand")]
    brand: String,
    #[tabled(rename = "Model")]
    model: String,
}

impl From<&Vehicle> for VehicleRow {
    fn from(v: &Vehicle) -> Self {
        Self {
            number: v.number.clone(),
            brand: v.brand.clone(),
            model: v.model.clone(),
        }
    }
}

fn detail(v: &Vehicle) -> String {
    output::detail_lines(&[
        ("Number", v.number.clone()),
        ("Brand", v.brand.clone()),
        ("Model", v.model.clone()),
    ])
}

fn print_vehicle(v: &Vehicle, global: &GlobalOpts) -> Result<(), CliError> {
    let out = output::render_single(global.output, v, detail, |v| v.number.clone())?;
    output::print_output(&out, global.quiet);
    Ok(())
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    controller: &VehicleController,
    args: VehiclesArgs,
    settings: &Settings,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        VehiclesCommand::List(list) => {
            let handle = controller.refresh(util::list_query(&list, settings));
            util::settle(controller, handle, "list vehicles").await?;

            let vehicles = controller.items().to_vec();
            let out = output::render_list(
                global.output,
                &vehicles,
                |v| VehicleRow::from(v),
                |v| v.number.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        VehiclesCommand::Get { number } => {
            let vehicle =
                util::fetch(controller.service().get_by_id(&number), "get vehicle").await?;
            print_vehicle(&vehicle, global)
        }

        VehiclesCommand::Create {
            number,
            brand,
            model,
        } => {
            let handle = controller.create(Vehicle {
                number,
                brand,
                model,
            });
            util::settle(controller, handle, "create vehicle").await?;

            output::print_status("Vehicle created", global.quiet, global.color);
            if let Some(created) = controller.items().iter().next() {
                print_vehicle(created, global)?;
            }
            Ok(())
        }

        VehiclesCommand::Update {
            number,
            brand,
            model,
        } => {
            if brand.is_none() && model.is_none() {
                return Err(CliError::Validation {
                    field: "update".into(),
                    reason: "pass --brand and/or --model".into(),
                });
            }
            let current =
                util::fetch(controller.service().get_by_id(&number), "update vehicle").await?;
            let body = VehicleUpdate {
                brand: util::or_current(brand, &current.brand),
                model: util::or_current(model, &current.model),
            };

            let handle = controller.update(number, body);
            util::settle(controller, handle, "update vehicle").await?;
            output::print_status("Vehicle updated", global.quiet, global.color);
            Ok(())
        }

        VehiclesCommand::Delete { number } => {
            if !util::confirm(&format!("Delete vehicle '{number}'?"), global.yes)? {
                return Ok(());
            }
            let handle = controller.delete(number);
            util::settle(controller, handle, "delete vehicle").await?;
            output::print_status("Vehicle deleted", global.quiet, global.color);
            Ok(())
        }
    }
}
