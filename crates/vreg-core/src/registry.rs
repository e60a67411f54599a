// ── Registry facade ──
//
// Owns one controller per entity type, all sharing a single HTTP client.
// The controllers are independent: nothing keeps vehicles, drivers, and logs
// consistent with one another.

use tokio::task::JoinHandle;
use vreg_api::{DriverService, ListQuery, RegistryClient, VehicleLogService, VehicleService};

use crate::config::RegistryConfig;
use crate::controller::EntityController;
use crate::error::CoreError;

/// Page fetched to populate the vehicle and driver pickers of the log form.
pub const LOG_FORM_LOOKUP_LIMIT: u32 = 100;
pub const LOG_FORM_LOOKUP_PAGE: u32 = 1;

pub type VehicleController = EntityController<VehicleService>;
pub type DriverController = EntityController<DriverService>;
pub type VehicleLogController = EntityController<VehicleLogService>;

/// Join handles for the lookups started by [`Registry::prepare_log_form`].
#[derive(Debug)]
pub struct LogFormLookups {
    pub vehicles: JoinHandle<()>,
    pub drivers: JoinHandle<()>,
}

impl LogFormLookups {
    /// Wait for both lookups to finish.
    pub async fn join(self) -> Result<(), CoreError> {
        let (vehicles, drivers) = (self.vehicles.await, self.drivers.await);
        vehicles?;
        drivers?;
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct Registry {
    vehicles: VehicleController,
    drivers: DriverController,
    logs: VehicleLogController,
}

impl Registry {
    /// Build the HTTP client from `config` and one controller per entity.
    pub fn new(config: &RegistryConfig) -> Result<Self, CoreError> {
        let client = RegistryClient::new(&config.base_url, &config.transport())?;
        Ok(Self::with_client(client))
    }

    pub fn with_client(client: RegistryClient) -> Self {
        Self {
            vehicles: EntityController::new(VehicleService::new(client.clone())),
            drivers: EntityController::new(DriverService::new(client.clone())),
            logs: EntityController::new(VehicleLogService::new(client)),
        }
    }

    pub fn vehicles(&self) -> &VehicleController {
        &self.vehicles
    }

    pub fn drivers(&self) -> &DriverController {
        &self.drivers
    }

    pub fn logs(&self) -> &VehicleLogController {
        &self.logs
    }

    /// Load the vehicles and drivers a new log entry can reference.
    ///
    /// Both lists are fetched through their own controllers, unsynchronized.
    pub fn prepare_log_form(&self) -> LogFormLookups {
        let lookup = || ListQuery::paged(LOG_FORM_LOOKUP_LIMIT, LOG_FORM_LOOKUP_PAGE);
        LogFormLookups {
            vehicles: self.vehicles.refresh(lookup()),
            drivers: self.drivers.refresh(lookup()),
        }
    }

    /// Dispose every controller.
    pub fn dispose(&self) {
        self.vehicles.dispose();
        self.drivers.dispose();
        self.logs.dispose();
    }
}
