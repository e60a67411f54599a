// ── Registry records ──
//
// Wire types for the three resources the backend exposes. Every record names
// its natural key and the REST path it lives under, which is all the generic
// service and controller layers need to know about it.

pub mod driver;
pub mod vehicle;
pub mod vehicle_log;

use std::fmt;
use std::hash::Hash;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::query::QueryParams;

pub use driver::{Driver, DriverField, DriverUpdate, DriverValidation};
pub use vehicle::{Vehicle, VehicleUpdate};
pub use vehicle_log::{LogType, VehicleLog, VehicleLogCreate, VehicleLogFilter, VehicleLogUpdate};

/// A record with a natural key, as stored by the backend.
pub trait Entity: Clone + fmt::Debug + Send + Sync + 'static {
    type Key: Clone + Eq + Hash + fmt::Display + fmt::Debug + Send + Sync + 'static;

    /// Lower-case singular name used in status messages ("vehicle log").
    const SINGULAR: &'static str;
    /// Lower-case plural name used in status messages ("vehicle logs").
    const PLURAL: &'static str;

    fn key(&self) -> Self::Key;
}

/// An [`Entity`] served by a REST collection at `/{PATH}`.
pub trait Resource: Entity + Serialize + DeserializeOwned {
    const PATH: &'static str;

    type Create: Serialize + Send + Sync + 'static;
    type Update: Serialize + Send + Sync + 'static;
    type Filter: QueryParams + Send + Sync + 'static;
}
