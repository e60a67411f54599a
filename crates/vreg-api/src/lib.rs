//! Async Rust client for the Vehicle Registry REST API.
//!
//! - **[`RegistryClient`]** owns the HTTP transport and base URL.
//! - **[`RestService<R>`]** implements [`EntityService`] for each
//!   [`Resource`]: [`VehicleService`], [`DriverService`],
//!   [`VehicleLogService`].
//! - **[`classify_error`]** turns failed responses into an [`AppError`] or a
//!   [`ClientError`]; [`normalize`] flattens nested `{message, target}`
//!   fragments for display.

pub mod body;
pub mod client;
pub mod error;
pub mod model;
pub mod normalize;
pub mod query;
pub mod service;
pub mod transport;

pub use client::RegistryClient;
pub use error::{AppError, ClientError, Error, ErrorInfo, ErrorKind, classify_error};
pub use model::{
    Driver, DriverField, DriverUpdate, DriverValidation, Entity, LogType, Resource, Vehicle,
    VehicleLog, VehicleLogCreate, VehicleLogFilter, VehicleLogUpdate, VehicleUpdate,
};
pub use normalize::{MessageOf, error_target, normalize, pretty_json, value_to_string};
pub use query::{ListQuery, QueryParams};
pub use service::{
    DriverService, EntityService, KeyOf, RestService, VehicleLogService, VehicleService,
};
pub use transport::{TlsMode, TransportConfig};
