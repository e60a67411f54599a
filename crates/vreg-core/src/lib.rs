//! Reactive state for the Vehicle Registry client.
//!
//! Each backend collection gets an [`EntityController`]: an ordered,
//! key-unique item list plus a [`LoadingState`], both observable through
//! `tokio::sync::watch`. Operations are fire-and-forget; callers watch the
//! state or await the returned `JoinHandle`.
//!
//! [`Registry`] bundles the vehicle, driver, and vehicle log controllers
//! over one [`vreg_api::RegistryClient`] built from a [`RegistryConfig`].

pub mod config;
pub mod controller;
pub mod error;
pub mod loading;
pub mod registry;
pub mod store;

pub use config::{RegistryConfig, TlsVerification};
pub use controller::EntityController;
pub use error::CoreError;
pub use loading::LoadingState;
pub use registry::{
    DriverController, LOG_FORM_LOOKUP_LIMIT, LOG_FORM_LOOKUP_PAGE, LogFormLookups, Registry,
    VehicleController, VehicleLogController,
};
pub use store::{EntityList, EntitySnapshot};

// Re-export the API crate so presentations need a single dependency.
pub use vreg_api;
