use serde::{Deserialize, Serialize};

use super::{Entity, Resource};

/// A registered vehicle, keyed by its plate number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    pub number: String,
    pub brand: String,
    pub model: String,
}

/// Mutable vehicle fields; the number addresses the record and is not sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleUpdate {
    pub brand: String,
    pub model: String,
}

impl From<&Vehicle> for VehicleUpdate {
    fn from(v: &Vehicle) -> Self {
        Self {
            brand: v.brand.clone(),
            model: v.model.clone(),
        }
    }
}

impl Entity for Vehicle {
    type Key = String;

    const SINGULAR: &'static str = "vehicle";
    const PLURAL: &'static str = "vehicles";

    fn key(&self) -> String {
        self.number.clone()
    }
}

impl Resource for Vehicle {
    const PATH: &'static str = "vehicles";

    type Create = Vehicle;
    type Update = VehicleUpdate;
    type Filter = ();
}
