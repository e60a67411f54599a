use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{Driver, Entity, Resource, Vehicle};
use crate::query::{QueryParams, push_defined};

/// Direction of a vehicle movement.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LogType {
    Entry,
    Exit,
}

/// One entry or exit of a vehicle, as recorded by the backend.
///
/// The timestamp travels as an RFC 3339 string and is parsed on decode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleLog {
    pub id: u64,
    pub vehicle: Vehicle,
    pub driver: Driver,
    pub log_type: LogType,
    pub timestamp: DateTime<Utc>,
    pub mileage_in_kilometers: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleLogCreate {
    pub vehicle_number: String,
    pub driver_license_id: String,
    pub log_type: LogType,
    pub mileage_in_kilometers: f64,
}

/// Mutable log fields; the log ID addresses the record and is not sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleLogUpdate {
    pub log_type: LogType,
    pub mileage_in_kilometers: f64,
}

impl From<&VehicleLog> for VehicleLogUpdate {
    fn from(log: &VehicleLog) -> Self {
        Self {
            log_type: log.log_type,
            mileage_in_kilometers: log.mileage_in_kilometers,
        }
    }
}

/// Narrow a log listing by vehicle, driver, and/or calendar day.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VehicleLogFilter {
    pub vehicle_number: Option<String>,
    pub driver_license_id: Option<String>,
    pub date: Option<NaiveDate>,
}

impl VehicleLogFilter {
    pub fn is_empty(&self) -> bool {
        self.vehicle_number.is_none() && self.driver_license_id.is_none() && self.date.is_none()
    }
}

impl QueryParams for VehicleLogFilter {
    fn append_to(&self, params: &mut Vec<(&'static str, String)>) {
        push_defined(params, "vehicle-number", self.vehicle_number.as_deref());
        push_defined(params, "driver-license-id", self.driver_license_id.as_deref());
        if let Some(date) = self.date {
            params.push(("date", date.format("%Y-%m-%d").to_string()));
        }
    }
}

impl Entity for VehicleLog {
    type Key = u64;

    const SINGULAR: &'static str = "vehicle log";
    const PLURAL: &'static str = "vehicle logs";

    fn key(&self) -> u64 {
        self.id
    }
}

impl Resource for VehicleLog {
    const PATH: &'static str = "logs";

    type Create = VehicleLogCreate;
    type Update = VehicleLogUpdate;
    type Filter = VehicleLogFilter;
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{Datelike, Timelike};
    use serde_json::json;

    use super::*;
    use crate::query::ListQuery;

    #[test]
    fn decodes_timestamp_string() {
        let raw = json!({
            "id": 7,
            "vehicle": { "number": "HND-1024", "brand": "Toyota", "model": "Hilux" },
            "driver": { "licenseId": "0801-1990", "firstName": "Ana", "surname": "Lopez" },
            "logType": "entry",
            "timestamp": "2024-06-15T10:30:00Z",
            "mileageInKilometers": 15234.5
        });

        let log: VehicleLog = serde_json::from_value(raw).unwrap();

        assert_eq!(log.key(), 7);
        assert_eq!(log.log_type, LogType::Entry);
        assert_eq!(log.timestamp.year(), 2024);
        assert_eq!(log.timestamp.hour(), 10);
        assert_eq!(log.driver.second_name, None);
    }

    #[test]
    fn filter_params_use_wire_names() {
        let filter = VehicleLogFilter {
            vehicle_number: Some("HND-1024".into()),
            driver_license_id: None,
            date: NaiveDate::from_ymd_opt(2024, 6, 15),
        };
        let params = ListQuery::paged(10, 2).with_filter(filter).to_params();

        assert_eq!(
            params,
            vec![
                ("limit", "10".to_owned()),
                ("page", "2".to_owned()),
                ("vehicle-number", "HND-1024".to_owned()),
                ("date", "2024-06-15".to_owned()),
            ]
        );
    }

    #[test]
    fn log_type_parses_lowercase() {
        assert_eq!("exit".parse::<LogType>().unwrap(), LogType::Exit);
        assert_eq!(LogType::Entry.to_string(), "entry");
    }
}
