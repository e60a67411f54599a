use serde::{Deserialize, Serialize};

use super::{Entity, Resource};

const LICENSE_ID_MIN: usize = 6;
const LICENSE_ID_MAX: usize = 20;
const NAME_MAX: usize = 30;

/// A registered driver, keyed by license ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Driver {
    pub license_id: String,
    pub first_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub second_name: Option<String>,
    pub surname: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub second_surname: Option<String>,
}

/// Mutable driver fields. `None` or a blank string clears an optional name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverUpdate {
    pub first_name: String,
    pub second_name: Option<String>,
    pub surname: String,
    pub second_surname: Option<String>,
}

impl From<&Driver> for DriverUpdate {
    fn from(d: &Driver) -> Self {
        Self {
            first_name: d.first_name.clone(),
            second_name: d.second_name.clone(),
            surname: d.surname.clone(),
            second_surname: d.second_surname.clone(),
        }
    }
}

impl Driver {
    /// First name, second name, surname, second surname; empty parts skipped.
    pub fn full_name(&self) -> String {
        [
            Some(self.first_name.as_str()),
            self.second_name.as_deref(),
            Some(self.surname.as_str()),
            self.second_surname.as_deref(),
        ]
        .into_iter()
        .flatten()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
    }

    /// Client-side form checks run before a create or update is sent.
    pub fn validate(&self) -> DriverValidation {
        let mut errors = Vec::new();

        let license_id = self.license_id.trim();
        if license_id.is_empty() {
            errors.push((DriverField::LicenseId, "Driver license ID cannot be blank."));
        } else if char_len(&self.license_id) < LICENSE_ID_MIN {
            errors.push((
                DriverField::LicenseId,
                "Driver license ID minimum length is 6 characters.",
            ));
        } else if char_len(&self.license_id) > LICENSE_ID_MAX {
            errors.push((
                DriverField::LicenseId,
                "Driver license ID maximum length is 20 characters.",
            ));
        }

        if self.first_name.trim().is_empty() {
            errors.push((DriverField::FirstName, "Driver first name cannot be blank."));
        } else if char_len(&self.first_name) > NAME_MAX {
            errors.push((
                DriverField::FirstName,
                "Driver first name maximum length is 30 characters.",
            ));
        }

        if self.surname.trim().is_empty() {
            errors.push((DriverField::Surname, "Driver surname cannot be blank."));
        } else if char_len(&self.surname) > NAME_MAX {
            errors.push((
                DriverField::Surname,
                "Driver surname maximum length is 30 characters.",
            ));
        }

        if exceeds_optional(self.second_name.as_deref()) {
            errors.push((
                DriverField::SecondName,
                "Driver second name maximum length is 30 characters.",
            ));
        }
        if exceeds_optional(self.second_surname.as_deref()) {
            errors.push((
                DriverField::SecondSurname,
                "Driver second surname maximum length is 30 characters.",
            ));
        }

        DriverValidation { errors }
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

fn exceeds_optional(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty() && char_len(v) > NAME_MAX)
}

/// Driver form field, named as on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::IntoStaticStr)]
#[strum(serialize_all = "camelCase")]
pub enum DriverField {
    LicenseId,
    FirstName,
    SecondName,
    Surname,
    SecondSurname,
}

/// Outcome of [`Driver::validate`]: at most one message per field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DriverValidation {
    errors: Vec<(DriverField, &'static str)>,
}

impl DriverValidation {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn get(&self, field: DriverField) -> Option<&'static str> {
        self.errors
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, message)| *message)
    }

    pub fn iter(&self) -> impl Iterator<Item = (DriverField, &'static str)> + '_ {
        self.errors.iter().copied()
    }
}

impl Entity for Driver {
    type Key = String;

    const SINGULAR: &'static str = "driver";
    const PLURAL: &'static str = "drivers";

    fn key(&self) -> String {
        self.license_id.clone()
    }
}

impl Resource for Driver {
    const PATH: &'static str = "drivers";

    type Create = Driver;
    type Update = DriverUpdate;
    type Filter = ();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn driver(license_id: &str, first_name: &str, surname: &str) -> Driver {
        Driver {
            license_id: license_id.into(),
            first_name: first_name.into(),
            second_name: None,
            surname: surname.into(),
            second_surname: None,
        }
    }

    #[test]
    fn full_name_skips_missing_parts() {
        let mut d = driver("LIC-0001", "Ana", "Lopez");
        assert_eq!(d.full_name(), "Ana Lopez");

        d.second_name = Some("Maria".into());
        d.second_surname = Some(String::new());
        assert_eq!(d.full_name(), "Ana Maria Lopez");
    }

    #[test]
    fn valid_driver_has_no_errors() {
        assert!(driver("LIC-0001", "Ana", "Lopez").validate().is_valid());
    }

    #[test]
    fn blank_required_fields() {
        let v = driver("  ", "", " ").validate();
        assert_eq!(
            v.get(DriverField::LicenseId),
            Some("Driver license ID cannot be blank.")
        );
        assert_eq!(
            v.get(DriverField::FirstName),
            Some("Driver first name cannot be blank.")
        );
        assert_eq!(
            v.get(DriverField::Surname),
            Some("Driver surname cannot be blank.")
        );
    }

    #[test]
    fn license_id_length_bounds() {
        let short = driver("ABC", "Ana", "Lopez").validate();
        assert_eq!(
            short.get(DriverField::LicenseId),
            Some("Driver license ID minimum length is 6 characters.")
        );

        let long = driver(&"X".repeat(21), "Ana", "Lopez").validate();
        assert_eq!(
            long.get(DriverField::LicenseId),
            Some("Driver license ID maximum length is 20 characters.")
        );
    }

    #[test]
    fn optional_names_only_checked_when_present() {
        let mut d = driver("LIC-0001", "Ana", "Lopez");
        d.second_name = Some("N".repeat(31));
        d.second_surname = Some("   ".into());

        let v = d.validate();
        assert_eq!(
            v.get(DriverField::SecondName),
            Some("Driver second name maximum length is 30 characters.")
        );
        assert_eq!(v.get(DriverField::SecondSurname), None);
    }

    #[test]
    fn wire_names_are_camel_case() {
        let json = serde_json::to_value(driver("LIC-0001", "Ana", "Lopez"))
            .unwrap_or(serde_json::Value::Null);
        assert_eq!(json["licenseId"], "LIC-0001");
        assert!(json.get("secondName").is_none());
        assert_eq!(DriverField::SecondSurname.to_string(), "secondSurname");
    }
}
