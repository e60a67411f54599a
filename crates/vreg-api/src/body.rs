// Request body shaping.
//
// Create requests drop fields the user left empty so the backend applies its
// own defaults. Update requests send blank strings as an explicit `null`, which
// the backend reads as "clear this field".

use serde::Serialize;
use serde_json::Value;

use crate::error::Error;

/// Encode a create body, omitting `null` and `""` entries at every depth.
pub fn create_body<B: Serialize + ?Sized>(body: &B) -> Result<Value, Error> {
    Ok(omit_blank_fields(serde_json::to_value(body)?))
}

/// Encode an update body, turning blank strings into `null` at every depth.
pub fn update_body<B: Serialize + ?Sized>(body: &B) -> Result<Value, Error> {
    Ok(blank_fields_to_null(serde_json::to_value(body)?))
}

pub fn omit_blank_fields(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter(|(_, value)| !is_unset(value))
                .map(|(key, value)| (key, omit_blank_fields(value)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(omit_blank_fields).collect()),
        other => other,
    }
}

pub fn blank_fields_to_null(value: Value) -> Value {
    match value {
        Value::String(text) if text.trim().is_empty() => Value::Null,
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, value)| (key, blank_fields_to_null(value)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(blank_fields_to_null).collect()),
        other => other,
    }
}

fn is_unset(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(text) => text.is_empty(),
        _ => false,
    }
}
