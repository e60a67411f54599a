// Display normalization for backend error payloads.
//
// The backend nests context into errors as `{ "message": ..., "target": ... }`
// fragments. `normalize` rewrites each of them, at any depth, into a single
// readable string so the payload can be shown as-is.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Serializer, Value, json};

/// A message paired with the data it is about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageOf<T> {
    pub message: String,
    pub target: T,
}

impl<T> MessageOf<T> {
    pub fn new(message: impl Into<String>, target: T) -> Self {
        Self {
            message: message.into(),
            target,
        }
    }
}

impl<T: Serialize> fmt::Display for MessageOf<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let target = serde_json::to_value(&self.target).unwrap_or(Value::Null);
        f.write_str(&format_message_of(&self.message, &target))
    }
}

/// Recursively replace every `{message, target}` fragment with its string form.
///
/// Arrays are mapped element-wise, other objects keep their keys with each
/// value normalized, and primitives pass through unchanged.
pub fn normalize(value: &Value) -> Value {
    match value {
        Value::Array(items) => Value::Array(items.iter().map(normalize).collect()),
        Value::Object(map) => match message_of(map) {
            Some((message, target)) => Value::String(format_message_of(message, target)),
            None => Value::Object(
                map.iter()
                    .map(|(key, value)| (key.clone(), normalize(value)))
                    .collect(),
            ),
        },
        other => other.clone(),
    }
}

/// Pretty-print JSON with a 4-space indent.
pub fn pretty_json(value: &Value) -> String {
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    match value.serialize(&mut ser) {
        Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
        Err(e) => format!("<unprintable: {e}>"),
    }
}

/// Strings verbatim; anything else pretty-printed as JSON.
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => pretty_json(other),
    }
}

/// Reduce an error to the `{ "message": ... }` shape used as a target.
pub fn error_target(err: &dyn std::error::Error) -> Value {
    json!({ "message": err.to_string() })
}

fn message_of(map: &Map<String, Value>) -> Option<(&str, &Value)> {
    let message = map.get("message")?.as_str()?;
    let target = map.get("target")?;
    Some((message, target))
}

fn format_message_of(message: &str, target: &Value) -> String {
    format!("{message}: {}.", pretty_json(target))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn replaces_single_message_of() {
        let input = json!({ "message": "Test message", "target": { "foo": "bar" } });
        assert_eq!(
            normalize(&input),
            json!("Test message: {\n    \"foo\": \"bar\"\n}.")
        );
    }

    #[test]
    fn replaces_nested_message_of() {
        let input = json!({ "context": { "message": "Nested message", "target": { "id": 123 } } });
        assert_eq!(
            normalize(&input),
            json!({ "context": "Nested message: {\n    \"id\": 123\n}." })
        );
    }

    #[test]
    fn replaces_deeply_nested_message_of() {
        let input = json!({
            "level1": { "level2": { "message": "Deep message", "target": { "key": "value" } } }
        });
        assert_eq!(
            normalize(&input),
            json!({ "level1": { "level2": "Deep message: {\n    \"key\": \"value\"\n}." } })
        );
    }

    #[test]
    fn handles_arrays_of_message_of() {
        let input = json!([
            { "message": "Array message 1", "target": { "a": 1 } },
            { "message": "Array message 2", "target": { "b": 2 } },
        ]);
        assert_eq!(
            normalize(&input),
            json!([
                "Array message 1: {\n    \"a\": 1\n}.",
                "Array message 2: {\n    \"b\": 2\n}.",
            ])
        );
    }

    #[test]
    fn mixed_arrays_only_touch_matching_elements() {
        let input = json!([
            { "message": "Array message", "target": { "a": 1 } },
            "not a MessageOf",
            123,
        ]);
        assert_eq!(
            normalize(&input),
            json!(["Array message: {\n    \"a\": 1\n}.", "not a MessageOf", 123])
        );
    }

    #[test]
    fn objects_without_message_of_are_preserved() {
        let input = json!({ "foo": "bar", "nested": { "baz": "qux" } });
        assert_eq!(normalize(&input), input);
    }

    #[test]
    fn primitives_pass_through() {
        for input in [json!("string"), json!(123), json!(true), Value::Null] {
            assert_eq!(normalize(&input), input);
        }
    }

    #[test]
    fn empty_containers_pass_through() {
        assert_eq!(normalize(&json!({})), json!({}));
        assert_eq!(normalize(&json!([])), json!([]));
        assert_eq!(normalize(&json!([{}, []])), json!([{}, []]));
    }

    #[test]
    fn null_target_prints_as_null() {
        let input = json!({ "message": "Missing", "target": null });
        assert_eq!(normalize(&input), json!("Missing: null."));
    }

    #[test]
    fn non_string_message_is_not_a_fragment() {
        let input = json!({ "message": 42, "target": { "message": "inner", "target": 1 } });
        assert_eq!(
            normalize(&input),
            json!({ "message": 42, "target": "inner: 1." })
        );
    }

    #[test]
    fn normalization_is_idempotent() {
        let input = json!({
            "errors": [
                { "message": "Invalid brand", "target": { "brand": "" } },
                { "field": "model", "reasons": ["blank", { "message": "Too short", "target": 0 }] },
            ]
        });
        let once = normalize(&input);
        assert_eq!(normalize(&once), once);
    }

    #[test]
    fn message_of_display_matches_normalize() {
        let fragment = MessageOf::new("Vehicle not found", json!({ "number": "ABC-123" }));
        let as_value = serde_json::to_value(&fragment).unwrap_or(Value::Null);
        assert_eq!(json!(fragment.to_string()), normalize(&as_value));
    }

    #[test]
    fn error_target_keeps_only_the_message() {
        let err = std::io::Error::other("disk on fire");
        assert_eq!(error_target(&err), json!({ "message": "disk on fire" }));
    }

    #[test]
    fn value_to_string_leaves_strings_verbatim() {
        assert_eq!(value_to_string(&json!("plain")), "plain");
        assert_eq!(value_to_string(&json!([1])), "[\n    1\n]");
    }
}
