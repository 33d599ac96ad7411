//! Link parameter sanitizing

use serde_json::{Map, Value};

/// Copy every entry, escaping newline, carriage return and double quote in
/// string values. Non-string values are copied unchanged.
pub fn filter_out_bad_characters(input: Option<&Map<String, Value>>) -> Map<String, Value> {
    let mut filtered = Map::new();
    let Some(input) = input else {
        return filtered;
    };

    for (key, value) in input {
        let value = match value {
            Value::String(s) => Value::String(escape(s)),
            other => other.clone(),
        };
        filtered.insert(key.clone(), value);
    }
    filtered
}

fn escape(value: &str) -> String {
    value
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('"', "\\\"")
}

/// Sanitize link parameters, tag them with their source platform and
/// serialize to a compact JSON string
pub fn format_and_stringify_link_param(params: Option<&Map<String, Value>>) -> String {
    let mut params = filter_out_bad_characters(params);
    params.insert("source".to_string(), Value::String("android".to_string()));
    Value::Object(params).to_string()
}
