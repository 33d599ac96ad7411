//! One-shot "read and remove" access to a JSON object

use serde_json::{Map, Value};

/// Works on a private copy of the object it was built from; every
/// `read_out_*` call removes the key whether or not the value coerced.
#[derive(Debug, Clone, Default)]
pub struct JsonReader {
    object: Map<String, Value>,
}

impl JsonReader {
    pub fn new(object: &Map<String, Value>) -> Self {
        Self {
            object: object.clone(),
        }
    }

    /// Build from any JSON value; non-objects give an empty reader
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Object(map) => Self::new(map),
            _ => Self::default(),
        }
    }

    /// What is left after the reads so far
    pub fn json_object(&self) -> &Map<String, Value> {
        &self.object
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.object
    }

    pub fn has(&self, key: &str) -> bool {
        self.object.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.object.keys()
    }

    pub fn read_out(&mut self, key: &str) -> Option<Value> {
        self.object.remove(key)
    }

    pub fn read_out_string(&mut self, key: &str) -> Option<String> {
        self.read_out(key).and_then(|v| coerce_string(&v))
    }

    pub fn read_out_string_or(&mut self, key: &str, fallback: &str) -> String {
        self.read_out_string(key)
            .unwrap_or_else(|| fallback.to_string())
    }

    pub fn read_out_i64(&mut self, key: &str) -> Option<i64> {
        self.read_out(key).and_then(|v| coerce_i64(&v))
    }

    pub fn read_out_i64_or(&mut self, key: &str, fallback: i64) -> i64 {
        self.read_out_i64(key).unwrap_or(fallback)
    }

    pub fn read_out_f64(&mut self, key: &str) -> Option<f64> {
        self.read_out(key).and_then(|v| coerce_f64(&v))
    }

    pub fn read_out_f64_or(&mut self, key: &str, fallback: f64) -> f64 {
        self.read_out_f64(key).unwrap_or(fallback)
    }

    pub fn read_out_bool(&mut self, key: &str) -> Option<bool> {
        self.read_out(key).and_then(|v| match v {
            Value::Bool(b) => Some(b),
            Value::String(s) if s.eq_ignore_ascii_case("true") => Some(true),
            Value::String(s) if s.eq_ignore_ascii_case("false") => Some(false),
            _ => None,
        })
    }

    pub fn read_out_array(&mut self, key: &str) -> Option<Vec<Value>> {
        self.read_out(key).and_then(|v| match v {
            Value::Array(items) => Some(items),
            _ => None,
        })
    }
}

fn coerce_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

fn coerce_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .ok()
            .or_else(|| coerce_f64(value).map(|f| f as i64)),
        _ => None,
    }
}

fn coerce_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}
