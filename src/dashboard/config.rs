//! Read-only view of the dashboard app configuration

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const PACKAGE_NAME_KEY: &str = "android_package_name";
pub const URI_SCHEME_KEY: &str = "android_uri_scheme";
pub const CUSTOM_DOMAIN_KEY: &str = "short_url_domain";
pub const DEFAULT_DOMAIN_KEY: &str = "default_short_url_domain";
pub const ALTERNATE_DOMAIN_KEY: &str = "alternate_short_url_domain";

/// Link settings as returned by the dashboard. Unknown fields are kept so a
/// saved snapshot round-trips unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AppConfig {
    fields: Map<String, Value>,
}

impl AppConfig {
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(fields) => Some(Self { fields }),
            _ => None,
        }
    }

    /// Textual value of a field; missing and null read as empty
    pub fn opt_string(&self, key: &str) -> String {
        match self.fields.get(key) {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }

    pub fn package_name(&self) -> String {
        self.opt_string(PACKAGE_NAME_KEY)
    }

    pub fn uri_scheme(&self) -> String {
        self.opt_string(URI_SCHEME_KEY)
    }

    pub fn custom_domain(&self) -> String {
        self.opt_string(CUSTOM_DOMAIN_KEY)
    }

    pub fn default_domain(&self) -> String {
        self.opt_string(DEFAULT_DOMAIN_KEY)
    }

    pub fn alternate_domain(&self) -> String {
        self.opt_string(ALTERNATE_DOMAIN_KEY)
    }
}
