//! User settings

mod defaults;
mod overrides;

pub use defaults::*;
pub use overrides::*;

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Settings read from `config.toml`, then adjusted by environment variables
/// and command-line flags
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Base URL of the dashboard API
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Key used instead of the one declared in the package
    #[serde(default)]
    pub branch_key: Option<String>,

    /// Force test mode regardless of what the package declares
    #[serde(default)]
    pub debug: bool,

    #[serde(default = "default_low_memory_threshold_mib")]
    pub low_memory_threshold_mib: u64,

    /// Dashboard request timeout; unset waits indefinitely
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            branch_key: None,
            debug: false,
            low_memory_threshold_mib: default_low_memory_threshold_mib(),
            timeout_secs: None,
        }
    }
}

impl Settings {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    pub fn low_memory_threshold_kib(&self) -> u64 {
        self.low_memory_threshold_mib.saturating_mul(1024)
    }
}
