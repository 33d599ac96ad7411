//! Default settings values

/// Public link-settings API
pub const DEFAULT_API_URL: &str = "https://api2.branch.io";

/// Below this much available memory the manifest is not decoded
pub const DEFAULT_LOW_MEMORY_THRESHOLD_MIB: u64 = 128;

pub fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

pub fn default_low_memory_threshold_mib() -> u64 {
    DEFAULT_LOW_MEMORY_THRESHOLD_MIB
}
