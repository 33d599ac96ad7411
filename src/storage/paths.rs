//! Directory path management for linkdoctor

use std::path::PathBuf;

/// Get the config directory (~/.config/linkdoctor)
pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(crate::APP_NAME)
}

/// Get the settings file path
pub fn settings_path() -> PathBuf {
    config_dir().join("config.toml")
}

/// Get the data directory (~/.local/share/linkdoctor)
pub fn data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(crate::APP_NAME)
}

/// Get the directory saved validation reports go to by default
pub fn reports_dir() -> PathBuf {
    data_dir().join("reports")
}
