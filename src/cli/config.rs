//! Config command implementation

use crate::settings::{Settings, SettingsError, save_settings};
use crate::storage::paths;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Settings error: {0}")]
    SettingsError(#[from] SettingsError),

    #[error("Failed to format settings: {0}")]
    FormatError(#[from] toml::ser::Error),

    #[error("Settings already exist at {0} (use --force to overwrite)")]
    AlreadyExists(String),
}

/// Print the effective settings as TOML
pub fn show_config(settings: &Settings) -> Result<(), ConfigError> {
    print!("{}", toml::to_string_pretty(settings)?);
    Ok(())
}

/// Write default settings
pub fn init_config(path: Option<&Path>, force: bool) -> Result<(), ConfigError> {
    let default_path = paths::settings_path();
    let target = path.unwrap_or(default_path.as_path());

    if target.exists() && !force {
        return Err(ConfigError::AlreadyExists(target.display().to_string()));
    }

    save_settings(Some(target), &Settings::default())?;
    println!("[{}] Wrote default settings to {}", crate::APP_NAME, target.display());
    Ok(())
}
