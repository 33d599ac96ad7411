//! Loading, saving and environment overrides for settings

use super::Settings;
use crate::storage::paths;
use std::fs;
use std::path::Path;
use thiserror::Error;

pub const ENV_BRANCH_KEY: &str = "LINKDOCTOR_BRANCH_KEY";
pub const ENV_API_URL: &str = "LINKDOCTOR_API_URL";

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to read settings: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse settings: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Failed to save settings: {0}")]
    SaveError(String),
}

/// Load settings from `path`, or the default location when `None`.
/// A missing file gives the defaults.
pub fn load_settings(path: Option<&Path>) -> Result<Settings, SettingsError> {
    let default_path = paths::settings_path();
    let path = path.unwrap_or(default_path.as_path());

    let mut settings = if path.exists() {
        let content = fs::read_to_string(path)?;
        toml::from_str(&content)?
    } else {
        log::debug!("No settings at {}, using defaults", path.display());
        Settings::default()
    };

    apply_env_overrides(&mut settings, |name| std::env::var(name).ok());
    Ok(settings)
}

/// Apply `LINKDOCTOR_*` variables through the given lookup
pub fn apply_env_overrides<F>(settings: &mut Settings, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(key) = lookup(ENV_BRANCH_KEY).filter(|k| !k.trim().is_empty()) {
        settings.branch_key = Some(key.trim().to_string());
    }
    if let Some(url) = lookup(ENV_API_URL).filter(|u| !u.trim().is_empty()) {
        settings.api_url = url.trim().to_string();
    }
}

/// Save settings to `path`, or the default location when `None`
pub fn save_settings(path: Option<&Path>, settings: &Settings) -> Result<(), SettingsError> {
    let default_path = paths::settings_path();
    let path = path.unwrap_or(default_path.as_path());

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let content =
        toml::to_string_pretty(settings).map_err(|e| SettingsError::SaveError(e.to_string()))?;

    fs::write(path, content)?;

    Ok(())
}
