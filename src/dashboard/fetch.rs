//! Fetching the dashboard configuration

use super::AppConfig;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;
use thiserror::Error;

pub const APP_LINK_SETTINGS_PATH: &str = "v1/app-link-settings";

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid response: {0}")]
    DecodeError(String),

    #[error("Dashboard config is not a JSON object")]
    NotAnObject,
}

/// Somewhere the dashboard configuration for a key can be read from
pub trait AppConfigSource: Send + Sync {
    fn fetch_app_config(&self, branch_key: &str) -> Result<AppConfig, FetchError>;
}

/// The live link-settings API
#[derive(Debug, Clone)]
pub struct HttpConfigSource {
    api_url: String,
    timeout: Option<Duration>,
}

impl HttpConfigSource {
    pub fn new(api_url: &str, timeout: Option<Duration>) -> Self {
        Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            timeout,
        }
    }

    pub fn settings_url(&self, branch_key: &str) -> String {
        format!("{}/{}/{}", self.api_url, APP_LINK_SETTINGS_PATH, branch_key)
    }
}

impl AppConfigSource for HttpConfigSource {
    fn fetch_app_config(&self, branch_key: &str) -> Result<AppConfig, FetchError> {
        let url = self.settings_url(branch_key);
        log::debug!("GET {}", url);

        let config = ureq::Agent::config_builder()
            .timeout_global(self.timeout)
            .build();
        let agent = ureq::Agent::new_with_config(config);

        let mut resp = agent
            .get(&url)
            .header("User-Agent", crate::APP_NAME)
            .call()
            .map_err(|e| FetchError::HttpError(e.to_string()))?;

        let value: Value = resp
            .body_mut()
            .read_json()
            .map_err(|e| FetchError::DecodeError(e.to_string()))?;

        AppConfig::from_value(value).ok_or(FetchError::NotAnObject)
    }
}

/// A saved configuration snapshot, for offline runs
#[derive(Debug, Clone)]
pub struct FileConfigSource {
    path: PathBuf,
}

impl FileConfigSource {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }
}

impl AppConfigSource for FileConfigSource {
    fn fetch_app_config(&self, _branch_key: &str) -> Result<AppConfig, FetchError> {
        let content = std::fs::read_to_string(&self.path)?;
        let value: Value =
            serde_json::from_str(&content).map_err(|e| FetchError::DecodeError(e.to_string()))?;
        AppConfig::from_value(value).ok_or(FetchError::NotAnObject)
    }
}

/// A dashboard fetch running in the background
pub struct ConfigFetch {
    handle: JoinHandle<Option<AppConfig>>,
}

impl ConfigFetch {
    /// Block until the fetch completes. Failures, including a panicking
    /// source, are already logged and come back as `None`.
    pub fn wait(self) -> Option<AppConfig> {
        match self.handle.join() {
            Ok(config) => config,
            Err(_) => {
                log::warn!("Dashboard config fetch aborted");
                None
            }
        }
    }
}

/// Start fetching the configuration for `branch_key` on its own thread
pub fn spawn_fetch(source: Arc<dyn AppConfigSource>, branch_key: String) -> ConfigFetch {
    let handle = std::thread::spawn(move || match source.fetch_app_config(&branch_key) {
        Ok(config) => Some(config),
        Err(e) => {
            log::warn!("Could not fetch dashboard config: {}", e);
            None
        }
    });
    ConfigFetch { handle }
}
