//! Validate command implementation

use crate::dashboard::{AppConfig, AppConfigSource, FetchError, FileConfigSource, HttpConfigSource};
use crate::env::ApkHost;
use crate::manifest::{ApkError, find_apk, fingerprint};
use crate::settings::Settings;
use crate::storage::{ReportError, SavedReport, write_report};
use crate::validator::{IntegrationValidator, Report};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ValidateError {
    #[error("Package error: {0}")]
    ApkError(#[from] ApkError),

    #[error("Report error: {0}")]
    ReportError(#[from] ReportError),
}

#[derive(Debug, Clone, Default)]
pub struct ValidateOptions {
    /// APK file, or a directory to search for one
    pub apk: PathBuf,
    /// Saved dashboard config to use instead of the API
    pub config_file: Option<PathBuf>,
    /// Where to write the JSON report
    pub report: Option<PathBuf>,
    /// Write the report to the reports directory
    pub save_report: bool,
}

/// Run the integration checklist against a package
pub fn validate_app(options: &ValidateOptions, settings: &Settings) -> Result<Report, ValidateError> {
    let apk_path = find_apk(&options.apk)?;
    let sha256 = match fingerprint(&apk_path) {
        Ok(hash) => Some(hash),
        Err(e) => {
            log::debug!("Could not fingerprint {}: {}", apk_path.display(), e);
            None
        }
    };
    let started = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();

    println!("[{}] Checking {}", crate::APP_NAME, apk_path.display());
    if let Some(hash) = &sha256 {
        println!("[{}] SHA-256 {}", crate::APP_NAME, hash);
    }
    println!("[{}] Started {}", crate::APP_NAME, started);

    let host = ApkHost::load(&apk_path, settings)?;
    let validator = IntegrationValidator::new(host.model().clone());
    let source = config_source(options.config_file.as_deref(), settings);

    let report = validator.validate(&host, source);

    if options.report.is_some() || options.save_report {
        let saved = SavedReport {
            package: &host.model().package_name,
            apk_sha256: sha256.as_deref(),
            created: started,
            report: &report,
        };
        let written = write_report(options.report.as_deref(), &saved)?;
        println!("[{}] Report written to {}", crate::APP_NAME, written.display());
    }

    Ok(report)
}

fn config_source(config_file: Option<&Path>, settings: &Settings) -> Arc<dyn AppConfigSource> {
    match config_file {
        Some(path) => {
            log::debug!("Using dashboard config from {}", path.display());
            Arc::new(FileConfigSource::new(path))
        }
        None => {
            let http: Arc<dyn AppConfigSource> =
                Arc::new(HttpConfigSource::new(&settings.api_url, settings.timeout()));
            if atty::is(atty::Stream::Stderr) {
                Arc::new(SpinnerSource { inner: http })
            } else {
                http
            }
        }
    }
}

/// Shows a spinner on the terminal while the wrapped source is fetching
struct SpinnerSource {
    inner: Arc<dyn AppConfigSource>,
}

impl AppConfigSource for SpinnerSource {
    fn fetch_app_config(&self, branch_key: &str) -> Result<AppConfig, FetchError> {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message("Fetching dashboard link settings...");
        pb.enable_steady_tick(Duration::from_millis(100));

        let result = self.inner.fetch_app_config(branch_key);

        pb.finish_and_clear();
        result
    }
}
