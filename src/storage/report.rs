//! Saved validation reports

use crate::storage::paths;
use crate::validator::Report;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialize error: {0}")]
    SerializeError(#[from] serde_json::Error),
}

/// A report together with what it was run against
#[derive(Debug, Serialize)]
pub struct SavedReport<'a> {
    pub package: &'a str,
    pub apk_sha256: Option<&'a str>,
    pub created: String,
    pub report: &'a Report,
}

/// Write the report as JSON to `path`, or into the reports directory named
/// after the package when `None`. Returns where it was written.
pub fn write_report(path: Option<&Path>, saved: &SavedReport) -> Result<PathBuf, ReportError> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => paths::reports_dir().join(default_file_name(saved.package, &saved.created)),
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, serde_json::to_string_pretty(saved)?)?;
    Ok(path)
}

fn default_file_name(package: &str, created: &str) -> String {
    let package = if package.is_empty() { "unknown" } else { package };
    let stamp: String = created
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect();
    format!("{}-{}.json", package, stamp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validator::{Checklist, Step};

    #[test]
    fn file_name_is_filesystem_safe() {
        assert_eq!(
            default_file_name("com.example.shop", "2026-10-16 09:30:00"),
            "com.example.shop-2026-10-16-09-30-00.json"
        );
        assert_eq!(default_file_name("", "x"), "unknown-x.json");
    }

    #[test]
    fn writes_json() {
        let dir = tempfile::tempdir().unwrap();
        let mut checklist = Checklist::begin();
        checklist.enter(Step::SdkInstance);
        let report = checklist.fail("not initialised", "https://help.example/load");

        let saved = SavedReport {
            package: "com.example.shop",
            apk_sha256: None,
            created: "2026-10-16 09:30:00".into(),
            report: &report,
        };
        let out = dir.path().join("report.json");
        let written = write_report(Some(&out), &saved).unwrap();
        assert_eq!(written, out);

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(value["package"], "com.example.shop");
        assert_eq!(value["report"]["outcome"]["failed_at"]["step"], "sdk_instance");
    }
}
