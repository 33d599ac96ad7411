//! Schemes command implementation

use crate::env::deep_link_schemes;
use crate::manifest::{ApkError, find_apk};
use crate::settings::Settings;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SchemesError {
    #[error("Package error: {0}")]
    ApkError(#[from] ApkError),

    #[error("Failed to format schemes: {0}")]
    FormatError(#[from] serde_json::Error),
}

/// Print the deep-link schemes a package declares as JSON
pub fn show_schemes(apk: &Path, settings: &Settings) -> Result<(), SchemesError> {
    let apk_path = find_apk(apk)?;

    match deep_link_schemes(&apk_path, settings.low_memory_threshold_kib()) {
        Some(schemes) => println!("{}", serde_json::to_string_pretty(&schemes)?),
        None => {
            eprintln!(
                "[{}] Could not read deep link schemes from {} (run with -v for details)",
                crate::APP_NAME,
                apk_path.display()
            );
            println!("null");
        }
    }

    Ok(())
}
