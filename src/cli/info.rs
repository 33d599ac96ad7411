//! Info command implementation

use crate::env::{ApkHost, read_memory_info};
use crate::manifest::{ApkError, find_apk};
use crate::settings::Settings;
use crate::storage::paths;
use crate::validator::HostEnvironment;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InfoError {
    #[error("Package error: {0}")]
    ApkError(#[from] ApkError),
}

/// Show info about linkdoctor itself
pub fn show_tool_info(settings: &Settings) -> Result<(), InfoError> {
    println!("{} v{}", crate::APP_NAME, crate::VERSION);
    println!("Deep-link integration doctor");
    println!();
    println!("Settings file:  {}", paths::settings_path().display());
    println!("Reports:        {}", paths::reports_dir().display());
    println!("API:            {}", settings.api_url);
    println!(
        "Key override:   {}",
        settings.branch_key.as_deref().map(mask_key).unwrap_or_else(|| "none".into())
    );
    println!();

    match read_memory_info() {
        Some(info) => println!(
            "Memory:         {} MiB available of {} MiB{}",
            info.available_kib / 1024,
            info.total_kib / 1024,
            if info.is_low(settings.low_memory_threshold_kib()) {
                " (low)"
            } else {
                ""
            }
        ),
        None => println!("Memory:         unknown"),
    }

    Ok(())
}

/// Show what a package declares
pub fn show_app_info(apk: &Path, settings: &Settings) -> Result<(), InfoError> {
    let apk_path = find_apk(apk)?;
    let host = ApkHost::load(&apk_path, settings)?;
    let model = host.model();
    let test_mode = host.is_test_mode();

    let title = if model.package_name.is_empty() {
        "(no package name)"
    } else {
        model.package_name.as_str()
    };
    println!("{}", title);
    println!("{}", "=".repeat(title.len()));
    println!();
    println!("Package file: {}", host.path().display());
    println!("SDK present:  {}", if host.sdk_initialized() { "yes" } else { "no" });
    println!("Test mode:    {}", if test_mode { "yes" } else { "no" });
    println!(
        "Key:          {}",
        host.branch_key(!test_mode)
            .as_deref()
            .map(mask_key)
            .unwrap_or_else(|| "missing".into())
    );
    println!(
        "Resources:    {}",
        if host.resources().is_some() { "decoded" } else { "none" }
    );

    println!();
    println!("URI schemes:");
    if model.deeplink_schemes.is_empty() {
        println!("  (none)");
    }
    for (scheme, hosts) in &model.deeplink_schemes {
        if hosts.is_empty() {
            println!("  {}://*", scheme);
        } else {
            for h in hosts {
                println!("  {}://{}", scheme, h);
            }
        }
    }

    println!();
    println!("App Link hosts:");
    if model.applink_hosts.is_empty() {
        println!("  (none)");
    }
    for h in &model.applink_hosts {
        println!("  {}", h);
    }

    Ok(())
}

/// Keep the key's prefix visible, hide the rest
pub fn mask_key(key: &str) -> String {
    let prefix_len = key
        .match_indices('_')
        .nth(1)
        .map(|(i, _)| i + 1)
        .unwrap_or(0);
    let visible: String = key.chars().take(prefix_len.max(4).min(key.len())).collect();
    format!("{}{}", visible, "*".repeat(key.chars().count().saturating_sub(visible.chars().count())))
}
