//! linkdoctor - deep-link integration doctor
//!
//! Reads an Android application package, compares its deep-link setup with
//! the dashboard's link settings and reports what to fix.

pub mod cli;
pub mod dashboard;
pub mod env;
pub mod json;
pub mod keys;
pub mod manifest;
pub mod settings;
pub mod storage;
pub mod validator;

pub use manifest::IntegrationModel;
pub use validator::{HostEnvironment, IntegrationValidator, Report};

/// Application version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "linkdoctor";
