//! Dashboard link settings: the configuration snapshot and where it comes from

mod config;
mod fetch;

pub use config::*;
pub use fetch::*;
