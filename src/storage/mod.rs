//! Storage management for linkdoctor

pub mod paths;
mod report;

pub use paths::*;
pub use report::*;
