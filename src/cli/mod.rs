//! CLI command handlers

mod config;
mod info;
mod sanitize;
mod schemes;
mod validate;

pub use config::*;
pub use info::*;
pub use sanitize::*;
pub use schemes::*;
pub use validate::*;
