//! JSON helpers for link parameters

mod reader;
mod sanitize;

pub use reader::JsonReader;
pub use sanitize::{filter_out_bad_characters, format_and_stringify_link_param};
