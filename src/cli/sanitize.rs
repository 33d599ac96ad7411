//! Sanitize command implementation

use crate::json::{JsonReader, filter_out_bad_characters, format_and_stringify_link_param};
use serde_json::{Map, Value};
use std::fs;
use std::io::Read;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SanitizeError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Link parameters must be a JSON object")]
    NotAnObject,

    #[error("No input: pass a file or pipe JSON on stdin")]
    NoInput,
}

/// Sanitize link parameters read from `input` (or stdin), printing either
/// the tagged link-param string or, with `raw`, just the escaped object
pub fn sanitize_params(input: Option<&Path>, strip: &[String], raw: bool) -> Result<(), SanitizeError> {
    let content = match input {
        Some(path) => fs::read_to_string(path)?,
        None => {
            if atty::is(atty::Stream::Stdin) {
                return Err(SanitizeError::NoInput);
            }
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let params = parse_params(&content, strip)?;

    if raw {
        let filtered = filter_out_bad_characters(params.as_ref());
        println!("{}", serde_json::to_string_pretty(&Value::Object(filtered))?);
    } else {
        println!("{}", format_and_stringify_link_param(params.as_ref()));
    }

    Ok(())
}

/// Parse link parameters, dropping the `strip` keys. `null` means no params.
pub fn parse_params(content: &str, strip: &[String]) -> Result<Option<Map<String, Value>>, SanitizeError> {
    let value: Value = serde_json::from_str(content)?;
    if value.is_null() {
        return Ok(None);
    }
    if !value.is_object() {
        return Err(SanitizeError::NotAnObject);
    }

    let mut reader = JsonReader::from_value(&value);
    for key in strip {
        if let Some(removed) = reader.read_out(key) {
            log::debug!("Stripped {} = {}", key, removed);
        }
    }
    Ok(Some(reader.into_inner()))
}
