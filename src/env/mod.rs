//! Environment queries against the application package and the host
//!
//! Every query here absorbs its failures into a default value; callers get
//! a plain answer and the reason, if any, goes to the debug log.

mod host;
mod memory;

pub use host::ApkHost;
pub use memory::{MemoryInfo, is_low_on_memory, parse_meminfo, read_memory_info};

use crate::manifest::{ApkArchive, ApkError, AttrValue, IntegrationModel, ResourceTable};
use std::collections::BTreeMap;
use std::path::Path;

pub const TEST_MODE_KEY: &str = "io.branch.sdk.TestMode";

/// Textual value of a manifest attribute, following resource references
pub fn resolve_value(value: &AttrValue, resources: Option<&ResourceTable>) -> Option<String> {
    match value {
        AttrValue::String(s) => Some(s.clone()),
        AttrValue::Reference(id) => resources.and_then(|r| r.string_by_id(*id)),
        AttrValue::Boolean(b) => Some(b.to_string()),
        AttrValue::Integer(i) => Some(i.to_string()),
        AttrValue::Other { .. } => None,
    }
}

/// Test mode is on when forced by the caller, else when the manifest
/// meta-data says so, else when the string resource of the same name is
/// `"true"`. A meta-data reference only counts when it points at a `bool`
/// resource; anything else, or anything unreadable, means off.
pub fn is_test_mode_enabled(
    custom_debug: bool,
    meta_data: &BTreeMap<String, AttrValue>,
    resources: Option<&ResourceTable>,
) -> bool {
    if custom_debug {
        return true;
    }

    match meta_data.get(TEST_MODE_KEY) {
        Some(AttrValue::Boolean(b)) => *b,
        Some(AttrValue::Reference(id)) => resources
            .filter(|r| r.type_name(*id) == Some("bool"))
            .is_some_and(|r| parse_bool(r.string_by_id(*id).as_deref())),
        Some(_) => false,
        None => parse_bool(
            resources
                .and_then(|r| r.string_by_name("string", TEST_MODE_KEY))
                .as_deref(),
        ),
    }
}

fn parse_bool(value: Option<&str>) -> bool {
    value.is_some_and(|v| v.trim().eq_ignore_ascii_case("true"))
}

/// Deep-link schemes the package declares, or `None` when memory is low or
/// the package can't be read
pub fn deep_link_schemes(
    apk_path: &Path,
    low_memory_threshold_kib: u64,
) -> Option<BTreeMap<String, Vec<String>>> {
    if is_low_on_memory(low_memory_threshold_kib) {
        log::debug!("Low on memory, skipping manifest decoding");
        return None;
    }

    match read_integration_model(apk_path) {
        Ok(model) => Some(model.deeplink_schemes),
        Err(e) => {
            log::debug!("Could not read deep link schemes: {}", e);
            None
        }
    }
}

fn read_integration_model(apk_path: &Path) -> Result<IntegrationModel, ApkError> {
    let mut apk = ApkArchive::open(apk_path)?;
    let manifest = apk.manifest()?;
    Ok(IntegrationModel::from_document(&manifest))
}
