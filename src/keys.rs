//! Key lookup for the current mode

use crate::env::resolve_value;
use crate::manifest::{AttrValue, ResourceTable};
use std::collections::BTreeMap;

pub const LIVE_KEY_NAME: &str = "io.branch.sdk.BranchKey";
pub const TEST_KEY_NAME: &str = "io.branch.sdk.BranchKey.test";

/// Find the key for live or test mode.
///
/// An explicit override wins. Otherwise the mode's `<meta-data>` entry is
/// read (resolving `@string/...` references), then the string resource of
/// the same name. Test mode falls back to the live key when no test key is
/// declared.
pub fn read_branch_key(
    live: bool,
    key_override: Option<&str>,
    meta_data: &BTreeMap<String, AttrValue>,
    resources: Option<&ResourceTable>,
) -> Option<String> {
    if let Some(key) = key_override.map(str::trim).filter(|k| !k.is_empty()) {
        return Some(key.to_string());
    }

    let primary = if live { LIVE_KEY_NAME } else { TEST_KEY_NAME };
    lookup_key(primary, meta_data, resources).or_else(|| {
        if live {
            None
        } else {
            lookup_key(LIVE_KEY_NAME, meta_data, resources)
        }
    })
}

fn lookup_key(
    name: &str,
    meta_data: &BTreeMap<String, AttrValue>,
    resources: Option<&ResourceTable>,
) -> Option<String> {
    meta_data
        .get(name)
        .and_then(|value| resolve_value(value, resources))
        .or_else(|| resources.and_then(|r| r.string_by_name("string", name)))
        .map(|key| key.trim().to_string())
        .filter(|key| !key.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(entries: &[(&str, &str)]) -> BTreeMap<String, AttrValue> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), AttrValue::String(v.to_string())))
            .collect()
    }

    #[test]
    fn override_wins() {
        let meta = meta(&[(LIVE_KEY_NAME, "key_live_manifest")]);
        assert_eq!(
            read_branch_key(true, Some(" key_live_cli "), &meta, None).as_deref(),
            Some("key_live_cli")
        );
        assert_eq!(
            read_branch_key(true, Some("  "), &meta, None).as_deref(),
            Some("key_live_manifest")
        );
    }

    #[test]
    fn mode_picks_key() {
        let meta = meta(&[(LIVE_KEY_NAME, "key_live_a"), (TEST_KEY_NAME, "key_test_b")]);
        assert_eq!(read_branch_key(true, None, &meta, None).as_deref(), Some("key_live_a"));
        assert_eq!(read_branch_key(false, None, &meta, None).as_deref(), Some("key_test_b"));
    }

    #[test]
    fn test_mode_falls_back_to_live() {
        let meta = meta(&[(LIVE_KEY_NAME, "key_live_a")]);
        assert_eq!(read_branch_key(false, None, &meta, None).as_deref(), Some("key_live_a"));
    }

    #[test]
    fn live_mode_never_uses_test_key() {
        let meta = meta(&[(TEST_KEY_NAME, "key_test_b")]);
        assert_eq!(read_branch_key(true, None, &meta, None), None);
    }

    #[test]
    fn empty_values_are_missing() {
        let meta = meta(&[(LIVE_KEY_NAME, "   ")]);
        assert_eq!(read_branch_key(true, None, &meta, None), None);
    }
}
