//! Reference extraction from raw resource properties
//!
//! Handles the ARM property shapes strategies care about: id fields nested
//! under arrays (`ipConfigurations[].properties.subnet.id`), blob endpoint URIs,
//! and free-form scans for anything that looks like a resource id.

use crate::models::resource_id::looks_like_resource_id;
use serde_json::Value;
use std::collections::BTreeSet;

/// Path segment that fans out over every element of an array
pub const EACH: &str = "[]";

/// Collect the string values found at `path`, where [`EACH`] iterates arrays
///
/// Missing fields simply yield nothing.
pub fn strings_at<'v>(value: &'v Value, path: &[&str]) -> Vec<&'v str> {
    let mut current: Vec<&'v Value> = vec![value];
    for segment in path {
        current = if *segment == EACH {
            current
                .into_iter()
                .filter_map(|v| v.as_array())
                .flatten()
                .collect()
        } else {
            current
                .into_iter()
                .filter_map(|v| v.get(*segment))
                .collect()
        };
        if current.is_empty() {
            break;
        }
    }
    current
        .into_iter()
        .filter_map(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Storage account name from a blob endpoint such as
/// `https://diagacct.blob.core.windows.net/`
pub fn storage_account_from_uri(uri: &str) -> Option<String> {
    let parsed = url::Url::parse(uri).ok()?;
    let host = parsed.host_str()?;
    let account = host.split('.').next()?;
    if account.is_empty() {
        None
    } else {
        Some(account.to_ascii_lowercase())
    }
}

/// Every resource-id-shaped string in a JSON tree, including object keys
/// (ARM keys `identity.userAssignedIdentities` by identity id)
pub fn scan_resource_ids(value: &Value) -> BTreeSet<&str> {
    let mut found = BTreeSet::new();
    collect_ids(value, &mut found);
    found
}

fn collect_ids<'v>(value: &'v Value, found: &mut BTreeSet<&'v str>) {
    match value {
        Value::String(s) if looks_like_resource_id(s) => {
            found.insert(s.trim());
        }
        Value::Array(items) => {
            for item in items {
                collect_ids(item, found);
            }
        }
        Value::Object(map) => {
            for (key, item) in map {
                if looks_like_resource_id(key) {
                    found.insert(key.trim());
                }
                collect_ids(item, found);
            }
        }
        _ => {}
    }
}
