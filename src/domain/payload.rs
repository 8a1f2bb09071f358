//! Presence tracking for partial payloads.
//!
//! A decoded record cannot tell "field sent as zero" from "field not sent", so
//! the set of supplied keys is read separately from the raw body.

use serde_json::Value as JsonValue;
use std::collections::{BTreeMap, BTreeSet};

/// Returns the top-level keys of `raw`, or `None` if it is not a JSON object.
///
/// `{}` yields an empty set. Values are parsed but never inspected.
pub fn extract_present_fields(raw: &[u8]) -> Option<BTreeSet<String>> {
    match serde_json::from_slice::<JsonValue>(raw) {
        Ok(JsonValue::Object(map)) => Some(map.into_iter().map(|(k, _)| k).collect()),
        _ => None,
    }
}

/// Maps wire field names to storage columns.
///
/// Names without a mapping entry are dropped. Output follows the mapping's
/// key order, so it is stable for a given input.
pub fn translate(wire_fields: &BTreeSet<String>, mapping: &BTreeMap<String, String>) -> Vec<String> {
    mapping
        .iter()
        .filter(|(wire, _)| wire_fields.contains(*wire))
        .map(|(_, column)| column.clone())
        .collect()
}
