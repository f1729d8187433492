//! Shared test utilities for the monguard workspace.
//!
//! This crate exists because `xtask` needs `normalize_nondeterministic` at
//! runtime (not behind `#[cfg(test)]`), so a `#[cfg(test)]` module inside
//! `monguard-types` would not suffice.

use serde_json::{Map, Value};

/// Normalize non-deterministic JSON fields for golden-file comparison.
///
/// 1. **Root-only**: `tool.version` is replaced with `"__VERSION__"` only when the
///    root object is a report envelope (`schema`, `tool`, `verdict`, `rules` and
///    `diagnostics` all present).
///
/// 2. **Recursive**: `started_at` and `finished_at` become `"__TIMESTAMP__"` at any depth.
pub fn normalize_nondeterministic(mut value: Value) -> Value {
    if let Some(obj) = value.as_object_mut() {
        let is_envelope = ["schema", "tool", "verdict", "rules", "diagnostics"]
            .iter()
            .all(|k| obj.contains_key(*k));
        if is_envelope
            && let Some(tool) = obj.get_mut("tool")
            && let Some(tool_obj) = tool.as_object_mut()
            && tool_obj.contains_key("version")
        {
            tool_obj.insert(
                "version".to_string(),
                Value::String("__VERSION__".to_string()),
            );
        }
    }
    normalize_timestamps_recursive(&mut value);
    value
}

/// Reduce every diagnostic range to `{ filename, line }` (the start line).
///
/// Golden reports pin which line a diagnostic lands on; exact columns and byte
/// offsets are covered by the loader's own tests.
pub fn coarsen_ranges(mut value: Value) -> Value {
    if let Some(diagnostics) = value
        .get_mut("diagnostics")
        .and_then(Value::as_array_mut)
    {
        for d in diagnostics {
            let Some(range) = d.get_mut("range") else {
                continue;
            };
            let mut coarse = Map::new();
            coarse.insert(
                "filename".to_string(),
                range.get("filename").cloned().unwrap_or(Value::Null),
            );
            coarse.insert(
                "line".to_string(),
                range
                    .pointer("/start/line")
                    .cloned()
                    .unwrap_or(Value::Null),
            );
            *range = Value::Object(coarse);
        }
    }
    value
}

fn normalize_timestamps_recursive(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for key in ["started_at", "finished_at"] {
                if map.contains_key(key) {
                    map.insert(key.to_string(), Value::String("__TIMESTAMP__".to_string()));
                }
            }
            for val in map.values_mut() {
                normalize_timestamps_recursive(val);
            }
        }
        Value::Array(arr) => {
            for val in arr.iter_mut() {
                normalize_timestamps_recursive(val);
            }
        }
        _ => {}
    }
}
