//! Scanner payload walking and result extraction.
//!
//! The reader's JSON shape is not stable across firmware versions, so nodes
//! are matched structurally: any object carrying a `decode` object counts,
//! wherever it sits in the document.
use crate::error::RackMatchError;
use crate::position::normalize_position;
use anyhow::Result;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// `itemType` of a per-well decode node.
const ITEM_TYPE_WELL: i64 = 1;
/// `itemType` of the rack barcode decode node.
const ITEM_TYPE_RACK: i64 = 2;

/// Decode read for a single well.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WellScan {
    pub result: String,
    pub has_tube: bool,
    pub passed: bool,
}

/// Everything recovered from one scanner payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanResults {
    pub rack_id: String,
    pub wells: BTreeMap<String, WellScan>,
}

/// Parse a reader payload with no nesting limit.
///
/// serde_json stops at 128 levels by default; the recursion limit is lifted
/// and `serde_stacker` grows the stack on demand instead.
pub fn parse_payload(bytes: &[u8]) -> Result<Value> {
    let mut deserializer = serde_json::Deserializer::from_slice(bytes);
    deserializer.disable_recursion_limit();
    let payload = Value::deserialize(serde_stacker::Deserializer::new(&mut deserializer))?;
    deserializer.end()?;
    Ok(payload)
}

/// Depth-first iterator over object nodes that carry a `decode` object.
///
/// Uses an explicit stack, so arbitrarily deep payloads cannot overflow the
/// call stack. Traversal order is unspecified beyond being deterministic for
/// a given document.
pub struct DecodeNodes<'a> {
    stack: Vec<&'a Value>,
}

/// Walk `root` and yield every decode-bearing object node.
pub fn decode_nodes(root: &Value) -> DecodeNodes<'_> {
    DecodeNodes { stack: vec![root] }
}

impl<'a> Iterator for DecodeNodes<'a> {
    type Item = &'a Map<String, Value>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current) = self.stack.pop() {
            match current {
                Value::Object(map) => {
                    self.stack.extend(map.values());
                    if matches!(map.get("decode"), Some(Value::Object(_))) {
                        return Some(map);
                    }
                }
                Value::Array(items) => self.stack.extend(items.iter()),
                _ => {}
            }
        }
        None
    }
}

/// Pull the rack ID and per-well decode results out of a payload.
///
/// The first rack node encountered wins; a later well node for the same
/// position replaces an earlier one. Well nodes without an `id` are skipped.
pub fn extract_scan_results(payload: &Value) -> Result<ScanResults> {
    let mut rack_id: Option<String> = None;
    let mut wells = BTreeMap::new();

    for item in decode_nodes(payload) {
        let Some(decode) = item.get("decode").and_then(Value::as_object) else {
            continue;
        };
        let Some(result) = decode.get("result").filter(|value| is_truthy(value)) else {
            continue;
        };

        match item_type(item) {
            Some(ITEM_TYPE_RACK) => {
                if rack_id.is_none() {
                    rack_id = Some(scalar_text(result).trim().to_string());
                }
            }
            Some(ITEM_TYPE_WELL) => {
                let position_raw = item
                    .get("id")
                    .filter(|value| is_truthy(value))
                    .map(scalar_text)
                    .unwrap_or_default();
                let position_raw = position_raw.trim();
                if position_raw.is_empty() {
                    tracing::debug!("well decode node without id skipped");
                    continue;
                }
                wells.insert(
                    normalize_position(position_raw),
                    WellScan {
                        result: scalar_text(result).trim().to_string(),
                        has_tube: decode_flag(decode, "hasTube"),
                        passed: decode_flag(decode, "passed"),
                    },
                );
            }
            _ => {}
        }
    }

    let rack_id = rack_id.ok_or(RackMatchError::MissingRackId)?;
    if wells.is_empty() {
        return Err(RackMatchError::NoWellEntries.into());
    }
    tracing::debug!(%rack_id, wells = wells.len(), "scanner payload extracted");
    Ok(ScanResults { rack_id, wells })
}

fn item_type(item: &Map<String, Value>) -> Option<i64> {
    let value = item.get("itemType")?;
    if let Value::Bool(flag) = value {
        return Some(i64::from(*flag));
    }
    if let Some(kind) = value.as_i64() {
        return Some(kind);
    }
    let kind = value.as_f64()?;
    if kind.fract() == 0.0 {
        Some(kind as i64)
    } else {
        None
    }
}

fn decode_flag(decode: &Map<String, Value>, key: &str) -> bool {
    decode.get(key).is_some_and(is_truthy)
}

/// Loose truthiness: null, false, zero, and empty strings/containers are false.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
#[path = "payload_tests.rs"]
mod tests;
