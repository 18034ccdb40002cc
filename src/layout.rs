//! Rack layout CSV loading.
//!
//! A layout file has no header: each record is `position,sample_id[,...]`.
//! Positions are normalized on the way in so they share a keyspace with the
//! scanner payload.
use crate::error::RackMatchError;
use crate::position::normalize_position;
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// One planned well: normalized position and the sample expected there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutEntry {
    pub position: String,
    pub sample_id: String,
}

impl LayoutEntry {
    pub fn new(position: impl Into<String>, sample_id: impl Into<String>) -> Self {
        Self {
            position: position.into(),
            sample_id: sample_id.into(),
        }
    }
}

/// Load layout entries from a CSV file, preserving file order.
pub fn read_layout(csv_path: &Path) -> Result<Vec<LayoutEntry>> {
    let bytes = fs::read(csv_path).with_context(|| format!("read layout {}", csv_path.display()))?;
    let text = String::from_utf8(bytes)
        .with_context(|| format!("decode layout {} as UTF-8", csv_path.display()))?;
    parse_layout(&text, &csv_path.display().to_string())
}

/// Parse layout CSV text; `source` names the input in error messages.
pub fn parse_layout(text: &str, source: &str) -> Result<Vec<LayoutEntry>> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut entries = Vec::new();
    let mut seen: HashMap<String, String> = HashMap::new();
    for record in reader.records() {
        let record = record.with_context(|| format!("parse layout CSV {source}"))?;
        let line = record.position().map(|pos| pos.line()).unwrap_or_default();
        if record.is_empty() {
            continue;
        }
        if record.len() < 2 {
            return Err(RackMatchError::RowTooShort {
                path: source.to_string(),
                line,
                row: record.iter().map(str::to_string).collect(),
            }
            .into());
        }

        let position_raw = record[0].trim();
        let sample_id = record[1].trim();
        if position_raw.is_empty() {
            return Err(RackMatchError::MissingPosition {
                path: source.to_string(),
                line,
            }
            .into());
        }

        let position = normalize_position(position_raw);
        if let Some(existing) = seen.get(&position) {
            if existing != sample_id {
                return Err(RackMatchError::ConflictingDuplicate {
                    position,
                    first: existing.clone(),
                    second: sample_id.to_string(),
                }
                .into());
            }
            tracing::debug!(%position, line, "duplicate layout row collapsed");
            continue;
        }
        seen.insert(position.clone(), sample_id.to_string());
        entries.push(LayoutEntry::new(position, sample_id));
    }

    if entries.is_empty() {
        return Err(RackMatchError::EmptyLayout(source.to_string()).into());
    }
    Ok(entries)
}

#[cfg(test)]
#[path = "layout_tests.rs"]
mod tests;
