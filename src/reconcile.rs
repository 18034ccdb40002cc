//! Join the planned layout with scanner reads and derive a per-well status.
use crate::layout::LayoutEntry;
use crate::payload::{ScanResults, WellScan};
use std::collections::BTreeSet;
use std::fmt;

/// Outcome for one planned well.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    NoScan,
    Empty,
    DecodeFailed,
    EmptyDecodeFailed,
}

impl Status {
    /// Status for a scanned well from its tube and decode flags.
    pub fn from_scan(scan: &WellScan) -> Self {
        match (scan.has_tube, scan.passed) {
            (true, true) => Status::Ok,
            (false, true) => Status::Empty,
            (true, false) => Status::DecodeFailed,
            (false, false) => Status::EmptyDecodeFailed,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Ok => "ok",
            Status::NoScan => "no_scan",
            Status::Empty => "empty",
            Status::DecodeFailed => "decode_failed",
            Status::EmptyDecodeFailed => "empty,decode_failed",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One line of the paired report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub position: String,
    pub sample_id: String,
    pub scanner_result: String,
    pub status: Status,
}

/// Report rows in layout order plus scanned wells the layout never mentions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    pub rows: Vec<ReportRow>,
    /// Sorted ascending.
    pub extra_positions: Vec<String>,
}

pub fn reconcile(layout: &[LayoutEntry], scan: &ScanResults) -> Reconciliation {
    let rows = layout
        .iter()
        .map(|entry| match scan.wells.get(&entry.position) {
            Some(well) => ReportRow {
                position: entry.position.clone(),
                sample_id: entry.sample_id.clone(),
                scanner_result: well.result.clone(),
                status: Status::from_scan(well),
            },
            None => ReportRow {
                position: entry.position.clone(),
                sample_id: entry.sample_id.clone(),
                scanner_result: String::new(),
                status: Status::NoScan,
            },
        })
        .collect();

    let planned: BTreeSet<&str> = layout.iter().map(|entry| entry.position.as_str()).collect();
    // BTreeMap keys iterate sorted, so the filtered list stays sorted.
    let extra_positions = scan
        .wells
        .keys()
        .filter(|position| !planned.contains(position.as_str()))
        .cloned()
        .collect();

    Reconciliation {
        rows,
        extra_positions,
    }
}

#[cfg(test)]
#[path = "reconcile_tests.rs"]
mod tests;
