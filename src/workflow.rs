//! One rack matching run: load the layout, obtain the payload, check the rack
//! identity, reconcile, and write the report.
use crate::cli::Args;
use crate::config::{load_settings_file, resolve_settings};
use crate::error::RackMatchError;
use crate::fetch::{fetch_payload, load_payload_file};
use crate::layout::read_layout;
use crate::payload::extract_scan_results;
use crate::reconcile::reconcile;
use crate::report::{default_output_path, write_report};
use anyhow::Result;
use serde_json::Value;
use std::path::{Path, PathBuf};

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;
/// Scripts branch on this to tell a wrong rack apart from other failures.
pub const EXIT_RACK_MISMATCH: u8 = 2;

/// What a successful run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub rack_id: String,
    pub matched: usize,
    pub output_path: PathBuf,
    /// Scanned positions missing from the layout, sorted.
    pub extra_positions: Vec<String>,
}

pub fn run(args: &Args) -> Result<RunSummary> {
    let layout = read_layout(&args.csv_path)?;
    tracing::debug!(entries = layout.len(), "layout loaded");

    let payload = obtain_payload(args)?;
    let scan = extract_scan_results(&payload)?;
    verify_rack_id(&scan.rack_id, &args.csv_path)?;

    let outcome = reconcile(&layout, &scan);
    let output_path = args
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&args.csv_path));
    write_report(&outcome.rows, &output_path)?;

    Ok(RunSummary {
        rack_id: scan.rack_id,
        matched: outcome.rows.len(),
        output_path,
        extra_positions: outcome.extra_positions,
    })
}

/// A captured payload file bypasses the network, so fetch settings are only
/// resolved (and validated) when the reader is actually contacted.
fn obtain_payload(args: &Args) -> Result<Value> {
    if let Some(json_file) = &args.json_file {
        tracing::debug!(path = %json_file.display(), "using captured payload");
        return load_payload_file(json_file);
    }

    let settings_file = args
        .config
        .as_deref()
        .map(load_settings_file)
        .transpose()?;
    let settings = resolve_settings(&args.settings_overrides(), settings_file.as_ref())?;
    tracing::debug!(url = %settings.url, backend = ?settings.backend, "fetching reader payload");
    fetch_payload(&settings.url, settings.backend, &settings.fetch)
}

/// The scanned rack must be the one the layout file is named after.
pub fn verify_rack_id(scanned: &str, csv_path: &Path) -> Result<(), RackMatchError> {
    let expected = csv_path
        .file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .unwrap_or_default();
    if scanned != expected {
        return Err(RackMatchError::RackMismatch {
            scanned: scanned.to_string(),
            expected,
        });
    }
    Ok(())
}

/// Map a run failure to the process exit status.
pub fn exit_code_for(err: &anyhow::Error) -> u8 {
    let rack_mismatch = err
        .chain()
        .filter_map(|cause| cause.downcast_ref::<RackMatchError>())
        .any(RackMatchError::is_rack_mismatch);
    if rack_mismatch {
        EXIT_RACK_MISMATCH
    } else {
        EXIT_FAILURE
    }
}

/// Warning line for scanned wells the layout does not plan for.
pub fn extra_positions_warning(extra_positions: &[String]) -> Option<String> {
    if extra_positions.is_empty() {
        return None;
    }
    Some(format!(
        "Warning: scanner reported positions not present in the CSV layout: {}",
        extra_positions.join(", ")
    ))
}

pub fn summary_line(summary: &RunSummary) -> String {
    format!(
        "Matched {} positions. Output written to {} (scanned rack ID: {}).",
        summary.matched,
        summary.output_path.display(),
        summary.rack_id
    )
}

#[cfg(test)]
#[path = "workflow_tests.rs"]
mod tests;
