//! Paired report CSV output.
use crate::reconcile::ReportRow;
use anyhow::{Context, Result};
use std::io::Write;
use std::path::{Path, PathBuf};

pub const REPORT_HEADER: [&str; 4] = ["Position", "SampleID", "ScannerResult", "Status"];

/// `<stem>_paired.csv` next to the layout file.
pub fn default_output_path(csv_path: &Path) -> PathBuf {
    let stem = csv_path
        .file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .unwrap_or_default();
    csv_path.with_file_name(format!("{stem}_paired.csv"))
}

pub fn write_report(rows: &[ReportRow], output_path: &Path) -> Result<()> {
    let file = std::fs::File::create(output_path)
        .with_context(|| format!("create report {}", output_path.display()))?;
    write_rows(rows, file).with_context(|| format!("write report {}", output_path.display()))
}

fn write_rows<W: Write>(rows: &[ReportRow], sink: W) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::CRLF)
        .from_writer(sink);
    writer.write_record(REPORT_HEADER)?;
    for row in rows {
        writer.write_record([
            row.position.as_str(),
            row.sample_id.as_str(),
            row.scanner_result.as_str(),
            row.status.as_str(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
#[path = "report_tests.rs"]
mod tests;
