//! Domain failures for layout loading, scan extraction, and rack matching.
//!
//! Plumbing failures (I/O, HTTP, JSON decoding) travel as `anyhow::Error`
//! with context; these variants are the ones callers may want to branch on.
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RackMatchError {
    #[error("row {line} in {path} has fewer than two columns: {row:?}")]
    RowTooShort {
        path: String,
        line: u64,
        row: Vec<String>,
    },

    #[error("row {line} in {path} is missing a position identifier")]
    MissingPosition { path: String, line: u64 },

    #[error("duplicate position {position} with conflicting sample IDs: {first:?} vs {second:?}")]
    ConflictingDuplicate {
        position: String,
        first: String,
        second: String,
    },

    #[error("no usable data found in {0}")]
    EmptyLayout(String),

    #[error("could not determine rack ID from the scanner payload")]
    MissingRackId,

    #[error("scanner payload did not contain any tube decode entries")]
    NoWellEntries,

    #[error("rack ID mismatch: scanned {scanned:?} but expected {expected:?}")]
    RackMismatch { scanned: String, expected: String },

    #[error("no HTTP backend is configured")]
    NoBackend,
}

impl RackMatchError {
    pub fn is_rack_mismatch(&self) -> bool {
        matches!(self, RackMatchError::RackMismatch { .. })
    }
}
