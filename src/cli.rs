//! CLI argument parsing for the rack matching run.
//!
//! The CLI only collects inputs; settings precedence lives in `config`.
use crate::config::SettingsOverrides;
use crate::fetch::Backend;
use clap::Parser;
use std::path::PathBuf;

/// Root CLI entrypoint.
#[derive(Parser, Debug)]
#[command(
    name = "rackmatch",
    version,
    about = "Match a CSV rack layout to the latest scan from the rack reader",
    after_help = "Exit codes:\n  0  success\n  1  any failure other than a rack mismatch\n  2  scanned rack ID does not match the CSV file name\n\nExamples:\n  rackmatch data/racks/ALT00019226.csv\n  rackmatch ALT00019226.csv --json-file scan.json --output paired.csv\n  rackmatch ALT00019226.csv --backend curl --timeout 10"
)]
pub struct Args {
    /// CSV describing rack positions; its file stem must equal the rack ID
    #[arg(value_name = "CSV_PATH")]
    pub csv_path: PathBuf,

    /// Where to write the paired CSV (default: <stem>_paired.csv next to the input)
    #[arg(long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Reader API endpoint to query
    #[arg(long, value_name = "URL")]
    pub url: Option<String>,

    /// HTTP timeout in seconds when fetching from the reader (default: 5)
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<f64>,

    /// HTTP backend used to talk to the reader (default: auto)
    #[arg(long, value_enum)]
    pub backend: Option<Backend>,

    /// JSON payload captured from the reader; skips the API call
    #[arg(long, value_name = "PATH")]
    pub json_file: Option<PathBuf>,

    /// Let HTTP clients use proxy settings from the environment
    #[arg(long)]
    pub trust_env_proxies: bool,

    /// JSON settings file (url, timeout_seconds, backend, trust_env_proxies)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Emit debug diagnostics on stderr
    #[arg(long)]
    pub verbose: bool,
}

impl Args {
    pub fn settings_overrides(&self) -> SettingsOverrides {
        SettingsOverrides {
            url: self.url.clone(),
            timeout_seconds: self.timeout,
            backend: self.backend,
            trust_env_proxies: self.trust_env_proxies,
        }
    }
}
