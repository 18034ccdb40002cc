//! Reader payload transport.
//!
//! The reader exposes a plain JSON-over-HTTP endpoint. `auto` tries the
//! client backends in priority order and the first success wins. There is no
//! retry: when every backend fails, the last error is returned.
use crate::error::RackMatchError;
use crate::payload::parse_payload;
use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;
use std::time::{Duration, Instant};

mod curl_cli;
mod reqwest_client;
mod ureq_client;

/// Default reader endpoint for the 96-well project.
pub const DEFAULT_API_URL: &str = "http://10.10.10.1:5223/api/v1/projects/SBS%2096";

/// Backend selection as exposed on the command line and in settings files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Auto,
    #[value(alias = "urllib")]
    #[serde(alias = "urllib")]
    Ureq,
    #[value(alias = "requests")]
    #[serde(alias = "requests")]
    Reqwest,
    Curl,
}

impl Backend {
    /// Concrete transports to try, in order.
    pub fn transports(self) -> &'static [Transport] {
        match self {
            Backend::Auto => &[Transport::Ureq, Transport::Reqwest, Transport::Curl],
            Backend::Ureq => &[Transport::Ureq],
            Backend::Reqwest => &[Transport::Reqwest],
            Backend::Curl => &[Transport::Curl],
        }
    }
}

impl std::str::FromStr for Backend {
    type Err = anyhow::Error;

    fn from_str(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Backend::Auto),
            "ureq" | "urllib" => Ok(Backend::Ureq),
            "reqwest" | "requests" => Ok(Backend::Reqwest),
            "curl" => Ok(Backend::Curl),
            other => Err(anyhow::anyhow!(
                "unknown backend {other:?} (expected auto, ureq, reqwest, or curl)"
            )),
        }
    }
}

/// A single HTTP client implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    Ureq,
    Reqwest,
    Curl,
}

impl Transport {
    pub fn name(self) -> &'static str {
        match self {
            Transport::Ureq => "ureq",
            Transport::Reqwest => "reqwest",
            Transport::Curl => "curl",
        }
    }

    fn fetch(self, url: &str, options: &FetchOptions) -> Result<Value> {
        match self {
            Transport::Ureq => ureq_client::fetch(url, options),
            Transport::Reqwest => reqwest_client::fetch(url, options),
            Transport::Curl => curl_cli::fetch(url, options),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FetchOptions {
    pub timeout: Duration,
    /// Honor `HTTP_PROXY`-style environment settings. Off by default so the
    /// reader on the local network is reached directly.
    pub trust_env_proxies: bool,
}

/// Fetch the reader payload using the backends selected by `backend`.
pub fn fetch_payload(url: &str, backend: Backend, options: &FetchOptions) -> Result<Value> {
    fetch_with(url, backend.transports(), options)
}

/// Try each transport in order and return the first payload obtained.
pub fn fetch_with(url: &str, transports: &[Transport], options: &FetchOptions) -> Result<Value> {
    let mut last_error: Option<anyhow::Error> = None;
    for transport in transports {
        let start = Instant::now();
        match transport.fetch(url, options) {
            Ok(payload) => {
                tracing::info!(
                    backend = transport.name(),
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "reader payload fetched"
                );
                return Ok(payload);
            }
            Err(err) => {
                tracing::debug!(
                    backend = transport.name(),
                    error = %format!("{err:#}"),
                    "backend fetch failed"
                );
                last_error = Some(err);
            }
        }
    }
    Err(last_error.unwrap_or_else(|| RackMatchError::NoBackend.into()))
}

/// Load a payload captured from the reader earlier.
pub fn load_payload_file(path: &Path) -> Result<Value> {
    let bytes =
        std::fs::read(path).with_context(|| format!("read JSON payload {}", path.display()))?;
    parse_payload(&bytes).with_context(|| format!("parse JSON payload {}", path.display()))
}

#[cfg(test)]
#[path = "fetch_tests.rs"]
mod tests;
