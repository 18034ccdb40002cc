//! Run settings.
//!
//! Each setting resolves in priority order: explicit CLI flag, the optional
//! JSON settings file, `RACKMATCH_*` environment variables, then built-in
//! defaults.
use crate::fetch::{Backend, FetchOptions, DEFAULT_API_URL};
use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_TIMEOUT_SECS: f64 = 5.0;

pub const ENV_URL: &str = "RACKMATCH_URL";
pub const ENV_TIMEOUT: &str = "RACKMATCH_TIMEOUT";
pub const ENV_BACKEND: &str = "RACKMATCH_BACKEND";

/// Optional settings file (`--config`). Every field may be omitted.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SettingsFile {
    pub url: Option<String>,
    pub timeout_seconds: Option<f64>,
    pub backend: Option<Backend>,
    pub trust_env_proxies: Option<bool>,
}

/// Values given explicitly on the command line.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SettingsOverrides {
    pub url: Option<String>,
    pub timeout_seconds: Option<f64>,
    pub backend: Option<Backend>,
    pub trust_env_proxies: bool,
}

/// Fully resolved transport settings for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub url: String,
    pub backend: Backend,
    pub fetch: FetchOptions,
}

pub fn load_settings_file(path: &Path) -> Result<SettingsFile> {
    let bytes = fs::read(path).with_context(|| format!("read settings {}", path.display()))?;
    let settings: SettingsFile = serde_json::from_slice(&bytes)
        .with_context(|| format!("parse settings JSON {}", path.display()))?;
    Ok(settings)
}

/// Resolve settings using the process environment.
pub fn resolve_settings(
    overrides: &SettingsOverrides,
    file: Option<&SettingsFile>,
) -> Result<Settings> {
    resolve_settings_with_env(overrides, file, |key| std::env::var(key).ok())
}

pub fn resolve_settings_with_env<F>(
    overrides: &SettingsOverrides,
    file: Option<&SettingsFile>,
    env: F,
) -> Result<Settings>
where
    F: Fn(&str) -> Option<String>,
{
    let empty = SettingsFile::default();
    let file = file.unwrap_or(&empty);
    let env_value = |key: &str| env(key).filter(|value| !value.trim().is_empty());

    let url = overrides
        .url
        .clone()
        .or_else(|| file.url.clone())
        .or_else(|| env_value(ENV_URL))
        .unwrap_or_else(|| DEFAULT_API_URL.to_string());

    let timeout_seconds = match overrides.timeout_seconds.or(file.timeout_seconds) {
        Some(value) => value,
        None => match env_value(ENV_TIMEOUT) {
            Some(raw) => raw
                .trim()
                .parse::<f64>()
                .with_context(|| format!("parse {ENV_TIMEOUT}={raw:?} as seconds"))?,
            None => DEFAULT_TIMEOUT_SECS,
        },
    };
    let timeout = timeout_from_secs(timeout_seconds)?;

    let backend = match overrides.backend.or(file.backend) {
        Some(backend) => backend,
        None => match env_value(ENV_BACKEND) {
            Some(raw) => raw
                .parse::<Backend>()
                .with_context(|| format!("parse {ENV_BACKEND}"))?,
            None => Backend::default(),
        },
    };

    let trust_env_proxies =
        overrides.trust_env_proxies || file.trust_env_proxies.unwrap_or(false);

    Ok(Settings {
        url,
        backend,
        fetch: FetchOptions {
            timeout,
            trust_env_proxies,
        },
    })
}

fn timeout_from_secs(seconds: f64) -> Result<Duration> {
    if !(seconds.is_finite() && seconds > 0.0) {
        return Err(anyhow!("timeout must be a positive number of seconds (got {seconds})"));
    }
    Duration::try_from_secs_f64(seconds)
        .map_err(|err| anyhow!("timeout {seconds} is out of range: {err}"))
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
