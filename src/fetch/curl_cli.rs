//! Fetch through the system `curl`, for hosts where the in-process clients
//! cannot get through but curl can.
use super::FetchOptions;
use crate::payload::parse_payload;
use anyhow::{anyhow, Context, Result};
use serde_json::Value;
use std::process::Command;

/// Lower bound for curl's `--max-time`, in seconds.
const MIN_MAX_TIME_SECS: f64 = 1.0;

pub(super) fn fetch(url: &str, options: &FetchOptions) -> Result<Value> {
    let curl = which::which("curl").map_err(|_| anyhow!("curl command not found on PATH"))?;
    let output = Command::new(&curl)
        .args(curl_args(url, options))
        .output()
        .with_context(|| format!("run {}", curl.display()))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let stderr = stderr.trim();
        if stderr.is_empty() {
            let code = output
                .status
                .code()
                .map(|code| code.to_string())
                .unwrap_or_else(|| output.status.to_string());
            return Err(anyhow!("curl failed with exit code {code}"));
        }
        return Err(anyhow!("{stderr}"));
    }

    parse_payload(&output.stdout).context("curl returned invalid JSON")
}

pub(super) fn curl_args(url: &str, options: &FetchOptions) -> Vec<String> {
    let max_time = options.timeout.as_secs_f64().max(MIN_MAX_TIME_SECS);
    let mut args = vec![
        "--silent".to_string(),
        "--show-error".to_string(),
        "--fail".to_string(),
        "--max-time".to_string(),
        format!("{max_time}"),
    ];
    if !options.trust_env_proxies {
        args.push("--noproxy".to_string());
        args.push("*".to_string());
    }
    args.push(url.to_string());
    args
}
