use super::FetchOptions;
use crate::payload::parse_payload;
use anyhow::{Context, Result};
use serde_json::Value;

pub(super) fn fetch(url: &str, options: &FetchOptions) -> Result<Value> {
    let mut builder = reqwest::blocking::Client::builder().timeout(options.timeout);
    if !options.trust_env_proxies {
        builder = builder.no_proxy();
    }
    let client = builder.build().context("build HTTP client")?;

    let response = client
        .get(url)
        .send()
        .and_then(|response| response.error_for_status())
        .with_context(|| format!("failed to fetch data from {url}"))?;
    let body = response
        .bytes()
        .with_context(|| format!("read response body from {url}"))?;
    parse_payload(&body).context("decode reader response as JSON")
}
