use super::FetchOptions;
use crate::payload::parse_payload;
use anyhow::{Context, Result};
use serde_json::Value;
use ureq::Agent;

pub(super) fn fetch(url: &str, options: &FetchOptions) -> Result<Value> {
    let proxy = if options.trust_env_proxies {
        ureq::Proxy::try_from_env()
    } else {
        None
    };
    let agent: Agent = Agent::config_builder()
        .timeout_global(Some(options.timeout))
        .proxy(proxy)
        .build()
        .into();

    let mut response = agent
        .get(url)
        .call()
        .with_context(|| format!("failed to fetch data from {url}"))?;
    let body = response
        .body_mut()
        .read_to_vec()
        .with_context(|| format!("read response body from {url}"))?;
    parse_payload(&body).context("decode reader response as JSON")
}
