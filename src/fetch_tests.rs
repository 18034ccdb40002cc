use super::curl_cli::curl_args;
use super::{fetch_with, load_payload_file, Backend, FetchOptions, Transport};
use crate::error::RackMatchError;
use httpmock::prelude::*;
use serde_json::json;
use std::time::Duration;

fn options() -> FetchOptions {
    FetchOptions {
        timeout: Duration::from_secs(5),
        trust_env_proxies: false,
    }
}

fn sample_payload() -> serde_json::Value {
    json!({
        "items": [
            {"itemType": 2, "decode": {"result": "RACK01"}},
            {"itemType": 1, "id": "A1", "decode": {"result": "T1", "hasTube": true, "passed": true}}
        ]
    })
}

#[test]
fn auto_tries_every_transport_in_priority_order() {
    assert_eq!(
        Backend::Auto.transports(),
        &[Transport::Ureq, Transport::Reqwest, Transport::Curl]
    );
    assert_eq!(Backend::Curl.transports(), &[Transport::Curl]);
}

#[test]
fn parses_backend_names() {
    assert_eq!("auto".parse::<Backend>().expect("auto"), Backend::Auto);
    assert_eq!(" Reqwest ".parse::<Backend>().expect("reqwest"), Backend::Reqwest);
    assert!("httpie".parse::<Backend>().is_err());
}

#[test]
fn accepts_legacy_backend_spellings() {
    assert_eq!("requests".parse::<Backend>().expect("requests"), Backend::Reqwest);
    assert_eq!("urllib".parse::<Backend>().expect("urllib"), Backend::Ureq);
    assert_eq!(
        <Backend as clap::ValueEnum>::from_str("requests", false).expect("clap requests"),
        Backend::Reqwest
    );
    assert_eq!(
        <Backend as clap::ValueEnum>::from_str("urllib", false).expect("clap urllib"),
        Backend::Ureq
    );
    let from_file: Backend = serde_json::from_str("\"requests\"").expect("serde requests");
    assert_eq!(from_file, Backend::Reqwest);
}

#[test]
fn ureq_fetches_json_payload() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/api/v1/projects/rack");
        then.status(200)
            .header("content-type", "application/json")
            .json_body(sample_payload());
    });

    let payload = fetch_with(
        &server.url("/api/v1/projects/rack"),
        &[Transport::Ureq],
        &options(),
    )
    .expect("fetch via ureq");
    mock.assert();
    assert_eq!(payload, sample_payload());
}

#[test]
fn reqwest_fetches_json_payload() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/scan");
        then.status(200)
            .header("content-type", "application/json")
            .json_body(sample_payload());
    });

    let payload = fetch_with(&server.url("/scan"), &[Transport::Reqwest], &options())
        .expect("fetch via reqwest");
    mock.assert();
    assert_eq!(payload, sample_payload());
}

#[test]
fn first_success_stops_the_fallthrough() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/scan");
        then.status(200).json_body(sample_payload());
    });

    fetch_with(
        &server.url("/scan"),
        &[Transport::Ureq, Transport::Reqwest],
        &options(),
    )
    .expect("fetch payload");
    mock.assert_calls(1);
}

#[test]
fn failing_backends_fall_through_and_surface_last_error() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/scan");
        then.status(500).body("reader busy");
    });

    let url = server.url("/scan");
    let err = fetch_with(&url, &[Transport::Ureq, Transport::Reqwest], &options())
        .expect_err("server error");
    mock.assert_calls(2);
    assert!(
        err.to_string().contains(&format!("failed to fetch data from {url}")),
        "{err:#}"
    );
}

#[test]
fn invalid_json_is_an_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/scan");
        then.status(200).body("<html>not json</html>");
    });

    let err = fetch_with(&server.url("/scan"), &[Transport::Ureq], &options())
        .expect_err("invalid json");
    assert_eq!(err.to_string(), "decode reader response as JSON");
}

#[test]
fn empty_transport_list_is_an_error() {
    let err = fetch_with("http://127.0.0.1:1/", &[], &options()).expect_err("no backends");
    assert!(matches!(
        err.downcast_ref::<RackMatchError>(),
        Some(RackMatchError::NoBackend)
    ));
}

#[test]
fn curl_args_disable_proxies_and_clamp_timeout() {
    let args = curl_args(
        "http://reader/scan",
        &FetchOptions {
            timeout: Duration::from_millis(250),
            trust_env_proxies: false,
        },
    );
    assert_eq!(
        args,
        vec![
            "--silent",
            "--show-error",
            "--fail",
            "--max-time",
            "1",
            "--noproxy",
            "*",
            "http://reader/scan",
        ]
    );
}

#[test]
fn curl_args_keep_fractional_timeout_and_env_proxies() {
    let args = curl_args(
        "http://reader/scan",
        &FetchOptions {
            timeout: Duration::from_millis(2500),
            trust_env_proxies: true,
        },
    );
    assert_eq!(
        args,
        vec![
            "--silent",
            "--show-error",
            "--fail",
            "--max-time",
            "2.5",
            "http://reader/scan",
        ]
    );
}

#[test]
fn curl_fetches_json_payload_when_available() {
    if which::which("curl").is_err() {
        return;
    }
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/scan");
        then.status(200).json_body(sample_payload());
    });

    let payload = fetch_with(&server.url("/scan"), &[Transport::Curl], &options())
        .expect("fetch via curl");
    assert_eq!(payload, sample_payload());
}

#[test]
fn curl_reports_http_failures_when_available() {
    if which::which("curl").is_err() {
        return;
    }
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/scan");
        then.status(404);
    });

    let err = fetch_with(&server.url("/scan"), &[Transport::Curl], &options())
        .expect_err("not found");
    assert!(err.to_string().contains("404"), "{err:#}");
}

#[test]
fn loads_captured_payload_file() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("scan.json");
    std::fs::write(&path, sample_payload().to_string()).expect("write payload");

    assert_eq!(load_payload_file(&path).expect("load payload"), sample_payload());
}

#[test]
fn malformed_payload_file_names_the_path() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("scan.json");
    std::fs::write(&path, "{not json").expect("write payload");

    let err = load_payload_file(&path).expect_err("malformed payload");
    assert!(err.to_string().contains("scan.json"), "{err:#}");
}

#[test]
fn loads_deeply_nested_payload_file() {
    let depth = 200;
    let nodes = r#"{"itemType": 2, "decode": {"result": "R"}}, {"itemType": 1, "id": "A1", "decode": {"result": "T1", "hasTube": true, "passed": true}}"#;
    let text = format!("{}{nodes}{}", "[".repeat(depth), "]".repeat(depth));
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("scan.json");
    std::fs::write(&path, text).expect("write payload");

    let payload = load_payload_file(&path).expect("load deep payload");
    let scan = crate::payload::extract_scan_results(&payload).expect("extract scan results");
    assert_eq!(scan.rack_id, "R");
    assert!(scan.wells.contains_key("A01"));
}

#[test]
fn ureq_fetches_deeply_nested_payload() {
    let depth = 200;
    let body = format!("{}{{\"ok\": true}}{}", "[".repeat(depth), "]".repeat(depth));
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/scan");
        then.status(200).body(body.clone());
    });

    let payload = fetch_with(&server.url("/scan"), &[Transport::Ureq], &options())
        .expect("fetch deep payload");
    let mut current = &payload;
    for _ in 0..depth {
        current = &current[0];
    }
    assert_eq!(current, &json!({"ok": true}));
}
