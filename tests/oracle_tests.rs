//! Integration tests for the reflection gateway over real HTTP backends.
//!
//! Whatever the endpoint does, the oracle must answer with the fixed
//! fallback sentence and never surface an error.

use reverie::ai::{DreamOracle, GeminiClient, RelayClient};
use reverie::config::{GeminiSettings, RelaySettings};
use reverie::constants::{ANALYSIS_FALLBACK, REFLECTION_FALLBACK};
use serde_json::json;
use std::net::TcpListener;
use std::time::{Duration, Instant};

mod test_helpers;
use test_helpers::dead_endpoint;

fn gemini_oracle(base_url: &str, timeout: Option<Duration>) -> DreamOracle {
    let settings = GeminiSettings {
        base_url: base_url.to_string(),
        model: "gemini-2.0-flash".to_string(),
        api_key: "super-secret-key".to_string(),
    };
    DreamOracle::new(GeminiClient::new(settings, timeout).unwrap())
}

fn relay_oracle(url: &str, timeout: Option<Duration>) -> DreamOracle {
    let settings = RelaySettings {
        url: url.to_string(),
        token: None,
    };
    DreamOracle::new(RelayClient::new(settings, timeout).unwrap())
}

fn sample_dream() -> serde_json::Value {
    json!({
        "timestamp": 1700000000000i64,
        "keywords": { "scenes": ["悬崖"], "emotions": ["恐惧"] },
        "decoding": { "strongestEmotion": "恐惧", "movieTheme": "坠落" },
        "association": "最近压力很大"
    })
}

#[test]
fn test_gemini_success_path() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/v1beta/models/gemini-2.0-flash:generateContent")
        .match_header("x-goog-api-key", "super-secret-key")
        .with_status(200)
        .with_body(r#"{"candidates":[{"content":{"parts":[{"text":"坠落常与失控感有关"}]}}]}"#)
        .create();

    let text = gemini_oracle(&server.url(), None).reflect(&sample_dream());

    assert_eq!(text, "坠落常与失控感有关");
    mock.assert();
}

#[test]
fn test_server_error_gives_fallback() {
    let mut server = mockito::Server::new();
    server
        .mock("POST", "/v1beta/models/gemini-2.0-flash:generateContent")
        .with_status(500)
        .with_body("internal trace")
        .create();

    let oracle = gemini_oracle(&server.url(), None);
    assert_eq!(oracle.reflect(&sample_dream()), REFLECTION_FALLBACK);
    assert_eq!(oracle.analyze_patterns(&[sample_dream()]), ANALYSIS_FALLBACK);
}

#[test]
fn test_missing_text_gives_fallback() {
    let mut server = mockito::Server::new();
    server
        .mock("POST", "/v1beta/models/gemini-2.0-flash:generateContent")
        .with_status(200)
        .with_body(r#"{"candidates":[]}"#)
        .create();

    assert_eq!(
        gemini_oracle(&server.url(), None).reflect(&sample_dream()),
        REFLECTION_FALLBACK
    );
}

#[test]
fn test_malformed_body_gives_fallback() {
    let mut server = mockito::Server::new();
    server
        .mock("POST", "/generate")
        .with_status(200)
        .with_body("<html>gateway</html>")
        .create();

    let oracle = relay_oracle(&format!("{}/generate", server.url()), None);
    assert_eq!(oracle.reflect(&sample_dream()), REFLECTION_FALLBACK);
}

#[test]
fn test_unreachable_endpoint_gives_fallback() {
    let oracle = relay_oracle(&dead_endpoint("/generate"), None);
    assert_eq!(oracle.reflect(&sample_dream()), REFLECTION_FALLBACK);
    assert_eq!(oracle.analyze_patterns(&[json!({})]), ANALYSIS_FALLBACK);
}

#[test]
fn test_timeout_gives_fallback() {
    // Accepts connections at the kernel level but never answers
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}/generate", listener.local_addr().unwrap());

    let oracle = relay_oracle(&url, Some(Duration::from_millis(300)));
    let started = Instant::now();
    let text = oracle.reflect(&sample_dream());

    assert_eq!(text, REFLECTION_FALLBACK);
    assert!(started.elapsed() < Duration::from_secs(10));
    drop(listener);
}

#[test]
fn test_concurrent_calls_are_independent() {
    let mut server = mockito::Server::new();
    server
        .mock("POST", "/generate")
        .with_status(200)
        .with_body(r#"{"text":"ok"}"#)
        .expect(4)
        .create();

    let oracle = relay_oracle(&format!("{}/generate", server.url()), None);
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let oracle = oracle.clone();
            std::thread::spawn(move || oracle.reflect(&sample_dream()))
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), "ok");
    }
}
