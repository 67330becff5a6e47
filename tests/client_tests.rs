/// Client tests against a stub analysis service.
///
/// Covers the request body contract, error classification (timeout, HTTP,
/// network) and the model catalog fallback.
mod common;

use std::time::Duration;

use common::{ANALYZE_OK, Reply, StubServer, closed_port_url, config_for};
use greencode::analytics::logger::EventLog;
use greencode::api::GreenCodeClient;
use greencode::api::normalize::normalize;
use greencode::error::{ErrorKind, GreenCodeError};
use greencode::model::{OptimizationContext, OptimizationRequest};

fn client(cfg: &greencode::config::GreenCodeConfig) -> GreenCodeClient {
    GreenCodeClient::from_config(cfg).with_event_log(EventLog::disabled())
}

fn sample_request() -> OptimizationRequest {
    OptimizationRequest::new("x=1\nprint(x)", OptimizationContext::Performance, "huggingface")
}

// ---------------------------------------------------------------------------
// POST /analyze
// ---------------------------------------------------------------------------

#[test]
fn analyze_posts_full_request_body() {
    let stub = StubServer::start(vec![Reply::json(200, ANALYZE_OK)]);
    let payload = client(&stub.config()).send(&sample_request()).unwrap();

    let seen = stub.next_request();
    assert_eq!(seen.method, "POST");
    assert_eq!(seen.url, "/analyze");
    let body: serde_json::Value = serde_json::from_str(&seen.body).unwrap();
    assert_eq!(
        body,
        serde_json::json!({
            "code": "x=1\nprint(x)",
            "advanced": true,
            "context": "performance",
            "variants": true,
            "model": "huggingface",
        })
    );

    let result = normalize(payload).unwrap();
    assert_eq!(result.optimized_code, "print(1)");
}

#[test]
fn model_is_omitted_when_selection_is_off() {
    let stub = StubServer::start(vec![Reply::json(200, ANALYZE_OK)]);
    let mut cfg = stub.config();
    cfg.features.model_selection = false;
    client(&cfg).send(&sample_request()).unwrap();

    let body: serde_json::Value = serde_json::from_str(&stub.next_request().body).unwrap();
    assert!(body.get("model").is_none());
    assert_eq!(body["context"], "performance");
}

#[test]
fn slow_service_times_out() {
    let stub = StubServer::start(vec![
        Reply::json(200, ANALYZE_OK).delayed(Duration::from_millis(1500)),
    ]);
    let mut cfg = stub.config();
    cfg.api.timeout_ms = 200;

    let err = client(&cfg).send(&sample_request()).unwrap_err();
    assert_eq!(err, GreenCodeError::Timeout { timeout_ms: 200 });
    assert!(err.to_string().contains("200 ms"));
}

#[test]
fn http_error_uses_server_message() {
    let stub = StubServer::start(vec![Reply::json(500, r#"{"error": "model crashed"}"#)]);
    let err = client(&stub.config()).send(&sample_request()).unwrap_err();
    assert_eq!(
        err,
        GreenCodeError::Http {
            status: 500,
            message: "model crashed".to_string(),
        }
    );
    assert_eq!(err.status(), Some(500));
}

#[test]
fn http_error_without_body_uses_generic_message() {
    let stub = StubServer::start(vec![Reply::json(503, "upstream down")]);
    let err = client(&stub.config()).send(&sample_request()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Http);
    assert_eq!(err.to_string(), "API request failed with status 503");
}

#[test]
fn unreachable_service_is_network_error() {
    let cfg = config_for(&closed_port_url());
    let err = client(&cfg).send(&sample_request()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Network);
}

#[test]
fn mistyped_score_still_completes() {
    let stub = StubServer::start(vec![Reply::json(
        200,
        r#"{"optimized_code": "print(1)", "green_score": {"original": "60", "optimized": 85}}"#,
    )]);
    let payload = client(&stub.config()).send(&sample_request()).unwrap();
    let result = normalize(payload).unwrap();

    assert_eq!(result.optimized_code, "print(1)");
    assert!(result.score.is_none());
}

#[test]
fn non_json_success_is_malformed() {
    let stub = StubServer::start(vec![Reply::json(200, "<html>oops</html>")]);
    let err = client(&stub.config()).send(&sample_request()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedResponse);
}

// ---------------------------------------------------------------------------
// GET /models
// ---------------------------------------------------------------------------

#[test]
fn models_from_service_are_deduplicated() {
    let stub = StubServer::start(vec![Reply::json(
        200,
        r#"{
            "models": [
                {"key": "openai", "name": "OpenAI GPT", "status": "available"},
                {"key": "openai", "name": "Duplicate"},
                {"key": "starcoder1b", "name": "StarCoder 1B", "status": "pending"}
            ],
            "default_model": "openai"
        }"#,
    )]);
    let catalog = client(&stub.config()).fetch_models();

    assert_eq!(stub.next_request().url, "/models");
    assert!(!catalog.from_fallback);
    assert_eq!(catalog.default_model, "openai");
    assert_eq!(catalog.models.len(), 2);
    assert_eq!(catalog.get("openai").unwrap().display_name, "OpenAI GPT");
}

#[test]
fn models_fall_back_on_error_status() {
    let stub = StubServer::start(vec![Reply::json(500, r#"{"error": "boom"}"#)]);
    let cfg = stub.config();
    let catalog = client(&cfg).fetch_models();

    assert!(catalog.from_fallback);
    assert_eq!(catalog.default_model, cfg.default_model);
    assert_eq!(catalog.models, cfg.models);
}

#[test]
fn models_fall_back_when_unreachable() {
    let cfg = config_for(&closed_port_url());
    let catalog = client(&cfg).fetch_models();
    assert!(catalog.from_fallback);
    assert!(catalog.get("huggingface").is_some());
}

#[test]
fn models_fallback_is_logged() {
    let path = std::env::temp_dir().join(format!(
        "greencode-models-fallback-{}.jsonl",
        std::process::id()
    ));
    let _ = std::fs::remove_file(&path);
    let cfg = config_for(&closed_port_url());
    GreenCodeClient::from_config(&cfg)
        .with_event_log(EventLog::at(&path))
        .fetch_models();

    let entries = EventLog::at(&path).read_all();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].error_kind.as_deref(), Some("network"));
    let _ = std::fs::remove_file(path);
}

// ---------------------------------------------------------------------------
// GET /health, POST /clear-cache
// ---------------------------------------------------------------------------

#[test]
fn health_returns_payload() {
    let stub = StubServer::start(vec![Reply::json(200, r#"{"status": "healthy"}"#)]);
    let health = client(&stub.config()).fetch_health().unwrap();
    assert_eq!(stub.next_request().url, "/health");
    assert!(health.is_healthy());
}

#[test]
fn clear_cache_acknowledges() {
    let stub = StubServer::start(vec![Reply::json(200, r#"{"message": "Cache cleared"}"#)]);
    let ack = client(&stub.config()).clear_model_cache().unwrap();

    let seen = stub.next_request();
    assert_eq!(seen.method, "POST");
    assert_eq!(seen.url, "/clear-cache");
    assert_eq!(ack.message(), Some("Cache cleared"));
}

#[test]
fn clear_cache_failure_is_wrapped() {
    let stub = StubServer::start(vec![Reply::json(500, r#"{"error": "busy"}"#)]);
    let err = client(&stub.config()).clear_model_cache().unwrap_err();

    assert_eq!(err.kind(), ErrorKind::CacheClear);
    assert_eq!(err.status(), Some(500));
    assert_eq!(err.to_string(), "Failed to clear model cache: busy");
}
