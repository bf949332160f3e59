//! Boundary service tests against a stub upstream client.

#![cfg(feature = "http-server")]

mod support;

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use kp_analyzer::config::AppConfig;
use kp_analyzer::http::{create_router, AppState};
use kp_analyzer::models::{Domain, SUMMARY_FILENAME};
use kp_analyzer::services::{ChartParams, FixedOffset, UpstreamClient};
use kp_analyzer::{KpError, KpResult};

use support::fixture_value;

/// Serves the sample documents, optionally failing one domain, and records
/// the parameters it was called with.
struct FixtureClient {
    failing: Option<Domain>,
    seen: Mutex<Vec<ChartParams>>,
}

impl FixtureClient {
    fn new(failing: Option<Domain>) -> Arc<Self> {
        Arc::new(Self {
            failing,
            seen: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl UpstreamClient for FixtureClient {
    async fn fetch(&self, domain: Domain, params: &ChartParams) -> KpResult<Value> {
        self.seen.lock().unwrap().push(params.clone());
        if self.failing == Some(domain) {
            return Err(KpError::fetch(domain, "HTTP status server error (502 Bad Gateway)"));
        }
        Ok(fixture_value(domain))
    }
}

fn app(dir: &std::path::Path, client: Arc<FixtureClient>) -> Router {
    let config = AppConfig {
        data_dir: dir.to_path_buf(),
        ..AppConfig::default()
    };
    create_router(AppState::new(config, client, Arc::new(FixedOffset(5.5))))
}

async fn post_json(app: Router, body: Value) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/generate-params")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn birth() -> Value {
    json!({"dob": "01/01/1990", "tob": "10:30", "lat": 28.61, "lon": 77.2})
}

#[tokio::test]
async fn test_health() {
    let dir = tempfile::tempdir().unwrap();
    let response = app(dir.path(), FixtureClient::new(None))
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_generate_params_runs_full_analysis() {
    let dir = tempfile::tempdir().unwrap();
    let client = FixtureClient::new(None);
    let (status, body) = post_json(app(dir.path(), client.clone()), birth()).await;

    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["status"], "success");
    assert_eq!(body["message"], "Full analysis completed");
    assert_eq!(body["generated_files"].as_array().unwrap().len(), 8);
    assert!(body["output_file"].as_str().unwrap().ends_with(SUMMARY_FILENAME));

    let seen = client.seen.lock().unwrap();
    assert_eq!(seen.len(), 7);
    assert!(seen.iter().all(|p| p.tz == 5.5 && p.dob == "01/01/1990"));
    assert!(dir.path().join(Domain::Yoga.input_filename()).exists());
}

#[tokio::test]
async fn test_explicit_tz_skips_lookup() {
    let dir = tempfile::tempdir().unwrap();
    let client = FixtureClient::new(None);
    let mut body = birth();
    body["tz"] = json!(-4.0);
    let (status, _) = post_json(app(dir.path(), client.clone()), body).await;

    assert_eq!(status, StatusCode::OK);
    assert!(client.seen.lock().unwrap().iter().all(|p| p.tz == -4.0));
}

#[tokio::test]
async fn test_missing_fields_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let client = FixtureClient::new(None);
    let (status, body) = post_json(app(dir.path(), client.clone()), json!({"dob": "01/01/1990", "lat": 1.0})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "error");
    assert_eq!(body["message"], "Missing required fields: tob, lon");
    assert!(client.seen.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_partial_fetch_reports_each_endpoint() {
    let dir = tempfile::tempdir().unwrap();
    let (status, body) = post_json(app(dir.path(), FixtureClient::new(Some(Domain::House))), birth()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Only 6/7 files created");
    let details = body["details"].as_array().unwrap();
    assert_eq!(details.len(), 7);
    let failed: Vec<&Value> = details.iter().filter(|d| d["status"] == "error").collect();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0]["domain"], "house");
    assert!(failed[0]["message"].as_str().unwrap().contains("502"));
    assert!(!dir.path().join(SUMMARY_FILENAME).exists());
}

#[tokio::test]
async fn test_invalid_upstream_document_is_server_error() {
    struct BrokenYogas;

    #[async_trait]
    impl UpstreamClient for BrokenYogas {
        async fn fetch(&self, domain: Domain, _params: &ChartParams) -> KpResult<Value> {
            if domain == Domain::Yoga {
                return Ok(json!({"status": 400, "response": "Invalid API key"}));
            }
            Ok(fixture_value(domain))
        }
    }

    let dir = tempfile::tempdir().unwrap();
    let config = AppConfig {
        data_dir: dir.path().to_path_buf(),
        ..AppConfig::default()
    };
    let router = create_router(AppState::new(config, Arc::new(BrokenYogas), Arc::new(FixedOffset(0.0))));
    let (status, body) = post_json(router, birth()).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["status"], "error");
    assert_eq!(body["code"], "ANALYSIS_FAILED");
    assert!(body["message"].as_str().unwrap().contains("yoga"));
    assert_eq!(body["details"]["domain"], "yoga");
    assert!(body["details"]["run_id"].is_string());
}

#[tokio::test]
async fn test_server_without_api_key_serves_health_but_not_reports() {
    let dir = tempfile::tempdir().unwrap();
    let config = AppConfig {
        data_dir: dir.path().to_path_buf(),
        ..AppConfig::default()
    };
    assert!(config.api.api_key.is_none());
    let router = create_router(AppState::without_client(config, Arc::new(FixedOffset(5.5))));

    let response = router
        .clone()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let (status, body) = post_json(router, birth()).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "CONFIGURATION_ERROR");
    assert!(body["message"].as_str().unwrap().contains("VEDIC_API_KEY"));
    assert!(!dir.path().join(Domain::Yoga.input_filename()).exists());
}
