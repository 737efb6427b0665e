//! Integration Tests for API Endpoints
//!
//! Runs the full request/response cycle against a local stand-in for the
//! exchange-rate API, over real HTTP.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Path, State},
    http::{Request, StatusCode},
    routing::get,
    Json, Router,
};
use fx_relay::{api::create_router, fetch::ReqwestTransport, AppState, Config};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower::ServiceExt;

const API_KEY: &str = "test-key";

// == Mock Exchange API ==

#[derive(Clone, Default)]
struct MockApi {
    calls: Arc<AtomicUsize>,
}

fn mock_rate(from: &str, to: &str) -> Option<f64> {
    match (from, to) {
        ("USD", "EUR") => Some(0.92),
        ("EUR", "USD") => Some(1.087),
        ("USD", "JPY") => Some(150.0),
        _ => None,
    }
}

fn mock_reply(key: &str, from: &str, to: &str, amount: Option<f64>) -> Json<Value> {
    if key != API_KEY {
        return Json(json!({ "result": "error", "error-type": "invalid-key" }));
    }
    if to == "QQQ" {
        return Json(json!({ "result": "error", "error-type": "quota-reached" }));
    }

    match mock_rate(from, to) {
        Some(rate) => {
            let mut body = json!({
                "result": "success",
                "base_code": from,
                "target_code": to,
                "conversion_rate": rate,
            });
            if let Some(amount) = amount {
                body["conversion_result"] = json!(amount * rate);
            }
            Json(body)
        }
        None => Json(json!({ "result": "error", "error-type": "unsupported-code" })),
    }
}

async fn pair_handler(
    State(api): State<MockApi>,
    Path((key, from, to)): Path<(String, String, String)>,
) -> Json<Value> {
    api.calls.fetch_add(1, Ordering::SeqCst);
    mock_reply(&key, &from, &to, None)
}

async fn pair_amount_handler(
    State(api): State<MockApi>,
    Path((key, from, to, amount)): Path<(String, String, String, f64)>,
) -> Json<Value> {
    api.calls.fetch_add(1, Ordering::SeqCst);
    mock_reply(&key, &from, &to, Some(amount))
}

async fn spawn_mock_api() -> (String, MockApi) {
    let api = MockApi::default();
    let app = Router::new()
        .route("/:key/pair/:from/:to", get(pair_handler))
        .route("/:key/pair/:from/:to/:amount", get(pair_amount_handler))
        .with_state(api.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}", addr), api)
}

// == Helper Functions ==

async fn create_test_app() -> (Router, MockApi) {
    let (base_url, api) = spawn_mock_api().await;
    let config = Config {
        api_base_url: base_url,
        api_key: API_KEY.to_string(),
        retry_count: 0,
        ..Config::default()
    };
    let state =
        AppState::with_transport(&config, Arc::new(ReqwestTransport::new().unwrap())).unwrap();
    (create_router(state), api)
}

async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

// == Convert Endpoint Tests ==

#[tokio::test]
async fn test_convert_fetches_then_caches() {
    let (app, api) = create_test_app().await;

    let (status, json) = get_json(&app, "/convert?amount=100&from=USD&to=EUR").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["source"], "network");
    assert_eq!(json["rate"], 0.92);
    assert!((json["converted_amount"].as_f64().unwrap() - 92.0).abs() < 1e-9);
    assert_eq!(json["display"], "100.00 USD = 92.00 EUR");
    assert_eq!(json["rate_display"], "1 USD = 0.9200 EUR");

    let (status, json) = get_json(&app, "/convert?amount=50&from=USD&to=EUR").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["source"], "cache");
    assert!((json["converted_amount"].as_f64().unwrap() - 46.0).abs() < 1e-9);

    assert_eq!(api.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_convert_identity_skips_network() {
    let (app, api) = create_test_app().await;

    let (status, json) = get_json(&app, "/convert?amount=42&from=EUR&to=EUR").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["rate"], 1.0);
    assert_eq!(json["converted_amount"], 42.0);
    assert_eq!(api.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_swap_uses_reverse_pair() {
    let (app, _api) = create_test_app().await;

    let (status, json) = get_json(&app, "/swap?amount=10&from=USD&to=EUR").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["from"], "EUR");
    assert_eq!(json["to"], "USD");
    assert_eq!(json["rate"], 1.087);
}

#[tokio::test]
async fn test_convert_validation_errors() {
    let (app, api) = create_test_app().await;

    for uri in [
        "/convert?amount=-5&from=USD&to=EUR",
        "/convert?amount=5&from=usd&to=EUR",
        "/convert?amount=5&from=USDX&to=EUR",
        "/convert?amount=abc&from=USD&to=EUR",
        "/convert?amount=2000000000&from=USD&to=EUR",
    ] {
        let (status, json) = get_json(&app, uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert_eq!(json["kind"], "validation", "{}", uri);
    }

    assert_eq!(api.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_convert_unsupported_currency() {
    let (app, _api) = create_test_app().await;

    let (status, json) = get_json(&app, "/convert?amount=5&from=USD&to=XYZ").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["kind"], "unsupported_currency");
}

#[tokio::test]
async fn test_convert_quota_reached() {
    let (app, api) = create_test_app().await;

    let (status, json) = get_json(&app, "/convert?amount=5&from=USD&to=QQQ").await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(json["kind"], "rate_limited");
    assert_eq!(api.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_concurrent_converts_share_one_fetch() {
    let (app, api) = create_test_app().await;

    let (a, b) = tokio::join!(
        get_json(&app, "/convert?amount=3&from=USD&to=JPY"),
        get_json(&app, "/convert?amount=3&from=USD&to=JPY"),
    );
    assert_eq!(a.0, StatusCode::OK);
    assert_eq!(b.0, StatusCode::OK);
    assert_eq!(a.1["converted_amount"], 450.0);
    assert_eq!(b.1["converted_amount"], 450.0);

    assert_eq!(api.calls.load(Ordering::SeqCst), 1);
}

// == Stats Endpoint Tests ==

#[tokio::test]
async fn test_stats_endpoint() {
    let (app, _api) = create_test_app().await;

    get_json(&app, "/convert?amount=100&from=USD&to=EUR").await;
    get_json(&app, "/convert?amount=100&from=USD&to=EUR").await;
    get_json(&app, "/convert?amount=100&from=USD&to=XYZ").await;

    let (status, json) = get_json(&app, "/stats").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["api_calls"], 2);
    assert_eq!(json["cache_hits"], 1);
    assert_eq!(json["errors"], 1);
    assert_eq!(json["error_rate"], 0.5);
    assert_eq!(json["cache_size"], 1);
    assert_eq!(json["pending_requests"], 0);
}

// == Health Endpoint Tests ==

#[tokio::test]
async fn test_health_endpoint() {
    let (app, _api) = create_test_app().await;

    let (status, json) = get_json(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert!(json.get("timestamp").is_some());
}
