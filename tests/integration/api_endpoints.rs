//! Integration tests for the query API
//!
//! These tests verify that:
//! - every read endpoint returns the expected shape
//! - staleness classification is applied at read time
//! - empty and unknown filters yield empty results, not errors
//! - malformed query parameters are rejected with 400

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::StatusCode;
use chrono::{Duration, TimeZone, Utc};
use serde_json::Value;
use telemetry_hub::{
    alerts::AlertLog,
    api::{ApiConfig, ApiState, spawn_api_server},
    registry::LiveRegistry,
    storage::HistoryStore,
};
use tempfile::TempDir;

use super::helpers::*;

struct TestApi {
    addr: SocketAddr,
    registry: LiveRegistry,
    alerts: AlertLog,
    history: Arc<HistoryStore>,
    _dir: TempDir,
}

async fn spawn_test_api() -> TestApi {
    let dir = tempfile::tempdir().unwrap();
    let registry = LiveRegistry::new();
    let alerts = AlertLog::new(100);
    let history = Arc::new(HistoryStore::new(dir.path().join("history.csv")));

    let state = ApiState::new(registry.clone(), alerts.clone(), history.clone(), 15);
    let config = ApiConfig {
        bind_addr: "127.0.0.1:0".parse().unwrap(),
        enable_cors: false,
    };

    let addr = spawn_api_server(config, state).await.unwrap();

    TestApi {
        addr,
        registry,
        alerts,
        history,
        _dir: dir,
    }
}

async fn get_json(addr: SocketAddr, path_and_query: &str) -> Value {
    let response = reqwest::Client::new()
        .get(format!("http://{addr}{path_and_query}"))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success(), "GET {path_and_query}");
    response.json().await.unwrap()
}

#[tokio::test]
async fn health_endpoint_returns_ok() {
    let api = spawn_test_api().await;

    let body = get_json(api.addr, "/api/v1/health").await;

    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn agents_endpoint_classifies_staleness_at_read_time() {
    let api = spawn_test_api().await;

    let mut stale = test_reading("Agent-X", 33.0);
    stale.timestamp = Utc::now() - Duration::seconds(60);
    api.registry.upsert(stale).await;
    api.registry.upsert(test_reading("Agent-Y", 44.0)).await;

    let body = get_json(api.addr, "/api/v1/agents").await;

    assert_eq!(body["count"], 2);
    let agents = body["agents"].as_array().unwrap();
    assert_eq!(agents[0]["status"], "OFFLINE");
    // Last known reading stays retrievable even when offline
    assert_eq!(agents[0]["reading"]["cpu_percent"], 33.0);
    assert_eq!(agents[1]["status"], "ONLINE");
}

#[tokio::test]
async fn alerts_endpoint_returns_capped_tail() {
    let api = spawn_test_api().await;

    for i in 0..15 {
        api.alerts.push(format!("alert {i}")).await;
    }

    let body = get_json(api.addr, "/api/v1/alerts").await;

    // Default limit is 10
    assert_eq!(body["count"], 10);
    let alerts = body["alerts"].as_array().unwrap();
    assert_eq!(alerts[0], "alert 5");
    assert_eq!(alerts[9], "alert 14");
}

#[tokio::test]
async fn history_endpoint_respects_agent_and_limit() {
    let api = spawn_test_api().await;

    for cpu in [10.0, 20.0, 30.0, 40.0, 50.0, 60.0] {
        api.history.append(&test_reading("Agent-1", cpu)).await.unwrap();
    }
    api.history.append(&test_reading("Agent-2", 99.0)).await.unwrap();

    let body = get_json(api.addr, "/api/v1/history?agent=Agent-1&limit=3").await;

    assert_eq!(body["count"], 3);
    let records = body["records"].as_array().unwrap();
    assert_eq!(records[0]["cpu_percent"], 40.0);
    assert_eq!(records[2]["cpu_percent"], 60.0);
}

#[tokio::test]
async fn unknown_agent_yields_empty_results_not_errors() {
    let api = spawn_test_api().await;

    api.history.append(&test_reading("Agent-1", 10.0)).await.unwrap();

    let history = get_json(api.addr, "/api/v1/history?agent=nope").await;
    assert_eq!(history["count"], 0);

    let stats = get_json(api.addr, "/api/v1/statistics?agent=nope").await;
    assert_eq!(stats["summary"]["total_records"], 0);
    assert_eq!(stats["summary"]["avg_cpu"], 0.0);
}

#[tokio::test]
async fn statistics_endpoint_aggregates_recent_window() {
    let api = spawn_test_api().await;

    api.history.append(&test_reading("Agent-1", 10.0)).await.unwrap();
    api.history.append(&test_reading("Agent-1", 50.0)).await.unwrap();
    api.history.append(&critical_reading("Agent-1", 95.0)).await.unwrap();

    let body = get_json(api.addr, "/api/v1/statistics?agent=Agent-1").await;
    let summary = &body["summary"];

    assert!((summary["avg_cpu"].as_f64().unwrap() - 51.67).abs() < 0.01);
    assert_eq!(summary["min_cpu"], 10.0);
    assert_eq!(summary["max_cpu"], 95.0);
    assert_eq!(summary["total_records"], 3);
    assert_eq!(summary["critical_count"], 1);
}

#[tokio::test]
async fn range_endpoints_filter_inclusively() {
    let api = spawn_test_api().await;

    let base = Utc.with_ymd_and_hms(2026, 8, 30, 12, 0, 0).unwrap();
    for offset in 0..5 {
        let mut reading = test_reading("Agent-1", (offset * 10) as f64);
        reading.timestamp = base + Duration::seconds(offset * 10);
        api.history.append(&reading).await.unwrap();
    }

    let body = get_json(
        api.addr,
        "/api/v1/history/range?agent=Agent-1&start=2026-08-30T12:00:10Z&end=2026-08-30T12:00:30Z",
    )
    .await;
    assert_eq!(body["count"], 3);

    let stats = get_json(
        api.addr,
        "/api/v1/statistics/range?agent=Agent-1&start=2026-08-30T12:00:10Z&end=2026-08-30T12:00:30Z",
    )
    .await;
    assert_eq!(stats["summary"]["total_records"], 3);
    assert_eq!(stats["summary"]["min_cpu"], 10.0);
    assert_eq!(stats["summary"]["max_cpu"], 30.0);
}

#[tokio::test]
async fn malformed_range_parameters_are_rejected() {
    let api = spawn_test_api().await;

    let response = reqwest::Client::new()
        .get(format!(
            "http://{}/api/v1/history/range?start=yesterday",
            api.addr
        ))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn empty_state_yields_empty_listings() {
    let api = spawn_test_api().await;

    let agents = get_json(api.addr, "/api/v1/agents").await;
    assert_eq!(agents["count"], 0);

    let alerts = get_json(api.addr, "/api/v1/alerts").await;
    assert_eq!(alerts["count"], 0);

    let history = get_json(api.addr, "/api/v1/history").await;
    assert_eq!(history["count"], 0);
}
