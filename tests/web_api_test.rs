#![cfg(feature = "web")]
//! Web handler integration tests: routes, fallback behavior, and error
//! mapping, driven through the router without a live listener.

mod common;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use papertrader::adapters::web::{build_router, AppState};
use papertrader::domain::settings::Settings;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use common::*;

fn router_with_closes(closes: &[f64]) -> Router {
    let bars = close_bars("RELIANCE", closes);
    build_router(AppState {
        data_port: Arc::new(InMemoryDataPort::new().with_bars("RELIANCE", bars)),
        settings: Settings::default(),
    })
}

fn rally_closes() -> Vec<f64> {
    let mut closes = trending_closes(80, 100.0, 2.0);
    closes.extend(trending_closes(40, 260.0, -3.0));
    closes
}

async fn get(router: Router, uri: &str) -> (StatusCode, Value) {
    let response = router
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn post_json(router: Router, uri: &str, body: String) -> (StatusCode, Option<Value>) {
    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).ok())
}

#[tokio::test]
async fn backtest_returns_full_report() {
    let (status, body) = get(router_with_closes(&rally_closes()), "/api/backtest").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["symbol"], "RELIANCE");
    assert_eq!(body["strategy"], "SMA Crossover");
    assert_eq!(body["initial_capital"], 100_000.0);
    assert!(body["final_value"].is_number());
    assert!(body["trades"].is_array());
    assert!(body["chart_data"]["timestamps"].is_array());
    assert_eq!(
        body["chart_data"]["timestamps"].as_array().unwrap().len(),
        120
    );
}

#[tokio::test]
async fn unknown_strategy_falls_back_and_reports_substitution() {
    let (status, body) = get(
        router_with_closes(&rally_closes()),
        "/api/backtest?strategy=Moon%20Phase",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    // the report names the strategy actually run
    assert_eq!(body["strategy"], "SMA Crossover");
}

#[tokio::test]
async fn named_strategy_and_margin_are_honored() {
    let (status, body) = get(
        router_with_closes(&rally_closes()),
        "/api/backtest?strategy=RSI%20Oversold&margin=5x",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["strategy"], "RSI Oversold");
}

#[tokio::test]
async fn missing_symbol_maps_to_unprocessable() {
    let (status, body) = get(
        router_with_closes(&rally_closes()),
        "/api/backtest?symbol=GHOST",
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("no bar data for GHOST"));
}

#[tokio::test]
async fn custom_backtest_round_trips() {
    let mut closes = vec![100.0; 20];
    closes.extend([102.0, 104.0, 96.0, 95.0, 100.0]);

    let payload = json!({
        "buy_conditions": [
            {"indicator": "price", "operator": ">", "value": 101.0}
        ],
        "sell_conditions": [
            {"indicator": "price", "operator": "<", "value": 99.0}
        ],
        "buy_logic": "AND",
        "sell_logic": "AND"
    });

    let (status, body) = post_json(
        router_with_closes(&closes),
        "/api/backtest/custom",
        payload.to_string(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let body = body.unwrap();
    assert_eq!(body["strategy"], "Custom Strategy");
    assert_eq!(body["total_trades"], 2);
    assert_eq!(body["trades"][0]["action"], "BUY");
    assert_eq!(body["trades"][1]["action"], "SELL");
}

#[tokio::test]
async fn malformed_custom_payload_is_a_client_error() {
    let (status, _) = post_json(
        router_with_closes(&rally_closes()),
        "/api/backtest/custom",
        "{this is not json".to_string(),
    )
    .await;

    assert!(status.is_client_error());
}

#[tokio::test]
async fn broken_condition_degrades_instead_of_failing() {
    let payload = json!({
        "buy_conditions": [
            {"indicator": "NOT_A_COLUMN", "operator": ">", "value": 1.0}
        ],
        "sell_conditions": []
    });

    let (status, body) = post_json(
        router_with_closes(&rally_closes()),
        "/api/backtest/custom",
        payload.to_string(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.unwrap()["total_trades"], 0);
}

#[tokio::test]
async fn strategies_listing_covers_the_registry() {
    let (status, body) = get(router_with_closes(&rally_closes()), "/api/strategies").await;

    assert_eq!(status, StatusCode::OK);
    let strategies = body["strategies"].as_array().unwrap();
    assert_eq!(strategies.len(), 4);
    assert_eq!(body["default_strategy"], "SMA Crossover");
    assert_eq!(body["margins"], json!(["1x", "2x", "5x", "10x"]));

    let rsi = strategies
        .iter()
        .find(|s| s["name"] == "RSI Oversold")
        .unwrap();
    assert_eq!(rsi["has_exit_rules"], true);
}

#[tokio::test]
async fn unknown_route_is_json_404() {
    let (status, body) = get(router_with_closes(&rally_closes()), "/api/nope").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["message"].is_string());
}
