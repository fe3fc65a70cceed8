//! Integration tests for the dashboard API endpoints.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use tower::ServiceExt;

use configuration::TrainingConfig;
use core_types::{FinancialRecord, PerformanceTier};
use ml_trainer::TierClassifier;
use web_server::{build_router, AppState};

const BANKS: [&str; 3] = ["Banco A", "Banco B", "Banco C"];

/// Three banks over two years and five months; the tier follows ROA.
fn sample_records() -> Vec<FinancialRecord> {
    let mut records = Vec::new();
    for (i, bank) in BANKS.iter().enumerate() {
        for year in [2022, 2023] {
            for month in 1..=5 {
                let k = (i + month) % 3;
                let roa = dec!(0.005) + Decimal::from(k as u32) * dec!(0.01);
                let classification = match k {
                    0 => PerformanceTier::Low,
                    1 => PerformanceTier::Medium,
                    _ => PerformanceTier::High,
                };
                records.push(FinancialRecord {
                    bank: bank.to_string(),
                    year,
                    month: month.to_string(),
                    net_income: dec!(10),
                    total_assets: dec!(1000),
                    equity: dec!(100),
                    revenue: dec!(50),
                    roa: Some(roa),
                    leverage: Some(dec!(10)),
                    roe: Some(roa * dec!(10)),
                    net_profit_margin: Some(dec!(0.2)),
                    asset_turnover: Some(dec!(0.05)),
                    classification,
                    liquidity_ratio: Some(dec!(0.3)),
                    deposit_diversity: Some(dec!(0.7)),
                    deposit_view_to_plazo: Some(dec!(1.2)),
                    coverage_ratio: Some(dec!(0.9)),
                    leverage_ratio_extra: Some(dec!(0.9)),
                    capitalization_ratio: Some(dec!(0.1)),
                    adjusted_roe: Some(roa * dec!(11)),
                    predicted_tier: None,
                });
            }
        }
    }
    records
}

fn app_without_model() -> Router {
    let state = AppState::new(sample_records(), None).expect("state");
    build_router(Arc::new(state))
}

fn app_with_model() -> Router {
    let records = sample_records();
    let classifier = TierClassifier::train(&records, &TrainingConfig::default()).expect("train");
    let state = AppState::new(records, Some(classifier)).expect("state");
    build_router(Arc::new(state))
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&body).unwrap())
}

async fn post_json(app: Router, uri: &str, payload: Value) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn test_health_reports_dataset_and_model() {
    let (status, body) = get(app_without_model(), "/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["records"], 30);
    assert_eq!(body["model_loaded"], false);
}

#[tokio::test]
async fn test_index_serves_dashboard_page() {
    let response = app_without_model()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let html = String::from_utf8(body.to_vec()).unwrap();
    assert!(html.contains("plotly"));
    assert!(html.contains("/api/charts/"));
    // Table cells are filled as text, never parsed as markup.
    assert!(html.contains("textContent"));
    assert!(!html.contains("innerHTML"));
}

#[tokio::test]
async fn test_labels_follow_language() {
    let (_, english) = get(app_without_model(), "/api/labels").await;
    assert_eq!(english["title"], "DuPont AI Analyzer – Financial Diagnostic");

    let (status, spanish) = get(app_without_model(), "/api/labels?lang=es").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(spanish["title"], "DuPont AI Analyzer – Diagnóstico Financiero");
    assert_eq!(spanish["bank_filter"], "Seleccione Banco(s):");
    assert_eq!(spanish["views"].as_array().unwrap().len(), 7);
}

#[tokio::test]
async fn test_filters_list_distinct_sorted_values() {
    let (status, body) = get(app_without_model(), "/api/filters?lang=es").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["banks"], json!(BANKS));
    assert_eq!(body["years"], json!([2022, 2023]));
    assert_eq!(body["months"], json!(["1", "2", "3", "4", "5"]));
    assert_eq!(body["classifications"][0]["value"], "Low performance");
    assert_eq!(body["classifications"][0]["label"], "Rendimiento bajo");
}

#[tokio::test]
async fn test_records_filter_on_repeated_keys() {
    let (status, body) = get(
        app_without_model(),
        "/api/records?bank=Banco%20A&bank=Banco%20C&year=2023&month=2",
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let records = body.as_array().unwrap();
    assert_eq!(records.len(), 2);
    for record in records {
        assert!(record["Bank"] == "Banco A" || record["Bank"] == "Banco C");
        assert_eq!(record["Year"], 2023);
        assert_eq!(record["Month"], "2");
    }
}

#[tokio::test]
async fn test_records_without_filters_returns_everything() {
    let (_, body) = get(app_without_model(), "/api/records").await;
    assert_eq!(body.as_array().unwrap().len(), 30);
}

#[tokio::test]
async fn test_records_filter_on_classification() {
    let (_, body) = get(app_without_model(), "/api/records?classification=High%20performance").await;
    let records = body.as_array().unwrap();
    assert_eq!(records.len(), 10);
    assert!(records.iter().all(|r| r["classification"] == "High performance"));
}

#[tokio::test]
async fn test_chart_returns_figure_for_selection() {
    let (status, body) = get(
        app_without_model(),
        "/api/charts/roa-liquidity-coverage-3d?bank=Banco%20B",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["kind"], "figure");

    let traces = body["figure"]["data"].as_array().unwrap();
    assert_eq!(traces.len(), 1);
    assert_eq!(traces[0]["type"], "scatter3d");
    assert_eq!(traces[0]["x"].as_array().unwrap().len(), 10);
}

#[tokio::test]
async fn test_chart_with_empty_selection_returns_message() {
    let (status, body) = get(app_without_model(), "/api/charts/roa-coverage?year=1999&lang=es").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["kind"], "empty");
    assert_eq!(body["message"], "No hay datos disponibles para los filtros seleccionados.");
}

#[tokio::test]
async fn test_metrics_table_has_one_row_per_record() {
    let (_, body) = get(app_without_model(), "/api/charts/metrics-table?year=2022").await;
    assert_eq!(body["kind"], "table");
    assert_eq!(body["rows"].as_array().unwrap().len(), 15);
}

#[tokio::test]
async fn test_unknown_chart_is_not_found() {
    let (status, body) = get(app_without_model(), "/api/charts/pie").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("pie"));
}

#[tokio::test]
async fn test_classify_without_model_is_unavailable() {
    let (status, body) = post_json(app_without_model(), "/api/classify", json!({ "ROA": 0.02 })).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_classify_returns_a_known_tier() {
    let (status, body) = post_json(
        app_with_model(),
        "/api/classify?lang=es",
        json!({ "ROA": 0.025, "Leverage": 10.0, "liquidity_ratio": 0.3 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let tier: PerformanceTier = serde_json::from_value(body["predicted_tier"].clone()).unwrap();
    assert!(PerformanceTier::ALL.contains(&tier));
    assert!(body["label"].is_string());
}

#[tokio::test]
async fn test_model_predictions_are_attached_to_records() {
    let (status, body) = get(app_with_model(), "/api/records?bank=Banco%20A").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body
        .as_array()
        .unwrap()
        .iter()
        .all(|r| r["predicted_tier"].is_string()));
}

#[tokio::test]
async fn test_malformed_query_is_a_json_bad_request() {
    let (status, body) = get(app_without_model(), "/api/records?year=abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, body) = get(app_without_model(), "/api/charts/roe-time-series?classification=Great").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_unknown_language_is_a_json_bad_request() {
    let (status, body) = get(app_without_model(), "/api/labels?lang=fr").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_classify_with_invalid_body_is_a_json_error() {
    let (status, body) = post_json(app_with_model(), "/api/classify", json!({ "ROA": "x" })).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_classify_without_json_content_type_is_a_json_error() {
    let response = app_with_model()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/classify")
                .body(Body::from("{}"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert!(body["error"].is_string());
}
