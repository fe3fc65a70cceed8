use crate::charts::{self, ChartKind, ChartPayload};
use crate::error::AppError;
use crate::i18n::{self, Labels, Language, TierLabel};
use crate::AppState;
use analytics::RecordFilter;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    response::Html,
    Json,
};
use axum_extra::extract::{Query, QueryRejection};
use core_types::{FinancialRecord, PerformanceTier};
use ml_trainer::FeatureVector;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;

const INDEX_HTML: &str = include_str!("../assets/index.html");

#[derive(Debug, Default, Deserialize)]
pub struct LangQuery {
    #[serde(default)]
    pub lang: Language,
}

#[derive(Debug, Serialize)]
pub struct FiltersResponse {
    pub banks: Vec<String>,
    pub years: Vec<i32>,
    pub months: Vec<String>,
    pub classifications: Vec<TierLabel>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ClassifyResponse {
    pub predicted_tier: PerformanceTier,
    pub label: String,
}

/// # GET /
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// # GET /api/health
pub async fn health(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "records": state.records.len(),
        "model_loaded": state.classifier.is_some(),
    }))
}

/// # GET /api/labels
pub async fn get_labels(
    query: Result<Query<LangQuery>, QueryRejection>,
) -> Result<Json<Labels>, AppError> {
    let Query(query) = query?;
    Ok(Json(i18n::labels(query.lang)))
}

/// # GET /api/filters
/// The choices offered by each filter; all of them are selected by default.
pub async fn get_filters(
    State(state): State<Arc<AppState>>,
    query: Result<Query<LangQuery>, QueryRejection>,
) -> Result<Json<FiltersResponse>, AppError> {
    let Query(query) = query?;
    let options = &state.options;
    Ok(Json(FiltersResponse {
        banks: options.banks.clone(),
        years: options.years.clone(),
        months: options.months.clone(),
        classifications: i18n::tier_labels(query.lang, &options.classifications),
    }))
}

/// # GET /api/records
pub async fn get_records(
    State(state): State<Arc<AppState>>,
    filter: Result<Query<RecordFilter>, QueryRejection>,
) -> Result<Json<Vec<FinancialRecord>>, AppError> {
    let Query(filter) = filter?;
    let selected = filter.apply(&state.records).into_iter().cloned().collect();
    Ok(Json(selected))
}

/// # GET /api/charts/:chart
pub async fn get_chart(
    Path(chart): Path<String>,
    State(state): State<Arc<AppState>>,
    query: Result<Query<LangQuery>, QueryRejection>,
    filter: Result<Query<RecordFilter>, QueryRejection>,
) -> Result<Json<ChartPayload>, AppError> {
    let (Query(query), Query(filter)) = (query?, filter?);
    let kind = ChartKind::from_slug(&chart)
        .ok_or_else(|| AppError::NotFound(format!("Unknown chart '{chart}'")))?;
    let selected = filter.apply(&state.records);
    tracing::debug!(chart = kind.slug(), records = selected.len(), "Rendering chart.");
    Ok(Json(charts::render(kind, &selected, query.lang)))
}

/// # POST /api/classify
/// Predicts the tier of a single set of ratios. Missing ratios are imputed.
pub async fn classify(
    State(state): State<Arc<AppState>>,
    query: Result<Query<LangQuery>, QueryRejection>,
    features: Result<Json<FeatureVector>, JsonRejection>,
) -> Result<Json<ClassifyResponse>, AppError> {
    let (Query(query), Json(features)) = (query?, features?);
    let classifier = state.classifier.as_ref().ok_or(AppError::ModelUnavailable)?;
    let predicted_tier = classifier
        .predict_features(&[features])?
        .into_iter()
        .next()
        .unwrap_or(PerformanceTier::Unknown);
    Ok(Json(ClassifyResponse {
        predicted_tier,
        label: i18n::tier_name(query.lang, predicted_tier).to_string(),
    }))
}
