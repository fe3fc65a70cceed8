use analytics::FilterOptions;
use axum::{
    routing::{get, post},
    Router,
};
use configuration::Config;
use core_types::FinancialRecord;
use ml_trainer::TierClassifier;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

pub mod charts;
pub mod error;
pub mod handlers;
pub mod i18n;

use error::AppError;

/// The shared application state that all handlers can access.
///
/// Loaded once at start-up and never mutated afterwards.
pub struct AppState {
    pub records: Vec<FinancialRecord>,
    pub options: FilterOptions,
    pub classifier: Option<TierClassifier>,
}

impl AppState {
    /// When a classifier is given, every record gets its `predicted_tier`.
    pub fn new(
        mut records: Vec<FinancialRecord>,
        classifier: Option<TierClassifier>,
    ) -> Result<Self, AppError> {
        if let Some(classifier) = &classifier {
            classifier.classify_records(&mut records)?;
        }
        let options = FilterOptions::from_records(&records);
        Ok(Self {
            records,
            options,
            classifier,
        })
    }

    /// Reads the processed dataset and, if it exists, the trained model.
    pub fn load(config: &Config) -> Result<Self, AppError> {
        let data = &config.data;
        let records = ingest::read_records(&data.processed_path)?;
        tracing::info!(
            records = records.len(),
            path = %data.processed_path.display(),
            "Loaded processed dataset."
        );

        let classifier = if data.model_path.exists() {
            let classifier = TierClassifier::load(&data.model_path)?;
            tracing::info!(path = %data.model_path.display(), "Loaded classifier model.");
            Some(classifier)
        } else {
            tracing::warn!(
                path = %data.model_path.display(),
                "No classifier model found; predictions are disabled."
            );
            None
        };

        Self::new(records, classifier)
    }
}

/// Assembles the dashboard routes and middleware around the given state.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods(Any)
        .allow_headers(AllowHeaders::any());

    Router::new()
        .route("/", get(handlers::index))
        .route("/api/health", get(handlers::health))
        .route("/api/labels", get(handlers::get_labels))
        .route("/api/filters", get(handlers::get_filters))
        .route("/api/records", get(handlers::get_records))
        .route("/api/charts/:chart", get(handlers::get_chart))
        .route("/api/classify", post(handlers::classify))
        .with_state(state)
        .layer(cors)
        // Logs every incoming request.
        .layer(TraceLayer::new_for_http())
}

/// The main function to configure and run the web server.
pub async fn run_server(addr: SocketAddr, state: Arc<AppState>) -> anyhow::Result<()> {
    let app = build_router(state);

    tracing::info!("Dashboard listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
