use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::QueryRejection;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Data error: {0}")]
    Ingest(#[from] ingest::IngestError),
    #[error("Classifier error: {0}")]
    Trainer(#[from] ml_trainer::TrainerError),
    #[error("Configuration error: {0}")]
    Config(#[from] configuration::error::ConfigError),
    #[error("No classifier model is loaded")]
    ModelUnavailable,
    #[error("Not found: {0}")]
    NotFound(String),
    /// A query string or request body the extractors could not decode.
    #[error("Rejected request: {1}")]
    Rejected(StatusCode, String),
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Rejected(StatusCode::BAD_REQUEST, rejection.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Rejected(rejection.status(), rejection.body_text())
    }
}

/// Converts our custom `AppError` into an HTTP response.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Ingest(ingest_err) => {
                tracing::error!(error = ?ingest_err, "Data error.");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "The financial dataset could not be read".to_string(),
                )
            }
            AppError::Trainer(trainer_err) => {
                tracing::error!(error = ?trainer_err, "Classifier error.");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An error occurred during classification".to_string(),
                )
            }
            AppError::Config(config_err) => {
                tracing::error!(error = ?config_err, "Configuration error.");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "A server configuration error occurred".to_string(),
                )
            }
            AppError::ModelUnavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                "No classifier model is loaded; run `train` first".to_string(),
            ),
            AppError::NotFound(message) => (StatusCode::NOT_FOUND, message),
            AppError::Rejected(status, message) => {
                tracing::debug!(%status, %message, "Rejected request.");
                (status, message)
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
