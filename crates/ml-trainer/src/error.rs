use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrainerError {
    #[error("Data frame error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),

    #[error("Model error: {0}")]
    Model(String),

    #[error("Failed to access model file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to (de)serialize model: {0}")]
    Serialization(#[from] bincode::Error),

    #[error("At least {required} records are needed to train, got {found}")]
    NotEnoughData { required: usize, found: usize },

    #[error("Model expects {expected} features, got {found}")]
    FeatureMismatch { expected: usize, found: usize },
}
