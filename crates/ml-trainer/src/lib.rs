//! # Tier Classifier
//!
//! Trains and applies the decision tree that maps a bank-period's ratios to a
//! performance tier. Training targets are the ROE-quantile labels computed by
//! the analytics crate; the fitted tree generalizes them to any ratio vector.

pub mod classifier;
pub mod error;
pub mod features;
pub mod report;

pub use classifier::{TierClassifier, TrainedModel, MIN_TRAINING_RECORDS};
pub use error::TrainerError;
pub use features::{FeatureVector, FEATURES};
pub use report::{AverageMetrics, ClassMetrics, ClassificationReport};
