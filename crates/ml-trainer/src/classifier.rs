use crate::error::TrainerError;
use crate::features::{self, FeatureVector};
use crate::report::ClassificationReport;
use configuration::TrainingConfig;
use core_types::{FinancialRecord, PerformanceTier};
use serde::{Deserialize, Serialize};
use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::model_selection::train_test_split;
use smartcore::tree::decision_tree_classifier::{
    DecisionTreeClassifier, DecisionTreeClassifierParameters,
};
use std::collections::{BTreeMap, BTreeSet};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// Below this many records a held-out split is meaningless.
pub const MIN_TRAINING_RECORDS: usize = 5;

type Tree = DecisionTreeClassifier<f64, i32, DenseMatrix<f64>, Vec<i32>>;

/// The fitted model. A label set with a single class cannot be split, so it is
/// kept as a constant predictor.
#[derive(Serialize, Deserialize)]
enum Estimator {
    Tree(Tree),
    Constant(i32),
}

impl Estimator {
    fn predict(&self, x: &DenseMatrix<f64>, rows: usize) -> Result<Vec<i32>, TrainerError> {
        match self {
            Estimator::Tree(tree) => tree.predict(x).map_err(|e| TrainerError::Model(e.to_string())),
            Estimator::Constant(code) => Ok(vec![*code; rows]),
        }
    }
}

// This is the type of the artifact written to disk.
type ModelArtifact = (Estimator, TrainedModel);

/// Everything needed to reproduce inference, stored alongside the tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainedModel {
    pub feature_names: Vec<String>,
    pub model_type: String,
    pub training_info: ModelInfo,
    pub training_metadata: TrainingMetadata,
    pub preprocessing_info: PreprocessingInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    pub n_train_samples: usize,
    pub n_test_samples: usize,
    pub n_features: usize,
    /// Training label counts keyed by tier label.
    pub class_distribution: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingMetadata {
    pub training_date: String,
    pub model_parameters: ModelParameters,
    /// `None` when the dataset was too small to hold anything out.
    pub evaluation: Option<ClassificationReport>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelParameters {
    pub max_depth: u16,
    pub min_samples_leaf: usize,
    pub min_samples_split: usize,
    pub test_size: f32,
    pub seed: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreprocessingInfo {
    pub missing_value_strategy: String,
    /// Training-set medians, one per feature, used to fill undefined ratios.
    pub medians: Vec<f64>,
}

/// A decision tree that assigns performance tiers from ratio features.
pub struct TierClassifier {
    model: Estimator,
    metadata: TrainedModel,
}

impl TierClassifier {
    /// Fits the tree on the records' reference labels.
    ///
    /// Missing ratios are filled with the medians of the full dataset. Unless the
    /// held-out share rounds to zero rows, a shuffled split is kept aside and the
    /// returned metadata carries its classification report.
    pub fn train(
        records: &[FinancialRecord],
        params: &TrainingConfig,
    ) -> Result<Self, TrainerError> {
        if records.len() < MIN_TRAINING_RECORDS {
            return Err(TrainerError::NotEnoughData {
                required: MIN_TRAINING_RECORDS,
                found: records.len(),
            });
        }

        // 1. Feature preparation
        let rows: Vec<FeatureVector> = records.iter().map(FeatureVector::from_record).collect();
        let raw = features::feature_frame(&rows)?;
        let medians = features::column_medians(&raw)?;
        let x = features::to_matrix(&features::impute(&raw, &medians)?)?;
        let y: Vec<i32> = records.iter().map(|r| r.classification.code()).collect();
        tracing::debug!(?medians, "Imputation medians computed.");

        // 2. Data splitting
        let n_test = (records.len() as f32 * params.test_size) as usize;
        let (x_train, x_test, y_train, y_test) = if n_test > 0 {
            train_test_split(&x, &y, params.test_size, true, Some(params.seed))
        } else {
            tracing::warn!(records = records.len(), "Too few records for a held-out split; training on everything.");
            (x.clone(), x, y.clone(), Vec::new())
        };

        // 3. Model training
        let tree_params = DecisionTreeClassifierParameters::default()
            .with_max_depth(params.max_depth)
            .with_min_samples_leaf(params.min_samples_leaf)
            .with_min_samples_split(params.min_samples_split);
        let classes: BTreeSet<i32> = y_train.iter().copied().collect();
        let model = match classes.iter().next() {
            Some(&only) if classes.len() == 1 => {
                tracing::warn!(tier = %PerformanceTier::from_code(only), "Training labels hold a single tier; fitting a constant model.");
                Estimator::Constant(only)
            }
            _ => Estimator::Tree(
                Tree::fit(&x_train, &y_train, tree_params)
                    .map_err(|e| TrainerError::Model(e.to_string()))?,
            ),
        };

        // 4. Evaluation
        let evaluation = if y_test.is_empty() {
            None
        } else {
            let predictions = model.predict(&x_test, y_test.len())?;
            Some(ClassificationReport::from_predictions(&y_test, &predictions))
        };
        if let Some(report) = &evaluation {
            tracing::info!(accuracy = report.accuracy, test_samples = y_test.len(), "Evaluated decision tree.");
        }

        let mut class_distribution = BTreeMap::new();
        for &code in &y_train {
            *class_distribution
                .entry(PerformanceTier::from_code(code).to_string())
                .or_insert(0) += 1;
        }

        let metadata = TrainedModel {
            feature_names: features::feature_names(),
            model_type: match model {
                Estimator::Tree(_) => "DecisionTree",
                Estimator::Constant(_) => "Constant",
            }
            .to_string(),
            training_info: ModelInfo {
                n_train_samples: y_train.len(),
                n_test_samples: y_test.len(),
                n_features: features::FEATURES.len(),
                class_distribution,
            },
            training_metadata: TrainingMetadata {
                training_date: chrono::Utc::now().to_rfc3339(),
                model_parameters: ModelParameters {
                    max_depth: params.max_depth,
                    min_samples_leaf: params.min_samples_leaf,
                    min_samples_split: params.min_samples_split,
                    test_size: params.test_size,
                    seed: params.seed,
                },
                evaluation,
            },
            preprocessing_info: PreprocessingInfo {
                missing_value_strategy: "median".to_string(),
                medians,
            },
        };

        Ok(Self { model, metadata })
    }

    pub fn metadata(&self) -> &TrainedModel {
        &self.metadata
    }

    pub fn evaluation(&self) -> Option<&ClassificationReport> {
        self.metadata.training_metadata.evaluation.as_ref()
    }

    /// Predicts a tier for each feature row, imputing with the training medians.
    pub fn predict_features(&self, rows: &[FeatureVector]) -> Result<Vec<PerformanceTier>, TrainerError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let raw = features::feature_frame(rows)?;
        let x = features::to_matrix(&features::impute(&raw, &self.metadata.preprocessing_info.medians)?)?;
        let codes = self.model.predict(&x, rows.len())?;
        Ok(codes.into_iter().map(PerformanceTier::from_code).collect())
    }

    /// One tier per record, in input order.
    pub fn predict(&self, records: &[FinancialRecord]) -> Result<Vec<PerformanceTier>, TrainerError> {
        let rows: Vec<FeatureVector> = records.iter().map(FeatureVector::from_record).collect();
        self.predict_features(&rows)
    }

    /// Sets `predicted_tier` on every record.
    pub fn classify_records(&self, records: &mut [FinancialRecord]) -> Result<(), TrainerError> {
        let tiers = self.predict(records)?;
        for (record, tier) in records.iter_mut().zip(tiers) {
            record.predicted_tier = Some(tier);
        }
        Ok(())
    }

    /// Writes the tree and its metadata with bincode, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), TrainerError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let writer = BufWriter::new(File::create(path)?);
        bincode::serialize_into(writer, &(&self.model, &self.metadata))?;
        tracing::info!(path = %path.display(), "Saved decision tree model.");
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self, TrainerError> {
        let reader = BufReader::new(File::open(path)?);
        let (model, metadata): ModelArtifact = bincode::deserialize_from(reader)?;
        if metadata.preprocessing_info.medians.len() != features::FEATURES.len() {
            return Err(TrainerError::FeatureMismatch {
                expected: features::FEATURES.len(),
                found: metadata.preprocessing_info.medians.len(),
            });
        }
        tracing::info!(
            path = %path.display(),
            trained = %metadata.training_metadata.training_date,
            samples = metadata.training_info.n_train_samples,
            "Loaded classifier model."
        );
        Ok(Self { model, metadata })
    }
}
