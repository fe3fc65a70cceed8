use crate::error::TrainerError;
use core_types::{FinancialRecord, Metric};
use ndarray::Array2;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use smartcore::linalg::basic::matrix::DenseMatrix;

/// The ratios the tree splits on, in column order.
pub const FEATURES: [Metric; 5] = [
    Metric::Roa,
    Metric::Leverage,
    Metric::LiquidityRatio,
    Metric::CoverageRatio,
    Metric::CapitalizationRatio,
];

pub fn feature_names() -> Vec<String> {
    FEATURES.iter().map(|m| m.column().to_string()).collect()
}

/// One row of classifier input. Undefined ratios stay `None` until imputed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    #[serde(rename = "ROA", alias = "roa", default)]
    pub roa: Option<f64>,
    #[serde(rename = "Leverage", alias = "leverage", default)]
    pub leverage: Option<f64>,
    #[serde(default)]
    pub liquidity_ratio: Option<f64>,
    #[serde(default)]
    pub coverage_ratio: Option<f64>,
    #[serde(default)]
    pub capitalization_ratio: Option<f64>,
}

impl FeatureVector {
    pub fn from_record(record: &FinancialRecord) -> Self {
        Self {
            roa: record.metric(Metric::Roa),
            leverage: record.metric(Metric::Leverage),
            liquidity_ratio: record.metric(Metric::LiquidityRatio),
            coverage_ratio: record.metric(Metric::CoverageRatio),
            capitalization_ratio: record.metric(Metric::CapitalizationRatio),
        }
    }

    /// Values in [`FEATURES`] order.
    pub fn values(&self) -> [Option<f64>; 5] {
        [
            self.roa,
            self.leverage,
            self.liquidity_ratio,
            self.coverage_ratio,
            self.capitalization_ratio,
        ]
    }
}

/// Builds the raw feature frame; undefined ratios become nulls.
pub fn feature_frame(rows: &[FeatureVector]) -> Result<DataFrame, TrainerError> {
    let columns = FEATURES
        .iter()
        .enumerate()
        .map(|(j, metric)| {
            let values: Vec<Option<f64>> = rows.iter().map(|row| row.values()[j]).collect();
            Series::new(metric.column(), values)
        })
        .collect::<Vec<_>>();
    Ok(DataFrame::new(columns)?)
}

/// Per-column medians ignoring nulls. A column with no values at all gets 0.
pub fn column_medians(df: &DataFrame) -> Result<Vec<f64>, TrainerError> {
    FEATURES
        .iter()
        .map(|metric| Ok(df.column(metric.column())?.f64()?.median().unwrap_or(0.0)))
        .collect()
}

/// Replaces every null with its column's median.
pub fn impute(df: &DataFrame, medians: &[f64]) -> Result<DataFrame, TrainerError> {
    if medians.len() != FEATURES.len() {
        return Err(TrainerError::FeatureMismatch {
            expected: FEATURES.len(),
            found: medians.len(),
        });
    }
    let columns = FEATURES
        .iter()
        .zip(medians)
        .map(|(metric, median)| {
            let filled = df
                .column(metric.column())?
                .f64()?
                .fill_null_with_values(*median)?;
            Ok(filled.into_series())
        })
        .collect::<Result<Vec<_>, TrainerError>>()?;
    Ok(DataFrame::new(columns)?)
}

/// Converts an imputed frame into the row-major matrix `smartcore` expects.
pub fn to_matrix(df: &DataFrame) -> Result<DenseMatrix<f64>, TrainerError> {
    let array: Array2<f64> = df.to_ndarray::<Float64Type>(IndexOrder::C)?;
    let (rows, cols) = array.dim();
    let values = array
        .as_slice()
        .ok_or_else(|| TrainerError::Model("feature matrix is not contiguous".to_string()))?
        .to_vec();
    DenseMatrix::new(rows, cols, values, false).map_err(|e| TrainerError::Model(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(roa: Option<f64>, leverage: Option<f64>) -> FeatureVector {
        FeatureVector {
            roa,
            leverage,
            liquidity_ratio: Some(0.3),
            coverage_ratio: None,
            capitalization_ratio: Some(0.1),
        }
    }

    #[test]
    fn medians_skip_nulls_and_default_to_zero() {
        let rows = vec![
            row(Some(0.01), Some(8.0)),
            row(None, Some(12.0)),
            row(Some(0.03), None),
            row(Some(0.02), Some(10.0)),
        ];
        let df = feature_frame(&rows).unwrap();
        let medians = column_medians(&df).unwrap();
        assert_eq!(medians, vec![0.02, 10.0, 0.3, 0.0, 0.1]);
    }

    #[test]
    fn imputation_fills_every_null() {
        let rows = vec![row(Some(0.01), None), row(None, Some(4.0))];
        let df = feature_frame(&rows).unwrap();
        let filled = impute(&df, &[0.5, 2.0, 0.0, 0.7, 0.0]).unwrap();
        assert_eq!(filled.shape(), (2, 5));

        let array = filled.to_ndarray::<Float64Type>(IndexOrder::C).unwrap();
        assert_eq!(array[[0, 1]], 2.0);
        assert_eq!(array[[1, 0]], 0.5);
        assert_eq!(array[[1, 3]], 0.7);
        assert!(to_matrix(&filled).is_ok());
    }

    #[test]
    fn feature_vector_accepts_column_names_and_aliases() {
        let v: FeatureVector =
            serde_json::from_str(r#"{"ROA": 0.02, "leverage": 9.5, "coverage_ratio": 0.9}"#).unwrap();
        assert_eq!(v.roa, Some(0.02));
        assert_eq!(v.leverage, Some(9.5));
        assert_eq!(v.liquidity_ratio, None);
        assert_eq!(v.coverage_ratio, Some(0.9));
    }

    #[test]
    fn impute_rejects_wrong_median_count() {
        let df = feature_frame(&[row(None, None)]).unwrap();
        assert!(matches!(
            impute(&df, &[0.0; 3]),
            Err(TrainerError::FeatureMismatch { expected: 5, found: 3 })
        ));
    }
}
