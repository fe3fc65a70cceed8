use core_types::PerformanceTier;
use serde::{Deserialize, Serialize};
use smartcore::metrics::accuracy;
use std::collections::BTreeSet;

/// Precision, recall and F1 for a single tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassMetrics {
    pub tier: PerformanceTier,
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
    /// Number of held-out records whose true label is this tier.
    pub support: usize,
}

/// Aggregate of per-class metrics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AverageMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
}

/// Evaluation of the tree on the held-out split.
///
/// Classes are every tier seen in either the true or the predicted labels,
/// ordered by class code; `confusion_matrix[i][j]` counts records of class `i`
/// predicted as class `j`. Undefined ratios (no predictions, no support) count as 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationReport {
    pub accuracy: f64,
    pub classes: Vec<ClassMetrics>,
    pub macro_avg: AverageMetrics,
    pub weighted_avg: AverageMetrics,
    pub confusion_matrix: Vec<Vec<usize>>,
    pub total_support: usize,
}

fn safe_ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

fn f1(precision: f64, recall: f64) -> f64 {
    if precision + recall == 0.0 {
        0.0
    } else {
        2.0 * precision * recall / (precision + recall)
    }
}

impl ClassificationReport {
    /// Builds the report from class codes. Both slices must have the same length.
    pub fn from_predictions(y_true: &[i32], y_pred: &[i32]) -> Self {
        let labels: Vec<i32> = y_true
            .iter()
            .chain(y_pred.iter())
            .copied()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let index_of = |code: i32| labels.iter().position(|&c| c == code).unwrap_or(0);

        let mut confusion_matrix = vec![vec![0usize; labels.len()]; labels.len()];
        for (&t, &p) in y_true.iter().zip(y_pred.iter()) {
            confusion_matrix[index_of(t)][index_of(p)] += 1;
        }

        let classes: Vec<ClassMetrics> = labels
            .iter()
            .enumerate()
            .map(|(i, &code)| {
                let true_positives = confusion_matrix[i][i];
                let predicted: usize = confusion_matrix.iter().map(|row| row[i]).sum();
                let support: usize = confusion_matrix[i].iter().sum();
                let precision = safe_ratio(true_positives, predicted);
                let recall = safe_ratio(true_positives, support);
                ClassMetrics {
                    tier: PerformanceTier::from_code(code),
                    precision,
                    recall,
                    f1_score: f1(precision, recall),
                    support,
                }
            })
            .collect();

        let total_support: usize = classes.iter().map(|c| c.support).sum();
        let n_classes = classes.len().max(1) as f64;
        let macro_avg = AverageMetrics {
            precision: classes.iter().map(|c| c.precision).sum::<f64>() / n_classes,
            recall: classes.iter().map(|c| c.recall).sum::<f64>() / n_classes,
            f1_score: classes.iter().map(|c| c.f1_score).sum::<f64>() / n_classes,
        };
        let weight = |c: &ClassMetrics| safe_ratio(c.support, total_support);
        let weighted_avg = AverageMetrics {
            precision: classes.iter().map(|c| c.precision * weight(c)).sum(),
            recall: classes.iter().map(|c| c.recall * weight(c)).sum(),
            f1_score: classes.iter().map(|c| c.f1_score * weight(c)).sum(),
        };

        let accuracy = if y_true.is_empty() {
            0.0
        } else {
            accuracy(&y_true.to_vec(), &y_pred.to_vec())
        };

        Self {
            accuracy,
            classes,
            macro_avg,
            weighted_avg,
            confusion_matrix,
            total_support,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOW: i32 = 0;
    const MED: i32 = 1;
    const HIGH: i32 = 2;

    #[test]
    fn perfect_predictions_score_one() {
        let y = vec![LOW, MED, HIGH, HIGH];
        let report = ClassificationReport::from_predictions(&y, &y);
        assert_eq!(report.accuracy, 1.0);
        assert_eq!(report.macro_avg.f1_score, 1.0);
        assert_eq!(report.confusion_matrix, vec![vec![1, 0, 0], vec![0, 1, 0], vec![0, 0, 2]]);
    }

    #[test]
    fn per_class_metrics_match_hand_counts() {
        let y_true = vec![LOW, LOW, MED, MED, HIGH];
        let y_pred = vec![LOW, MED, MED, MED, LOW];
        let report = ClassificationReport::from_predictions(&y_true, &y_pred);

        assert!((report.accuracy - 0.6).abs() < 1e-12);
        assert_eq!(report.total_support, 5);

        let low = &report.classes[0];
        assert_eq!(low.tier, PerformanceTier::Low);
        assert_eq!(low.support, 2);
        assert!((low.precision - 0.5).abs() < 1e-12);
        assert!((low.recall - 0.5).abs() < 1e-12);

        let medium = &report.classes[1];
        assert!((medium.precision - 2.0 / 3.0).abs() < 1e-12);
        assert!((medium.recall - 1.0).abs() < 1e-12);
        assert!((medium.f1_score - 0.8).abs() < 1e-12);

        let high = &report.classes[2];
        assert_eq!(high.precision, 0.0);
        assert_eq!(high.recall, 0.0);
        assert_eq!(high.f1_score, 0.0);

        // (0.5 * 2 + 0.8 * 2 + 0 * 1) / 5
        assert!((report.weighted_avg.f1_score - 0.52).abs() < 1e-12);
    }

    #[test]
    fn classes_include_labels_only_predicted() {
        let report = ClassificationReport::from_predictions(&[LOW, LOW], &[LOW, 3]);
        let tiers: Vec<PerformanceTier> = report.classes.iter().map(|c| c.tier).collect();
        assert_eq!(tiers, vec![PerformanceTier::Low, PerformanceTier::Unknown]);
        assert_eq!(report.classes[1].support, 0);
    }
}
