use core_types::{FinancialRecord, PerformanceTier};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A selection over the four dashboard dimensions.
///
/// An empty list for a dimension means "no restriction", which is how the
/// dashboard starts out: everything selected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordFilter {
    #[serde(rename = "bank")]
    pub banks: Vec<String>,
    #[serde(rename = "year")]
    pub years: Vec<i32>,
    #[serde(rename = "month")]
    pub months: Vec<String>,
    #[serde(rename = "classification")]
    pub classifications: Vec<PerformanceTier>,
}

impl RecordFilter {
    pub fn matches(&self, record: &FinancialRecord) -> bool {
        (self.banks.is_empty() || self.banks.iter().any(|b| *b == record.bank))
            && (self.years.is_empty() || self.years.contains(&record.year))
            && (self.months.is_empty() || self.months.iter().any(|m| *m == record.month))
            && (self.classifications.is_empty() || self.classifications.contains(&record.classification))
    }

    pub fn apply<'a>(&self, records: &'a [FinancialRecord]) -> Vec<&'a FinancialRecord> {
        records.iter().filter(|r| self.matches(r)).collect()
    }
}

/// The distinct, sorted values available for each filter dimension.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    pub banks: Vec<String>,
    pub years: Vec<i32>,
    pub months: Vec<String>,
    pub classifications: Vec<PerformanceTier>,
}

impl FilterOptions {
    pub fn from_records(records: &[FinancialRecord]) -> Self {
        let banks: BTreeSet<&str> = records.iter().map(|r| r.bank.as_str()).collect();
        let years: BTreeSet<i32> = records.iter().map(|r| r.year).collect();
        let classifications: BTreeSet<PerformanceTier> =
            records.iter().map(|r| r.classification).collect();

        // Calendar order where the month is recognizable, text order otherwise.
        let mut months: Vec<&FinancialRecord> = records.iter().collect();
        months.sort_by(|a, b| {
            a.month_number()
                .cmp(&b.month_number())
                .then_with(|| a.month.cmp(&b.month))
        });
        let mut seen = BTreeSet::new();
        let months = months
            .into_iter()
            .filter(|r| seen.insert(r.month.as_str()))
            .map(|r| r.month.clone())
            .collect();

        Self {
            banks: banks.into_iter().map(str::to_string).collect(),
            years: years.into_iter().collect(),
            months,
            classifications: classifications.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::record;

    fn sample() -> Vec<FinancialRecord> {
        vec![
            record("Banco A", 2022, "12", PerformanceTier::High),
            record("Banco A", 2023, "1", PerformanceTier::Low),
            record("Banco B", 2023, "1", PerformanceTier::Medium),
            record("Banco B", 2023, "2", PerformanceTier::Unknown),
            record("Banco C", 2023, "10", PerformanceTier::High),
        ]
    }

    #[test]
    fn empty_filter_selects_everything() {
        let records = sample();
        assert_eq!(RecordFilter::default().apply(&records).len(), records.len());
    }

    #[test]
    fn filter_returns_only_matching_records() {
        let records = sample();
        let filter = RecordFilter {
            banks: vec!["Banco A".to_string(), "Banco B".to_string()],
            years: vec![2023],
            months: vec!["1".to_string()],
            classifications: vec![],
        };
        let selected = filter.apply(&records);
        assert_eq!(selected.len(), 2);
        for r in &selected {
            assert!(r.bank == "Banco A" || r.bank == "Banco B");
            assert_eq!(r.year, 2023);
            assert_eq!(r.month, "1");
        }
    }

    #[test]
    fn filter_by_classification() {
        let records = sample();
        let filter = RecordFilter {
            classifications: vec![PerformanceTier::High],
            ..Default::default()
        };
        let banks: Vec<&str> = filter.apply(&records).iter().map(|r| r.bank.as_str()).collect();
        assert_eq!(banks, vec!["Banco A", "Banco C"]);
    }

    #[test]
    fn options_are_distinct_and_sorted() {
        let options = FilterOptions::from_records(&sample());
        assert_eq!(options.banks, vec!["Banco A", "Banco B", "Banco C"]);
        assert_eq!(options.years, vec![2022, 2023]);
        assert_eq!(options.months, vec!["1", "2", "10", "12"]);
        assert_eq!(
            options.classifications,
            vec![
                PerformanceTier::Low,
                PerformanceTier::Medium,
                PerformanceTier::High,
                PerformanceTier::Unknown
            ]
        );
    }
}
