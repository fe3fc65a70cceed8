use chrono::NaiveDate;
use core_types::{FinancialRecord, PerformanceTier};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

/// Mean ROE of all selected banks for one month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoePoint {
    pub date: NaiveDate,
    pub average_roe: Decimal,
    pub observations: usize,
}

/// Averages ROE per calendar month, oldest first.
///
/// Records whose month cannot be parsed, or whose ROE is undefined, do not contribute.
pub fn average_roe_by_period<'a>(
    records: impl IntoIterator<Item = &'a FinancialRecord>,
) -> Vec<RoePoint> {
    let mut buckets: BTreeMap<NaiveDate, (Decimal, usize)> = BTreeMap::new();
    for record in records {
        let (Some(date), Some(roe)) = (record.period_start(), record.roe) else {
            continue;
        };
        let bucket = buckets.entry(date).or_insert((Decimal::ZERO, 0));
        match bucket.0.checked_add(roe) {
            Some(sum) => {
                bucket.0 = sum;
                bucket.1 += 1;
            }
            None => tracing::warn!(bank = %record.bank, %date, "ROE sum overflowed; record ignored."),
        }
    }

    buckets
        .into_iter()
        .filter(|(_, (_, n))| *n > 0)
        .map(|(date, (sum, n))| RoePoint {
            date,
            average_roe: sum / Decimal::from(n),
            observations: n,
        })
        .collect()
}

/// Which label a tally should read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TierSource {
    /// The ROE-quantile label computed during preprocessing.
    #[default]
    Reference,
    /// The decision tree's output; records not yet classified are skipped.
    Predicted,
}

impl TierSource {
    pub fn tier(&self, record: &FinancialRecord) -> Option<PerformanceTier> {
        match self {
            TierSource::Reference => Some(record.classification),
            TierSource::Predicted => record.predicted_tier,
        }
    }
}

/// Number of periods a bank spent in each tier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TierDistribution {
    pub bank: String,
    pub low: usize,
    pub medium: usize,
    pub high: usize,
    pub unknown: usize,
}

impl TierDistribution {
    pub fn total(&self) -> usize {
        self.low + self.medium + self.high + self.unknown
    }

    fn count(&mut self, tier: PerformanceTier) {
        match tier {
            PerformanceTier::Low => self.low += 1,
            PerformanceTier::Medium => self.medium += 1,
            PerformanceTier::High => self.high += 1,
            PerformanceTier::Unknown => self.unknown += 1,
        }
    }
}

/// Tier counts per bank, sorted by bank name.
pub fn tier_distribution<'a>(
    records: impl IntoIterator<Item = &'a FinancialRecord>,
    source: TierSource,
) -> Vec<TierDistribution> {
    let mut by_bank: BTreeMap<&str, TierDistribution> = BTreeMap::new();
    for record in records {
        let Some(tier) = source.tier(record) else {
            continue;
        };
        by_bank
            .entry(record.bank.as_str())
            .or_insert_with(|| TierDistribution {
                bank: record.bank.clone(),
                ..Default::default()
            })
            .count(tier);
    }
    by_bank.into_values().collect()
}
