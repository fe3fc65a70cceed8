use crate::calendar;
use crate::enums::{Metric, PerformanceTier};
use chrono::NaiveDate;
use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// One line of a published statement, addressed by category and indicator.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LineItem {
    pub category: String,
    pub indicator: String,
}

impl LineItem {
    pub fn new(category: impl Into<String>, indicator: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            indicator: indicator.into(),
        }
    }
}

/// Identifies one reporting period of one bank.
///
/// Months are kept as published (numbers or names); ordering compares them by
/// calendar position when they can be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PeriodKey {
    pub bank: String,
    pub year: i32,
    pub month: String,
}

impl PeriodKey {
    pub fn new(bank: impl Into<String>, year: i32, month: impl Into<String>) -> Self {
        Self {
            bank: bank.into(),
            year,
            month: month.into(),
        }
    }
}

impl Ord for PeriodKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.bank
            .cmp(&other.bank)
            .then(self.year.cmp(&other.year))
            .then_with(|| {
                let lhs = calendar::parse_month(&self.month);
                let rhs = calendar::parse_month(&other.month);
                lhs.cmp(&rhs)
            })
            .then_with(|| self.month.cmp(&other.month))
    }
}

impl PartialOrd for PeriodKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A per-bank, per-period financial record with its derived ratios.
///
/// Every ratio is `None` when its denominator is zero. Field order is the
/// column order of the processed CSV.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialRecord {
    #[serde(rename = "Bank")]
    pub bank: String,
    #[serde(rename = "Year")]
    pub year: i32,
    #[serde(rename = "Month")]
    pub month: String,

    // I. Statement fields
    pub net_income: Decimal,
    pub total_assets: Decimal,
    pub equity: Decimal,
    pub revenue: Decimal,

    // II. DuPont decomposition
    #[serde(rename = "ROA")]
    pub roa: Option<Decimal>,
    #[serde(rename = "Leverage")]
    pub leverage: Option<Decimal>,
    #[serde(rename = "ROE")]
    pub roe: Option<Decimal>,
    pub net_profit_margin: Option<Decimal>,
    pub asset_turnover: Option<Decimal>,

    pub classification: PerformanceTier,

    // III. Liquidity, funding, credit quality and capital
    pub liquidity_ratio: Option<Decimal>,
    pub deposit_diversity: Option<Decimal>,
    pub deposit_view_to_plazo: Option<Decimal>,
    pub coverage_ratio: Option<Decimal>,
    pub leverage_ratio_extra: Option<Decimal>,
    pub capitalization_ratio: Option<Decimal>,
    #[serde(rename = "adjusted_ROE")]
    pub adjusted_roe: Option<Decimal>,

    /// Set once a trained classifier has been applied.
    #[serde(default)]
    pub predicted_tier: Option<PerformanceTier>,
}

impl FinancialRecord {
    pub fn key(&self) -> PeriodKey {
        PeriodKey::new(self.bank.clone(), self.year, self.month.clone())
    }

    pub fn month_number(&self) -> Option<u32> {
        calendar::parse_month(&self.month)
    }

    pub fn period_start(&self) -> Option<NaiveDate> {
        calendar::period_start(self.year, &self.month)
    }

    /// The raw decimal value of a metric column.
    pub fn metric_decimal(&self, metric: Metric) -> Option<Decimal> {
        match metric {
            Metric::NetIncome => Some(self.net_income),
            Metric::TotalAssets => Some(self.total_assets),
            Metric::Equity => Some(self.equity),
            Metric::Revenue => Some(self.revenue),
            Metric::Roa => self.roa,
            Metric::Leverage => self.leverage,
            Metric::Roe => self.roe,
            Metric::NetProfitMargin => self.net_profit_margin,
            Metric::AssetTurnover => self.asset_turnover,
            Metric::LiquidityRatio => self.liquidity_ratio,
            Metric::DepositDiversity => self.deposit_diversity,
            Metric::DepositViewToPlazo => self.deposit_view_to_plazo,
            Metric::CoverageRatio => self.coverage_ratio,
            Metric::LeverageRatioExtra => self.leverage_ratio_extra,
            Metric::CapitalizationRatio => self.capitalization_ratio,
            Metric::AdjustedRoe => self.adjusted_roe,
        }
    }

    /// The metric as a float, for charting and model features.
    pub fn metric(&self, metric: Metric) -> Option<f64> {
        self.metric_decimal(metric).and_then(|d| d.to_f64())
    }
}
