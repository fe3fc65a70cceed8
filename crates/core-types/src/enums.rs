use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The categorical label attached to a bank-period.
///
/// The string forms are the labels written to the processed CSV; the integer
/// codes are the class ids the decision tree is trained on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PerformanceTier {
    #[serde(rename = "Low performance")]
    Low,
    #[serde(rename = "Medium performance")]
    Medium,
    #[serde(rename = "High performance")]
    High,
    Unknown,
}

impl PerformanceTier {
    pub const ALL: [PerformanceTier; 4] = [
        PerformanceTier::Low,
        PerformanceTier::Medium,
        PerformanceTier::High,
        PerformanceTier::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PerformanceTier::Low => "Low performance",
            PerformanceTier::Medium => "Medium performance",
            PerformanceTier::High => "High performance",
            PerformanceTier::Unknown => "Unknown",
        }
    }

    /// Stable class id used as the classifier target.
    pub fn code(&self) -> i32 {
        match self {
            PerformanceTier::Low => 0,
            PerformanceTier::Medium => 1,
            PerformanceTier::High => 2,
            PerformanceTier::Unknown => 3,
        }
    }

    /// Inverse of [`PerformanceTier::code`]. Any id outside the known set maps to `Unknown`.
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => PerformanceTier::Low,
            1 => PerformanceTier::Medium,
            2 => PerformanceTier::High,
            _ => PerformanceTier::Unknown,
        }
    }
}

impl fmt::Display for PerformanceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PerformanceTier {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        match normalized.as_str() {
            "low performance" | "low" => Ok(PerformanceTier::Low),
            "medium performance" | "medium" => Ok(PerformanceTier::Medium),
            "high performance" | "high" => Ok(PerformanceTier::High),
            "unknown" => Ok(PerformanceTier::Unknown),
            _ => Err(CoreError::InvalidInput("performance tier".to_string(), s.to_string())),
        }
    }
}

/// A numeric column of a `FinancialRecord` that can be plotted or fed to the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Metric {
    NetIncome,
    TotalAssets,
    Equity,
    Revenue,
    Roa,
    Leverage,
    Roe,
    NetProfitMargin,
    AssetTurnover,
    LiquidityRatio,
    DepositDiversity,
    DepositViewToPlazo,
    CoverageRatio,
    LeverageRatioExtra,
    CapitalizationRatio,
    AdjustedRoe,
}

impl Metric {
    /// The column header used in the processed CSV.
    pub fn column(&self) -> &'static str {
        match self {
            Metric::NetIncome => "net_income",
            Metric::TotalAssets => "total_assets",
            Metric::Equity => "equity",
            Metric::Revenue => "revenue",
            Metric::Roa => "ROA",
            Metric::Leverage => "Leverage",
            Metric::Roe => "ROE",
            Metric::NetProfitMargin => "net_profit_margin",
            Metric::AssetTurnover => "asset_turnover",
            Metric::LiquidityRatio => "liquidity_ratio",
            Metric::DepositDiversity => "deposit_diversity",
            Metric::DepositViewToPlazo => "deposit_view_to_plazo",
            Metric::CoverageRatio => "coverage_ratio",
            Metric::LeverageRatioExtra => "leverage_ratio_extra",
            Metric::CapitalizationRatio => "capitalization_ratio",
            Metric::AdjustedRoe => "adjusted_ROE",
        }
    }
}

impl FromStr for Metric {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        const ALL: [Metric; 16] = [
            Metric::NetIncome,
            Metric::TotalAssets,
            Metric::Equity,
            Metric::Revenue,
            Metric::Roa,
            Metric::Leverage,
            Metric::Roe,
            Metric::NetProfitMargin,
            Metric::AssetTurnover,
            Metric::LiquidityRatio,
            Metric::DepositDiversity,
            Metric::DepositViewToPlazo,
            Metric::CoverageRatio,
            Metric::LeverageRatioExtra,
            Metric::CapitalizationRatio,
            Metric::AdjustedRoe,
        ];
        ALL.into_iter()
            .find(|m| m.column() == s)
            .ok_or_else(|| CoreError::UnknownMetric(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_codes_round_trip() {
        for tier in PerformanceTier::ALL {
            assert_eq!(PerformanceTier::from_code(tier.code()), tier);
        }
        assert_eq!(PerformanceTier::from_code(42), PerformanceTier::Unknown);
    }

    #[test]
    fn tier_parses_csv_labels() {
        assert_eq!("High performance".parse::<PerformanceTier>().unwrap(), PerformanceTier::High);
        assert_eq!(" low ".parse::<PerformanceTier>().unwrap(), PerformanceTier::Low);
        assert!("excellent".parse::<PerformanceTier>().is_err());
    }

    #[test]
    fn tier_serializes_as_label() {
        let json = serde_json::to_string(&PerformanceTier::Medium).unwrap();
        assert_eq!(json, "\"Medium performance\"");
    }

    #[test]
    fn metric_parses_column_names() {
        assert_eq!("adjusted_ROE".parse::<Metric>().unwrap(), Metric::AdjustedRoe);
        assert!("roe".parse::<Metric>().is_err());
    }
}
