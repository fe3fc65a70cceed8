use core_types::{FinancialRecord, PerformanceTier};
use rust_decimal::Decimal;

pub fn record(bank: &str, year: i32, month: &str, tier: PerformanceTier) -> FinancialRecord {
    FinancialRecord {
        classification: tier,
        ..record_with_roe(bank, year, month, None)
    }
}

pub fn record_with_roe(bank: &str, year: i32, month: &str, roe: Option<Decimal>) -> FinancialRecord {
    FinancialRecord {
        bank: bank.to_string(),
        year,
        month: month.to_string(),
        net_income: Decimal::ZERO,
        total_assets: Decimal::ZERO,
        equity: Decimal::ZERO,
        revenue: Decimal::ZERO,
        roa: None,
        leverage: None,
        roe,
        net_profit_margin: None,
        asset_turnover: None,
        classification: PerformanceTier::Unknown,
        liquidity_ratio: None,
        deposit_diversity: None,
        deposit_view_to_plazo: None,
        coverage_ratio: None,
        leverage_ratio_extra: None,
        capitalization_ratio: None,
        adjusted_roe: None,
        predicted_tier: None,
    }
}
