use crate::error::AnalyticsError;
use crate::tiers::TierThresholds;
use configuration::IndicatorMap;
use core_types::{FinancialRecord, PerformanceTier, PeriodKey};
use ingest::StatementPivot;
use rust_decimal::Decimal;

/// Division that yields `None` for a zero denominator or an out-of-range result.
pub fn ratio(numerator: Decimal, denominator: Decimal) -> Option<Decimal> {
    if denominator.is_zero() {
        return None;
    }
    numerator.checked_div(denominator)
}

/// A stateless calculator for deriving bank ratios from pivoted statement data.
#[derive(Debug, Default)]
pub struct RatioEngine {
    indicators: IndicatorMap,
}

impl RatioEngine {
    pub fn new(indicators: IndicatorMap) -> Self {
        Self { indicators }
    }

    /// The main entry point for calculating ratios.
    ///
    /// Produces one record per bank-period, ordered by bank, year and month, and
    /// labels each one with its ROE tier. The tier cut points are taken over the
    /// whole input, so the result depends on every period passed in.
    pub fn compute(&self, pivot: &StatementPivot) -> Result<Vec<FinancialRecord>, AnalyticsError> {
        if pivot.is_empty() {
            return Err(AnalyticsError::NotEnoughData(
                "the statement data contains no bank periods".to_string(),
            ));
        }

        let mut records = pivot
            .periods()
            .map(|key| self.compute_period(pivot, key))
            .collect::<Result<Vec<_>, _>>()?;

        let thresholds = TierThresholds::from_roe(records.iter().filter_map(|r| r.roe));
        for record in &mut records {
            record.classification = thresholds.classify(record.roe);
        }

        tracing::info!(
            records = records.len(),
            q33 = %thresholds.q33,
            q66 = %thresholds.q66,
            "Computed financial ratios."
        );
        Ok(records)
    }

    /// Calculates every ratio of a single bank-period. The tier is left `Unknown`.
    fn compute_period(
        &self,
        pivot: &StatementPivot,
        key: &PeriodKey,
    ) -> Result<FinancialRecord, AnalyticsError> {
        let map = &self.indicators;
        let overflow = |what: &str| AnalyticsError::Overflow(format!("{what} for {} {}-{}", key.bank, key.year, key.month));

        // --- Statement fields ---
        let net_income = pivot.get(key, &map.net_income);
        let total_assets = pivot.get(key, &map.total_assets);
        let revenue = pivot.get(key, &map.revenue);
        let equity = pivot
            .sum(key, &map.equity_components)
            .and_then(|sum| sum.checked_add(net_income))
            .ok_or_else(|| overflow("equity"))?;

        // --- DuPont decomposition ---
        let roa = ratio(net_income, total_assets);
        let leverage = ratio(total_assets, equity);
        let roe = roa.zip(leverage).and_then(|(a, l)| a.checked_mul(l));
        let net_profit_margin = ratio(net_income, revenue);
        let asset_turnover = ratio(revenue, total_assets);

        // --- Liquidity and funding ---
        let liquid_assets = pivot
            .category_total(key, &map.liquid_assets_category)
            .ok_or_else(|| overflow("liquid assets"))?;
        let deposits = pivot
            .category_total(key, &map.deposits_category)
            .ok_or_else(|| overflow("deposits"))?;
        let liquidity_ratio = ratio(liquid_assets, deposits);
        let deposit_diversity = ratio(
            pivot.get(key, &map.private_deposits),
            pivot.get(key, &map.interbank_deposits),
        );
        let deposit_view_to_plazo = ratio(
            pivot.get(key, &map.demand_deposits),
            pivot.get(key, &map.term_deposits),
        );

        // --- Credit quality ---
        let local_loans = pivot.get(key, &map.local_loans);
        let gross_loans = local_loans
            .checked_add(pivot.get(key, &map.foreign_loans))
            .ok_or_else(|| overflow("gross loans"))?;
        let coverage_ratio = ratio(pivot.get(key, &map.net_loans), gross_loans);
        let adjusted_roe = local_loans
            .checked_sub(pivot.get(key, &map.local_loan_provisions))
            .and_then(|denominator| ratio(local_loans, denominator))
            .zip(roe)
            .and_then(|(factor, roe)| roe.checked_mul(factor));

        // --- Capital ---
        let liabilities = pivot
            .sum(key, &map.liabilities)
            .ok_or_else(|| overflow("liabilities"))?;
        let leverage_ratio_extra = ratio(liabilities, equity);
        let capitalization_ratio = ratio(equity, total_assets);

        Ok(FinancialRecord {
            bank: key.bank.clone(),
            year: key.year,
            month: key.month.clone(),
            net_income,
            total_assets,
            equity,
            revenue,
            roa,
            leverage,
            roe,
            net_profit_margin,
            asset_turnover,
            classification: PerformanceTier::Unknown,
            liquidity_ratio,
            deposit_diversity,
            deposit_view_to_plazo,
            coverage_ratio,
            leverage_ratio_extra,
            capitalization_ratio,
            adjusted_roe,
            predicted_tier: None,
        })
    }
}
