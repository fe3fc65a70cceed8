//! Builds the dashboard views as plotly.js figure JSON.
//!
//! Figures are assembled server-side so the page only has to hand the payload
//! to `Plotly.react`. Every view works on an already-filtered selection.

use crate::i18n::{self, Language};
use analytics::average_roe_by_period;
use core_types::{FinancialRecord, Metric, PerformanceTier};
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    RoaLiquidityCoverage3d,
    LeverageCapitalizationAdjustedRoe3d,
    RoaLiquidity,
    RoaCoverage,
    LiquidityCoverage,
    RoeTimeSeries,
    MetricsTable,
}

impl ChartKind {
    pub const ALL: [ChartKind; 7] = [
        ChartKind::RoaLiquidityCoverage3d,
        ChartKind::LeverageCapitalizationAdjustedRoe3d,
        ChartKind::RoaLiquidity,
        ChartKind::RoaCoverage,
        ChartKind::LiquidityCoverage,
        ChartKind::RoeTimeSeries,
        ChartKind::MetricsTable,
    ];

    pub fn slug(&self) -> &'static str {
        match self {
            ChartKind::RoaLiquidityCoverage3d => "roa-liquidity-coverage-3d",
            ChartKind::LeverageCapitalizationAdjustedRoe3d => "leverage-capitalization-adjusted-roe-3d",
            ChartKind::RoaLiquidity => "roa-liquidity",
            ChartKind::RoaCoverage => "roa-coverage",
            ChartKind::LiquidityCoverage => "liquidity-coverage",
            ChartKind::RoeTimeSeries => "roe-time-series",
            ChartKind::MetricsTable => "metrics-table",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.slug() == slug)
    }
}

/// Columns of the metrics table, after the bank/year/month identifiers.
const TABLE_METRICS: [Metric; 7] = [
    Metric::LiquidityRatio,
    Metric::DepositDiversity,
    Metric::DepositViewToPlazo,
    Metric::CoverageRatio,
    Metric::LeverageRatioExtra,
    Metric::CapitalizationRatio,
    Metric::AdjustedRoe,
];

const HOVER_TEMPLATE: &str = "Bank: %{customdata[0]}<br>Year: %{customdata[1]}<br>Month: %{customdata[2]}<br>ROE: %{customdata[3]}<extra></extra>";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChartPayload {
    Figure {
        title: &'static str,
        figure: Value,
    },
    Table {
        title: &'static str,
        columns: Vec<&'static str>,
        rows: Vec<Vec<Value>>,
    },
    Empty {
        title: &'static str,
        message: &'static str,
    },
}

pub fn render(kind: ChartKind, records: &[&FinancialRecord], lang: Language) -> ChartPayload {
    let title = i18n::view_name(lang, kind);
    let empty = ChartPayload::Empty {
        title,
        message: i18n::no_data(lang),
    };
    if records.is_empty() {
        return empty;
    }

    match kind {
        ChartKind::RoaLiquidityCoverage3d => ChartPayload::Figure {
            title,
            figure: scatter_3d(
                records,
                [Metric::Roa, Metric::LiquidityRatio, Metric::CoverageRatio],
                title,
            ),
        },
        ChartKind::LeverageCapitalizationAdjustedRoe3d => ChartPayload::Figure {
            title,
            figure: scatter_3d(
                records,
                [Metric::Leverage, Metric::CapitalizationRatio, Metric::AdjustedRoe],
                title,
            ),
        },
        ChartKind::RoaLiquidity => ChartPayload::Figure {
            title,
            figure: scatter_2d(records, [Metric::Roa, Metric::LiquidityRatio], title, lang),
        },
        ChartKind::RoaCoverage => ChartPayload::Figure {
            title,
            figure: scatter_2d(records, [Metric::Roa, Metric::CoverageRatio], title, lang),
        },
        ChartKind::LiquidityCoverage => ChartPayload::Figure {
            title,
            figure: scatter_2d(records, [Metric::LiquidityRatio, Metric::CoverageRatio], title, lang),
        },
        ChartKind::RoeTimeSeries => match roe_line(records, title) {
            Some(figure) => ChartPayload::Figure { title, figure },
            None => empty,
        },
        ChartKind::MetricsTable => metrics_table(records, title),
    }
}

fn marker_symbol(tier: PerformanceTier) -> &'static str {
    match tier {
        PerformanceTier::Low => "circle",
        PerformanceTier::Medium => "diamond",
        PerformanceTier::High => "square",
        PerformanceTier::Unknown => "x",
    }
}

fn hover_data(record: &FinancialRecord) -> Value {
    json!([record.bank, record.year, record.month, record.metric(Metric::Roe)])
}

fn column(records: &[&FinancialRecord], metric: Metric) -> Vec<Option<f64>> {
    records.iter().map(|r| r.metric(metric)).collect()
}

/// One trace per bank; the marker symbol encodes the tier.
fn scatter_3d(records: &[&FinancialRecord], axes: [Metric; 3], title: &str) -> Value {
    let mut by_bank: BTreeMap<&str, Vec<&FinancialRecord>> = BTreeMap::new();
    for record in records {
        by_bank.entry(record.bank.as_str()).or_default().push(*record);
    }

    let traces: Vec<Value> = by_bank
        .into_iter()
        .map(|(bank, points)| {
            json!({
                "type": "scatter3d",
                "mode": "markers",
                "name": bank,
                "x": column(&points, axes[0]),
                "y": column(&points, axes[1]),
                "z": column(&points, axes[2]),
                "marker": {
                    "size": 5,
                    "symbol": points.iter().map(|r| marker_symbol(r.classification)).collect::<Vec<_>>(),
                },
                "text": points.iter().map(|r| r.classification.as_str()).collect::<Vec<_>>(),
                "customdata": points.iter().map(|r| hover_data(r)).collect::<Vec<_>>(),
                "hovertemplate": HOVER_TEMPLATE,
            })
        })
        .collect();

    json!({
        "data": traces,
        "layout": {
            "title": { "text": title },
            "scene": {
                "xaxis": { "title": { "text": axes[0].column() } },
                "yaxis": { "title": { "text": axes[1].column() } },
                "zaxis": { "title": { "text": axes[2].column() } },
            },
            "legend": { "title": { "text": "Bank" } },
        },
    })
}

/// One trace per tier.
fn scatter_2d(records: &[&FinancialRecord], axes: [Metric; 2], title: &str, lang: Language) -> Value {
    let traces: Vec<Value> = PerformanceTier::ALL
        .iter()
        .filter_map(|&tier| {
            let points: Vec<&FinancialRecord> = records
                .iter()
                .copied()
                .filter(|r| r.classification == tier)
                .collect();
            if points.is_empty() {
                return None;
            }
            Some(json!({
                "type": "scatter",
                "mode": "markers",
                "name": i18n::tier_name(lang, tier),
                "x": column(&points, axes[0]),
                "y": column(&points, axes[1]),
                "customdata": points.iter().map(|r| hover_data(r)).collect::<Vec<_>>(),
                "hovertemplate": HOVER_TEMPLATE,
            }))
        })
        .collect();

    json!({
        "data": traces,
        "layout": {
            "title": { "text": title },
            "xaxis": { "title": { "text": axes[0].column() } },
            "yaxis": { "title": { "text": axes[1].column() } },
            "legend": { "title": { "text": "classification" } },
        },
    })
}

/// `None` when no record has a recognizable month or a defined ROE.
fn roe_line(records: &[&FinancialRecord], title: &str) -> Option<Value> {
    let points = average_roe_by_period(records.iter().copied());
    if points.is_empty() {
        return None;
    }
    let dates: Vec<String> = points.iter().map(|p| p.date.format("%Y-%m-%d").to_string()).collect();
    let values: Vec<Option<f64>> = points.iter().map(|p| p.average_roe.to_f64()).collect();

    Some(json!({
        "data": [{
            "type": "scatter",
            "mode": "lines",
            "name": "ROE",
            "x": dates,
            "y": values,
        }],
        "layout": {
            "title": { "text": title },
            "xaxis": { "title": { "text": "Date" } },
            "yaxis": { "title": { "text": "ROE" } },
        },
    }))
}

fn metrics_table(records: &[&FinancialRecord], title: &'static str) -> ChartPayload {
    let mut columns = vec!["Bank", "Year", "Month"];
    columns.extend(TABLE_METRICS.iter().map(|m| m.column()));

    let rows = records
        .iter()
        .map(|r| {
            let mut row = vec![json!(r.bank), json!(r.year), json!(r.month)];
            row.extend(TABLE_METRICS.iter().map(|&m| json!(r.metric(m))));
            row
        })
        .collect();

    ChartPayload::Table { title, columns, rows }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn record(bank: &str, month: &str, tier: PerformanceTier, roe: rust_decimal::Decimal) -> FinancialRecord {
        FinancialRecord {
            bank: bank.to_string(),
            year: 2023,
            month: month.to_string(),
            net_income: dec!(1),
            total_assets: dec!(100),
            equity: dec!(10),
            revenue: dec!(5),
            roa: Some(dec!(0.01)),
            leverage: Some(dec!(10)),
            roe: Some(roe),
            net_profit_margin: Some(dec!(0.2)),
            asset_turnover: Some(dec!(0.05)),
            classification: tier,
            liquidity_ratio: Some(dec!(0.3)),
            deposit_diversity: None,
            deposit_view_to_plazo: Some(dec!(1.5)),
            coverage_ratio: Some(dec!(0.8)),
            leverage_ratio_extra: Some(dec!(0.9)),
            capitalization_ratio: Some(dec!(0.1)),
            adjusted_roe: Some(roe),
            predicted_tier: None,
        }
    }

    fn sample() -> Vec<FinancialRecord> {
        vec![
            record("Banco A", "1", PerformanceTier::Low, dec!(0.05)),
            record("Banco A", "2", PerformanceTier::High, dec!(0.15)),
            record("Banco B", "1", PerformanceTier::Medium, dec!(0.10)),
        ]
    }

    #[test]
    fn slugs_round_trip() {
        for kind in ChartKind::ALL {
            assert_eq!(ChartKind::from_slug(kind.slug()), Some(kind));
        }
        assert_eq!(ChartKind::from_slug("pie"), None);
    }

    #[test]
    fn empty_selection_yields_localized_message() {
        let payload = render(ChartKind::RoaLiquidity, &[], Language::Es);
        assert_eq!(
            payload,
            ChartPayload::Empty {
                title: "Gráfico 2D: ROA vs. Ratio de Liquidez",
                message: "No hay datos disponibles para los filtros seleccionados.",
            }
        );
    }

    #[test]
    fn three_d_views_have_one_trace_per_bank_with_tier_symbols() {
        let records = sample();
        let refs: Vec<&FinancialRecord> = records.iter().collect();
        let ChartPayload::Figure { figure, .. } =
            render(ChartKind::RoaLiquidityCoverage3d, &refs, Language::En)
        else {
            panic!("expected a figure");
        };

        let traces = figure["data"].as_array().unwrap();
        assert_eq!(traces.len(), 2);
        assert_eq!(traces[0]["name"], "Banco A");
        assert_eq!(traces[0]["marker"]["symbol"], json!(["circle", "square"]));
        assert_eq!(traces[1]["z"], json!([0.8]));
        assert_eq!(traces[0]["customdata"][1], json!(["Banco A", 2023, "2", 0.15]));
    }

    #[test]
    fn two_d_views_have_one_trace_per_tier() {
        let records = sample();
        let refs: Vec<&FinancialRecord> = records.iter().collect();
        let ChartPayload::Figure { figure, .. } = render(ChartKind::RoaCoverage, &refs, Language::En)
        else {
            panic!("expected a figure");
        };

        let names: Vec<&str> = figure["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Low performance", "Medium performance", "High performance"]);
    }

    #[test]
    fn time_series_averages_each_period() {
        let records = sample();
        let refs: Vec<&FinancialRecord> = records.iter().collect();
        let ChartPayload::Figure { figure, .. } = render(ChartKind::RoeTimeSeries, &refs, Language::En)
        else {
            panic!("expected a figure");
        };

        let trace = &figure["data"][0];
        assert_eq!(trace["x"], json!(["2023-01-01", "2023-02-01"]));
        assert_eq!(trace["y"], json!([0.075, 0.15]));
    }

    #[test]
    fn time_series_without_parsable_months_is_empty() {
        let records = vec![record("Banco A", "Q1", PerformanceTier::Low, dec!(0.05))];
        let refs: Vec<&FinancialRecord> = records.iter().collect();
        assert!(matches!(
            render(ChartKind::RoeTimeSeries, &refs, Language::En),
            ChartPayload::Empty { .. }
        ));
    }

    #[test]
    fn metrics_table_lists_identifiers_then_ratios() {
        let records = sample();
        let refs: Vec<&FinancialRecord> = records.iter().collect();
        let ChartPayload::Table { columns, rows, .. } = render(ChartKind::MetricsTable, &refs, Language::En)
        else {
            panic!("expected a table");
        };

        assert_eq!(columns.len(), 10);
        assert_eq!(columns[3], "liquidity_ratio");
        assert_eq!(columns[9], "adjusted_ROE");
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0][4], Value::Null);
    }
}
