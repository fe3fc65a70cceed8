//! English and Spanish strings for the dashboard.

use crate::charts::ChartKind;
use core_types::PerformanceTier;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Es,
}

#[derive(Debug, Clone, Serialize)]
pub struct ViewLabel {
    pub slug: &'static str,
    pub name: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct TierLabel {
    pub value: PerformanceTier,
    pub label: &'static str,
}

/// Every piece of UI text the page needs, in one language.
#[derive(Debug, Clone, Serialize)]
pub struct Labels {
    pub language: Language,
    pub title: &'static str,
    pub settings: &'static str,
    pub language_prompt: &'static str,
    pub global_filters: &'static str,
    pub bank_filter: &'static str,
    pub year_filter: &'static str,
    pub month_filter: &'static str,
    pub classification_filter: &'static str,
    pub menu: &'static str,
    pub views: Vec<ViewLabel>,
    pub tiers: Vec<TierLabel>,
    pub no_data: &'static str,
}

pub fn labels(lang: Language) -> Labels {
    let views = ChartKind::ALL
        .iter()
        .map(|kind| ViewLabel {
            slug: kind.slug(),
            name: view_name(lang, *kind),
        })
        .collect();
    let tiers = tier_labels(lang, &PerformanceTier::ALL);

    match lang {
        Language::En => Labels {
            language: lang,
            title: "DuPont AI Analyzer – Financial Diagnostic",
            settings: "Settings",
            language_prompt: "Select Language / Seleccione el idioma",
            global_filters: "Global Filters",
            bank_filter: "Select Bank(s):",
            year_filter: "Select Year(s):",
            month_filter: "Select Month(s):",
            classification_filter: "Select Classification(s):",
            menu: "Select Visualization",
            views,
            tiers,
            no_data: no_data(lang),
        },
        Language::Es => Labels {
            language: lang,
            title: "DuPont AI Analyzer – Diagnóstico Financiero",
            settings: "Configuración",
            language_prompt: "Select Language / Seleccione el idioma",
            global_filters: "Filtros Globales",
            bank_filter: "Seleccione Banco(s):",
            year_filter: "Seleccione Año(s):",
            month_filter: "Seleccione Mes(es):",
            classification_filter: "Seleccione Clasificación(es):",
            menu: "Seleccione Visualización",
            views,
            tiers,
            no_data: no_data(lang),
        },
    }
}

pub fn view_name(lang: Language, kind: ChartKind) -> &'static str {
    match (lang, kind) {
        (Language::En, ChartKind::RoaLiquidityCoverage3d) => {
            "3D Graph: ROA vs. Liquidity Ratio vs. Coverage Ratio"
        }
        (Language::En, ChartKind::LeverageCapitalizationAdjustedRoe3d) => {
            "3D Graph: Leverage vs. Capitalization vs. Adjusted ROE"
        }
        (Language::En, ChartKind::RoaLiquidity) => "2D Graph: ROA vs. Liquidity Ratio",
        (Language::En, ChartKind::RoaCoverage) => "2D Graph: ROA vs. Coverage Ratio",
        (Language::En, ChartKind::LiquidityCoverage) => "2D Graph: Liquidity Ratio vs. Coverage Ratio",
        (Language::En, ChartKind::RoeTimeSeries) => "Time Series: Average ROE Over Time",
        (Language::En, ChartKind::MetricsTable) => "Financial Metrics Table",
        (Language::Es, ChartKind::RoaLiquidityCoverage3d) => {
            "Gráfico 3D: ROA vs. Ratio de Liquidez vs. Cobertura"
        }
        (Language::Es, ChartKind::LeverageCapitalizationAdjustedRoe3d) => {
            "Gráfico 3D: Apalancamiento vs. Capitalización vs. ROE Ajustado"
        }
        (Language::Es, ChartKind::RoaLiquidity) => "Gráfico 2D: ROA vs. Ratio de Liquidez",
        (Language::Es, ChartKind::RoaCoverage) => "Gráfico 2D: ROA vs. Cobertura",
        (Language::Es, ChartKind::LiquidityCoverage) => "Gráfico 2D: Ratio de Liquidez vs. Cobertura",
        (Language::Es, ChartKind::RoeTimeSeries) => "Serie de Tiempo: ROE Promedio",
        (Language::Es, ChartKind::MetricsTable) => "Tabla de Métricas Financieras",
    }
}

pub fn tier_name(lang: Language, tier: PerformanceTier) -> &'static str {
    match lang {
        Language::En => tier.as_str(),
        Language::Es => match tier {
            PerformanceTier::Low => "Rendimiento bajo",
            PerformanceTier::Medium => "Rendimiento medio",
            PerformanceTier::High => "Rendimiento alto",
            PerformanceTier::Unknown => "Desconocido",
        },
    }
}

pub fn tier_labels(lang: Language, tiers: &[PerformanceTier]) -> Vec<TierLabel> {
    tiers
        .iter()
        .map(|&tier| TierLabel {
            value: tier,
            label: tier_name(lang, tier),
        })
        .collect()
}

pub fn no_data(lang: Language) -> &'static str {
    match lang {
        Language::En => "No data available for the selected filters.",
        Language::Es => "No hay datos disponibles para los filtros seleccionados.",
    }
}
