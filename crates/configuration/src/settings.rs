use core_types::LineItem;
use serde::Deserialize;
use std::path::PathBuf;

/// The root configuration structure for the entire application.
///
/// Every section has defaults, so an absent `config.toml` still yields a usable setup.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub data: DataConfig,
    pub training: TrainingConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub indicators: IndicatorMap,
}

/// Locations of the pipeline's inputs and artifacts.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// The regulator's long-format export (Subgrupo, Año, Mes, Categoría, Indicador, Valor).
    pub raw_path: PathBuf,
    /// The flat per-bank, per-period records produced by `preprocess`.
    pub processed_path: PathBuf,
    /// The serialized decision tree produced by `train`.
    pub model_path: PathBuf,
    /// Single ASCII character separating fields in the raw export.
    pub delimiter: String,
}

impl DataConfig {
    /// The delimiter as the byte the CSV reader expects. Validation guarantees it is one ASCII char.
    pub fn delimiter_byte(&self) -> u8 {
        self.delimiter.as_bytes().first().copied().unwrap_or(b',')
    }
}

/// Hyper-parameters for the decision tree and the evaluation split.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Fraction of records held out for the classification report.
    pub test_size: f32,
    pub max_depth: u16,
    pub min_samples_leaf: usize,
    pub min_samples_split: usize,
    /// Seed for the shuffled train/test split.
    pub seed: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default `EnvFilter` directive, used when `RUST_LOG` is not set.
    pub level: String,
    /// When set, logs are also written to a daily rolling file in this directory.
    pub directory: Option<PathBuf>,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Where each statement figure lives in the regulator's export.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IndicatorMap {
    pub net_income: LineItem,
    pub total_assets: LineItem,
    /// Added to net income to obtain equity.
    pub equity_components: Vec<LineItem>,
    pub revenue: LineItem,
    /// Every indicator in this category counts as a liquid asset.
    pub liquid_assets_category: String,
    /// Every indicator in this category counts as a deposit.
    pub deposits_category: String,
    pub private_deposits: LineItem,
    pub interbank_deposits: LineItem,
    pub demand_deposits: LineItem,
    pub term_deposits: LineItem,
    pub local_loans: LineItem,
    pub foreign_loans: LineItem,
    pub net_loans: LineItem,
    pub local_loan_provisions: LineItem,
    /// Obligations and other liabilities, summed for the extended leverage ratio.
    pub liabilities: Vec<LineItem>,
}

// --- Default Implementations ---
// This allows a user to omit any section from their toml
// and still have it work with sensible defaults.

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            raw_path: PathBuf::from("data/sbp_balance_de_bancos.csv"),
            processed_path: PathBuf::from("data/financials_processed.csv"),
            model_path: PathBuf::from("models/decision_tree_model.bin"),
            delimiter: ",".to_string(),
        }
    }
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            test_size: 0.2,
            max_depth: 6,
            min_samples_leaf: 1,
            min_samples_split: 2,
            seed: 42,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8501,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
            format: LogFormat::Pretty,
        }
    }
}

impl Default for IndicatorMap {
    fn default() -> Self {
        Self {
            net_income: LineItem::new("Patrimonio", "Utilidad De Periodo"),
            total_assets: LineItem::new("Patrimonio", "Pasivo Y Patrimonio"),
            equity_components: vec![
                LineItem::new("Patrimonio", "Capital"),
                LineItem::new("Patrimonio", "Otras Reservas"),
                LineItem::new("Patrimonio", "Utilidad De Periodos Anteriores"),
                LineItem::new(
                    "Patrimonio",
                    "Ganancia O Perdida En Valores Disponible Para La Venta",
                ),
            ],
            revenue: LineItem::new("Ingresos", "Total Ingresos"),
            liquid_assets_category: "Activos Liquidos".to_string(),
            deposits_category: "Depositos".to_string(),
            private_deposits: LineItem::new("Depositos", "De Particulares"),
            interbank_deposits: LineItem::new("Depositos", "De Bancos"),
            demand_deposits: LineItem::new("Depositos", "A La Vista"),
            term_deposits: LineItem::new("Depositos", "A Plazo"),
            local_loans: LineItem::new("Cartera Crediticia", "Locales"),
            foreign_loans: LineItem::new("Cartera Crediticia", "Extranjero"),
            net_loans: LineItem::new("Cartera Crediticia", "Menos Provisiones"),
            local_loan_provisions: LineItem::new("Cartera Crediticia", "Menos Provisiones Locales"),
            liabilities: vec![
                LineItem::new("Obligaciones", "Locales"),
                LineItem::new("Obligaciones", "Extranjero"),
                LineItem::new("Otros Pasivos", "Locales"),
                LineItem::new("Otros Pasivos", "Extranjero"),
            ],
        }
    }
}
