use analytics::{tier_distribution, RatioEngine, RecordFilter, TierSource};
use anyhow::Context;
use clap::{Parser, Subcommand};
use comfy_table::{presets::UTF8_FULL, Table};
use configuration::{Config, LogFormat};
use indicatif::{ProgressBar, ProgressStyle};
use ml_trainer::{ClassificationReport, TierClassifier};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// The main entry point for the DuPont analyzer.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file, if there is one
    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();

    let mut config = configuration::load_config_from(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;
    apply_cli_overrides(&cli, &mut config);
    let _guard = configuration::init_tracing(&config.logging)?;
    tracing::debug!(path = %cli.config.display(), "Configuration loaded.");

    // Execute the appropriate command
    match cli.command {
        Commands::Preprocess(args) => handle_preprocess(args, &config),
        Commands::Train(args) => handle_train(args, &config),
        Commands::Classify(args) => handle_classify(args, &config),
        Commands::Summary(args) => handle_summary(args, &config),
        Commands::Serve(args) => handle_serve(args, &config).await,
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// DuPont ratio analysis and performance-tier classification for banks.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file; missing keys fall back to defaults.
    #[arg(long, global = true, default_value = "config.toml")]
    config: PathBuf,

    /// Overrides the log format from the configuration.
    #[arg(long, global = true, value_enum)]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Pivot the regulator export and compute every ratio and tier.
    Preprocess(PreprocessArgs),
    /// Fit the decision tree on the processed dataset and save it.
    Train(TrainArgs),
    /// Attach model predictions to the processed dataset.
    Classify(ClassifyArgs),
    /// Print how many periods each bank spent in each tier.
    Summary(SummaryArgs),
    /// Start the dashboard.
    Serve(ServeArgs),
}

#[derive(Parser)]
struct PreprocessArgs {
    /// Long-format statement CSV. Defaults to `[data].raw_path`.
    #[arg(long)]
    input: Option<PathBuf>,

    /// Destination of the processed CSV. Defaults to `[data].processed_path`.
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Parser)]
struct TrainArgs {
    /// Processed CSV. Defaults to `[data].processed_path`.
    #[arg(long)]
    dataset: Option<PathBuf>,

    /// Where to write the model. Defaults to `[data].model_path`.
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Parser)]
struct ClassifyArgs {
    /// Processed CSV. Defaults to `[data].processed_path`.
    #[arg(long)]
    dataset: Option<PathBuf>,

    /// Trained model. Defaults to `[data].model_path`.
    #[arg(long)]
    model: Option<PathBuf>,

    /// Destination CSV. Defaults to overwriting the dataset.
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Parser)]
struct SummaryArgs {
    /// Processed CSV. Defaults to `[data].processed_path`.
    #[arg(long)]
    dataset: Option<PathBuf>,

    /// Only these banks (repeatable).
    #[arg(long)]
    bank: Vec<String>,

    /// Only these years (repeatable).
    #[arg(long)]
    year: Vec<i32>,

    /// Count the model's predicted tiers instead of the ROE tiers.
    #[arg(long)]
    predicted: bool,
}

#[derive(Parser)]
struct ServeArgs {
    #[arg(long)]
    host: Option<String>,

    #[arg(long)]
    port: Option<u16>,
}

/// Command-line flags win over the configuration file and environment.
fn apply_cli_overrides(cli: &Cli, config: &mut Config) {
    if let Some(format) = cli.log_format {
        config.logging.format = format;
    }
}

// ==============================================================================
// Command Logic
// ==============================================================================

fn handle_preprocess(args: PreprocessArgs, config: &Config) -> anyhow::Result<()> {
    let input = args.input.unwrap_or_else(|| config.data.raw_path.clone());
    let output = args.output.unwrap_or_else(|| config.data.processed_path.clone());

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")?);
    spinner.enable_steady_tick(Duration::from_millis(100));

    spinner.set_message(format!("Reading {}...", input.display()));
    let (pivot, stats) = ingest::load_statements(&input, config.data.delimiter_byte())
        .with_context(|| format!("Failed to read statements from {}", input.display()))?;

    spinner.set_message(format!("Computing ratios for {} bank periods...", stats.periods));
    let records = RatioEngine::new(config.indicators.clone()).compute(&pivot)?;

    spinner.set_message(format!("Writing {}...", output.display()));
    ingest::write_records(&output, &records)?;
    spinner.finish_with_message("Preprocessing complete!");

    println!(
        "Read {} rows ({} skipped) into {} bank periods; wrote {}.",
        stats.rows_read,
        stats.rows_skipped,
        records.len(),
        output.display()
    );
    print_distribution(&records, TierSource::Reference);
    Ok(())
}

fn handle_train(args: TrainArgs, config: &Config) -> anyhow::Result<()> {
    let dataset = args.dataset.unwrap_or_else(|| config.data.processed_path.clone());
    let output = args.output.unwrap_or_else(|| config.data.model_path.clone());

    let records = ingest::read_records(&dataset)
        .with_context(|| format!("Failed to read processed data from {}", dataset.display()))?;
    let classifier = TierClassifier::train(&records, &config.training)?;
    classifier.save(&output)?;

    let info = &classifier.metadata().training_info;
    println!(
        "Trained on {} records, evaluated on {}; model saved to {}.",
        info.n_train_samples,
        info.n_test_samples,
        output.display()
    );
    match classifier.evaluation() {
        Some(report) => print_report(report),
        None => println!("Dataset too small for a held-out evaluation."),
    }
    Ok(())
}

fn handle_classify(args: ClassifyArgs, config: &Config) -> anyhow::Result<()> {
    let dataset = args.dataset.unwrap_or_else(|| config.data.processed_path.clone());
    let model = args.model.unwrap_or_else(|| config.data.model_path.clone());
    let output = args.output.unwrap_or_else(|| dataset.clone());

    let mut records = ingest::read_records(&dataset)
        .with_context(|| format!("Failed to read processed data from {}", dataset.display()))?;
    let classifier = TierClassifier::load(&model)
        .with_context(|| format!("Failed to load model from {}", model.display()))?;
    classifier.classify_records(&mut records)?;
    ingest::write_records(&output, &records)?;

    println!("Classified {} records; wrote {}.", records.len(), output.display());
    print_distribution(&records, TierSource::Predicted);
    Ok(())
}

fn handle_summary(args: SummaryArgs, config: &Config) -> anyhow::Result<()> {
    let dataset = args.dataset.unwrap_or_else(|| config.data.processed_path.clone());
    let records = ingest::read_records(&dataset)
        .with_context(|| format!("Failed to read processed data from {}", dataset.display()))?;

    let filter = RecordFilter {
        banks: args.bank,
        years: args.year,
        ..Default::default()
    };
    let selected: Vec<_> = filter.apply(&records).into_iter().cloned().collect();
    if selected.is_empty() {
        println!("No data available for the selected filters.");
        return Ok(());
    }

    let source = if args.predicted {
        TierSource::Predicted
    } else {
        TierSource::Reference
    };
    print_distribution(&selected, source);
    Ok(())
}

async fn handle_serve(args: ServeArgs, config: &Config) -> anyhow::Result<()> {
    let host = args.host.unwrap_or_else(|| config.server.host.clone());
    let port = args.port.unwrap_or(config.server.port);
    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .with_context(|| format!("Invalid listen address {host}:{port}"))?;

    let state = web_server::AppState::load(config).context("Failed to load dashboard data")?;
    web_server::run_server(addr, Arc::new(state)).await
}

// ==============================================================================
// Output
// ==============================================================================

fn print_distribution(records: &[core_types::FinancialRecord], source: TierSource) {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Bank", "Low", "Medium", "High", "Unknown", "Total"]);
    for row in tier_distribution(records, source) {
        table.add_row(vec![
            row.bank.clone(),
            row.low.to_string(),
            row.medium.to_string(),
            row.high.to_string(),
            row.unknown.to_string(),
            row.total().to_string(),
        ]);
    }
    println!("{table}");
}

fn print_report(report: &ClassificationReport) {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Tier", "Precision", "Recall", "F1", "Support"]);
    for class in &report.classes {
        table.add_row(vec![
            class.tier.to_string(),
            format!("{:.3}", class.precision),
            format!("{:.3}", class.recall),
            format!("{:.3}", class.f1_score),
            class.support.to_string(),
        ]);
    }
    for (name, avg) in [("macro avg", &report.macro_avg), ("weighted avg", &report.weighted_avg)] {
        table.add_row(vec![
            name.to_string(),
            format!("{:.3}", avg.precision),
            format!("{:.3}", avg.recall),
            format!("{:.3}", avg.f1_score),
            report.total_support.to_string(),
        ]);
    }
    println!("Accuracy: {:.3}", report.accuracy);
    println!("{table}");

    let mut confusion = Table::new();
    confusion.load_preset(UTF8_FULL);
    let mut header = vec!["true \\ predicted".to_string()];
    header.extend(report.classes.iter().map(|c| c.tier.to_string()));
    confusion.set_header(header);
    for (class, counts) in report.classes.iter().zip(&report.confusion_matrix) {
        let mut row = vec![class.tier.to_string()];
        row.extend(counts.iter().map(|n| n.to_string()));
        confusion.add_row(row);
    }
    println!("{confusion}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_format_flag_overrides_configuration() {
        let cli = Cli::try_parse_from(["dupont-analyzer", "summary", "--log-format", "json"]).unwrap();
        let mut config = Config::default();
        assert_eq!(config.logging.format, LogFormat::Pretty);

        apply_cli_overrides(&cli, &mut config);
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn configuration_format_is_kept_without_the_flag() {
        let cli = Cli::try_parse_from(["dupont-analyzer", "summary", "--bank", "Banco A"]).unwrap();
        let mut config = Config::default();
        config.logging.format = LogFormat::Json;

        apply_cli_overrides(&cli, &mut config);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(cli.config, PathBuf::from("config.toml"));
    }
}
