use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;
pub mod telemetry;

// Re-export the core types to provide a clean public API.
pub use settings::{
    Config, DataConfig, IndicatorMap, LogFormat, LoggingConfig, ServerConfig, TrainingConfig,
};
pub use telemetry::init_tracing;

/// Prefix for environment overrides, e.g. `DUPONT__SERVER__PORT=9000`.
const ENV_PREFIX: &str = "DUPONT";

/// Loads the application configuration from the `config.toml` file.
///
/// This function is the primary entry point for this crate. The file is optional:
/// missing keys fall back to their defaults and `DUPONT__*` environment variables
/// override whatever the file says.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(Path::new("config.toml"))
}

/// Like [`load_config`], reading the given file instead of `config.toml`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.try_deserialize::<Config>()?;
    validate(&config)?;

    Ok(config)
}

fn validate(config: &Config) -> Result<(), ConfigError> {
    let test_size = config.training.test_size;
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(ConfigError::ValidationError(format!(
            "training.test_size must be between 0 and 1 (exclusive), got {test_size}"
        )));
    }
    if config.training.max_depth == 0 {
        return Err(ConfigError::ValidationError(
            "training.max_depth must be at least 1".to_string(),
        ));
    }
    let delimiter = &config.data.delimiter;
    if delimiter.len() != 1 || !delimiter.is_ascii() {
        return Err(ConfigError::ValidationError(format!(
            "data.delimiter must be a single ASCII character, got {delimiter:?}"
        )));
    }
    Ok(())
}
