//! Configuration loading utilities

use crate::Config;
use std::env;
use std::path::Path;
use thiserror::Error;
use ytgraph_common::Result as YtResult;

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error when reading configuration file
    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML configuration: {0}")]
    ParseError(#[from] serde_yaml::Error),

    /// Configuration validation error
    #[error("Configuration validation failed: {0}")]
    ValidationError(#[from] validator::ValidationErrors),

    /// Environment variable parsing error
    #[error("Failed to parse environment variable '{var}': {source}")]
    EnvParseError {
        var: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl From<ConfigError> for ytgraph_common::YtGraphError {
    fn from(err: ConfigError) -> Self {
        ytgraph_common::YtGraphError::config(err.to_string())
    }
}

/// Configuration loader for the application
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a YAML file with environment variable overrides
    pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let mut config: Config = serde_yaml::from_str(&content)?;

        Self::apply_env_overrides(&mut config)?;

        use validator::Validate;
        config.validate()?;

        Ok(config)
    }

    /// Load configuration from the default locations.
    ///
    /// Tries `YTGRAPH_CONFIG_PATH`, then `config.yaml`/`config.yml` in the
    /// working directory, then falls back to defaults with environment
    /// overrides applied.
    pub fn load() -> YtResult<Config> {
        let config = if let Ok(config_path) = env::var("YTGRAPH_CONFIG_PATH") {
            Self::load_config(&config_path)?
        } else if Path::new("config.yaml").exists() {
            Self::load_config("config.yaml")?
        } else if Path::new("config.yml").exists() {
            Self::load_config("config.yml")?
        } else {
            let mut config = Config::default();
            Self::apply_env_overrides(&mut config)
                .map_err(ytgraph_common::YtGraphError::from)?;

            use validator::Validate;
            config.validate().map_err(ConfigError::ValidationError)?;
            config
        };

        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> YtResult<Config> {
        Ok(Self::load_config(path)?)
    }

    /// Apply environment variable overrides to configuration
    fn apply_env_overrides(config: &mut Config) -> Result<(), ConfigError> {
        // YouTube configuration overrides
        if let Ok(api_key) = env::var("YOUTUBE_API_KEY") {
            config.youtube.api_key = api_key;
        }

        if let Ok(base_url) = env::var("YTGRAPH_API_BASE_URL") {
            config.youtube.base_url = base_url;
        }

        if let Ok(timeout) = env::var("YTGRAPH_API_TIMEOUT") {
            config.youtube.timeout_seconds =
                timeout.parse().map_err(|e| ConfigError::EnvParseError {
                    var: "YTGRAPH_API_TIMEOUT".to_string(),
                    source: Box::new(e),
                })?;
        }

        // History configuration overrides
        if let Ok(months) = env::var("YTGRAPH_HISTORY_MONTHS") {
            config.history.months = months.parse().map_err(|e| ConfigError::EnvParseError {
                var: "YTGRAPH_HISTORY_MONTHS".to_string(),
                source: Box::new(e),
            })?;
        }

        // Chart configuration overrides
        if let Ok(width) = env::var("YTGRAPH_CHART_WIDTH") {
            config.chart.width = width.parse().map_err(|e| ConfigError::EnvParseError {
                var: "YTGRAPH_CHART_WIDTH".to_string(),
                source: Box::new(e),
            })?;
        }

        if let Ok(height) = env::var("YTGRAPH_CHART_HEIGHT") {
            config.chart.height = height.parse().map_err(|e| ConfigError::EnvParseError {
                var: "YTGRAPH_CHART_HEIGHT".to_string(),
                source: Box::new(e),
            })?;
        }

        if let Ok(bg_color) = env::var("YTGRAPH_CHART_BACKGROUND") {
            config.chart.background_color = bg_color;
        }

        if let Ok(grid_color) = env::var("YTGRAPH_CHART_GRID") {
            config.chart.grid_color = grid_color;
        }

        // Export configuration overrides
        if let Ok(output_dir) = env::var("YTGRAPH_EXPORT_DIR") {
            config.export.output_dir = output_dir;
        }

        // Dashboard configuration overrides
        if let Ok(bind_address) = env::var("YTGRAPH_BIND_ADDRESS") {
            config.dashboard.bind_address = bind_address;
        }

        // Logging configuration overrides
        if let Ok(level) = env::var("YTGRAPH_LOG_LEVEL") {
            config.logging.level = level;
        }

        if let Ok(file) = env::var("YTGRAPH_LOG_FILE") {
            config.logging.file = Some(file);
        }

        Ok(())
    }
}
