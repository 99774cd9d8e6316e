//! Application configuration structures
//!
//! Configuration is an explicit object passed into each component at
//! construction; there is no process-wide singleton state.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use validator::Validate;
use ytgraph_common::Metric;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Config {
    /// YouTube API settings
    #[serde(default)]
    #[validate]
    pub youtube: YouTubeSettings,

    /// Synthesized-history settings
    #[serde(default)]
    #[validate]
    pub history: HistorySettings,

    /// Chart rendering settings
    #[serde(default)]
    #[validate]
    pub chart: ChartSettings,

    /// CSV export settings
    #[serde(default)]
    #[validate]
    pub export: ExportSettings,

    /// Web dashboard settings
    #[serde(default)]
    #[validate]
    pub dashboard: DashboardSettings,

    /// Logging settings
    #[serde(default)]
    #[validate]
    pub logging: LoggingSettings,
}

/// YouTube API settings
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct YouTubeSettings {
    /// API key; required before any request is made
    pub api_key: String,

    /// Base URL of the Data API
    #[validate(length(min = 1, message = "API base URL cannot be empty"))]
    pub base_url: String,

    /// Request timeout in seconds
    #[validate(range(min = 1, max = 300, message = "Timeout must be between 1 and 300 seconds"))]
    pub timeout_seconds: u64,
}

/// Settings for the synthesized trend series
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct HistorySettings {
    /// Lookback window length in months (one point per month)
    #[validate(range(min = 1, max = 120, message = "Months must be between 1 and 120"))]
    pub months: u32,

    /// Assumed month-over-month growth rate used by the pseudo-growth model
    #[validate(range(min = 0.0, max = 0.9, message = "Monthly growth must be between 0 and 0.9"))]
    pub monthly_growth: f64,

    /// Jitter applied to the growth rate (fraction of the decay factor)
    #[validate(range(min = 0.0, max = 0.5, message = "Variation must be between 0 and 0.5"))]
    pub variation: f64,
}

/// Chart rendering settings
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ChartSettings {
    /// Chart width in pixels
    #[validate(range(min = 100, max = 4000, message = "Width must be between 100 and 4000 pixels"))]
    pub width: u32,

    /// Chart height in pixels
    #[validate(range(min = 100, max = 4000, message = "Height must be between 100 and 4000 pixels"))]
    pub height: u32,

    /// Background color (hex format)
    #[validate(regex(
        path = "crate::validation::HEX_COLOR_REGEX",
        message = "Background color must be a valid hex color"
    ))]
    pub background_color: String,

    /// Grid line color (hex format)
    #[validate(regex(
        path = "crate::validation::HEX_COLOR_REGEX",
        message = "Grid color must be a valid hex color"
    ))]
    pub grid_color: String,

    /// Metric name → line color (hex format)
    #[validate(custom(
        function = "crate::validation::validate_color_map",
        message = "Color map keys must be metric names and values hex colors"
    ))]
    pub colors: HashMap<String, String>,

    /// Font family for text rendering
    pub font_family: String,

    /// Font size for labels
    #[validate(range(min = 8, max = 72, message = "Font size must be between 8 and 72"))]
    pub font_size: u32,
}

impl ChartSettings {
    /// The configured line color for a metric, falling back to the default palette
    pub fn color_for(&self, metric: Metric) -> &str {
        self.colors
            .get(metric.as_str())
            .map(String::as_str)
            .unwrap_or(default_metric_color(metric))
    }
}

/// Built-in palette used when a metric has no configured color
fn default_metric_color(metric: Metric) -> &'static str {
    match metric {
        Metric::Subscribers => "#FF0000",
        Metric::Views => "#00D4AA",
        Metric::Videos => "#FF6B35",
    }
}

/// CSV export settings
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ExportSettings {
    /// Directory export files are written to
    #[validate(length(min = 1, message = "Export directory cannot be empty"))]
    pub output_dir: String,
}

/// Web dashboard settings
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DashboardSettings {
    /// Socket address the dashboard binds to
    #[validate(custom(
        function = "crate::validation::validate_bind_address",
        message = "Bind address must be of the form host:port"
    ))]
    pub bind_address: String,
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoggingSettings {
    /// Log level (trace, debug, info, warn, error)
    #[validate(custom(
        function = "crate::validation::validate_log_level",
        message = "Log level must be one of: trace, debug, info, warn, error"
    ))]
    pub level: String,

    /// Optional log file path
    pub file: Option<String>,

    /// Whether to use colored output (for console logging)
    pub colored: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            youtube: YouTubeSettings::default(),
            history: HistorySettings::default(),
            chart: ChartSettings::default(),
            export: ExportSettings::default(),
            dashboard: DashboardSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

impl Default for YouTubeSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://www.googleapis.com/youtube/v3".to_string(),
            timeout_seconds: 30,
        }
    }
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self {
            months: 12,
            monthly_growth: 0.05,
            variation: 0.2,
        }
    }
}

impl Default for ChartSettings {
    fn default() -> Self {
        let mut colors = HashMap::new();
        colors.insert("subscribers".to_string(), "#FF0000".to_string());
        colors.insert("views".to_string(), "#00D4AA".to_string());
        colors.insert("videos".to_string(), "#FF6B35".to_string());

        Self {
            width: 1000,
            height: 600,
            background_color: "#0F0F0F".to_string(),
            grid_color: "#272727".to_string(),
            colors,
            font_family: "sans-serif".to_string(),
            font_size: 12,
        }
    }
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            output_dir: "exports".to_string(),
        }
    }
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8080".to_string(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
            colored: true,
        }
    }
}
