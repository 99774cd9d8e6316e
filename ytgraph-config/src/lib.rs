//! Configuration management for YTGraphX

pub mod loader;
pub mod settings;
pub mod validation;

pub use loader::{ConfigError, ConfigLoader};
pub use settings::{
    ChartSettings, Config, DashboardSettings, ExportSettings, HistorySettings, LoggingSettings,
    YouTubeSettings,
};
