//! Common utilities and types for YTGraphX

pub mod error;
pub mod logging;
pub mod types;
pub mod utils;
pub mod youtube;

// Re-export commonly used types
pub use error::{Result, YtGraphError};
pub use logging::{init_default_logging, init_logging, LoggingConfig};
pub use types::*;
pub use youtube::{YouTubeClient, YouTubeConfig};
