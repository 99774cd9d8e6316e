//! Chart generation and visualization for YTGraphX

pub mod renderer;
pub mod trend;
pub mod types;

pub use renderer::GraphRenderer;
pub use trend::MetricTrendGraph;
pub use types::*;
