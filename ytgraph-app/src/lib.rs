//! YTGraphX application library
//!
//! Shared plumbing for the `ytgraph` CLI and the `ytgraph-web` dashboard:
//! the fetch → synthesize → format pipeline, terminal report formatting,
//! chart construction and the dashboard router.

pub mod charts;
pub mod dashboard;
pub mod display;
pub mod pipeline;

pub use dashboard::{create_router, AppState};
pub use pipeline::{analyze_channel, ChannelReport};
