//! The fetch → synthesize → format pipeline shared by the CLI and dashboard

use std::collections::BTreeMap;
use tracing::{info, instrument};
use ytgraph_common::{
    ChannelSnapshot, Metric, MetricSeries, Result, VideoSummary, YouTubeClient,
};
use ytgraph_stats::TrendSynthesizer;

/// Everything one user action produces: the live snapshot, the trend series
/// anchored on it, and the recent videos. Held in memory only.
#[derive(Debug, Clone)]
pub struct ChannelReport {
    pub snapshot: ChannelSnapshot,
    pub series: BTreeMap<Metric, MetricSeries>,
    pub videos: Vec<VideoSummary>,
}

impl ChannelReport {
    /// Total number of synthesized data points across all series
    pub fn synthesized_point_count(&self) -> usize {
        self.series
            .values()
            .filter(|s| s.is_synthesized())
            .map(|s| s.len())
            .sum()
    }

    /// Whether any series carries synthesized data
    pub fn has_synthesized_data(&self) -> bool {
        self.series.values().any(|s| s.is_synthesized())
    }
}

/// Run the sequential pipeline for one channel.
///
/// One fetch, one synthesis, one video-list call; no retries, no background
/// work. `video_limit` of 0 skips the video lookup entirely (and its quota
/// cost).
#[instrument(skip(client, synthesizer), fields(identifier = %identifier, months = months))]
pub async fn analyze_channel(
    client: &YouTubeClient,
    synthesizer: &TrendSynthesizer,
    identifier: &str,
    months: u32,
    video_limit: usize,
) -> Result<ChannelReport> {
    let snapshot = client.fetch_channel(identifier).await?;
    info!("Fetched snapshot for channel '{}'", snapshot.title);

    let series = synthesizer.build_series(&snapshot, months);
    let videos = client.fetch_recent_videos(&snapshot.id, video_limit).await?;

    Ok(ChannelReport {
        snapshot,
        series,
        videos,
    })
}
