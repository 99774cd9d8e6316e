//! Flat-record export of snapshots, trend series and video lists
//!
//! Three record groups are produced: current stats (one row), historical
//! points in long format, and one row per video. Rows are serde-serializable
//! so the same structures back both CSV files and in-memory CSV downloads.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use tracing::info;
use ytgraph_common::{
    utils, ChannelSnapshot, Metric, MetricSeries, Result, VideoSummary, YtGraphError,
};

/// Column headers for a CSV record group, written even when the group is empty
pub trait CsvRecord: Serialize {
    const HEADERS: &'static [&'static str];
}

/// One row of current channel statistics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentStatsRow {
    pub channel_id: String,
    pub title: String,
    pub subscribers: u64,
    pub views: u64,
    pub videos: u64,
    pub average_views_per_video: u64,
    pub published_at: String,
    pub fetched_at: String,
}

impl CsvRecord for CurrentStatsRow {
    const HEADERS: &'static [&'static str] = &[
        "channel_id",
        "title",
        "subscribers",
        "views",
        "videos",
        "average_views_per_video",
        "published_at",
        "fetched_at",
    ];
}

/// One historical point in long format
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryRow {
    pub timestamp: String,
    pub metric: String,
    pub value: u64,
    pub origin: String,
}

impl CsvRecord for HistoryRow {
    const HEADERS: &'static [&'static str] = &["timestamp", "metric", "value", "origin"];
}

/// One row per recent video
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VideoRow {
    pub video_id: String,
    pub title: String,
    pub published_at: String,
    pub views: u64,
    pub likes: u64,
    pub comments: u64,
}

impl CsvRecord for VideoRow {
    const HEADERS: &'static [&'static str] =
        &["video_id", "title", "published_at", "views", "likes", "comments"];
}

/// The three record groups, in export order
#[derive(Debug, Clone, Default)]
pub struct ExportRows {
    pub current: Vec<CurrentStatsRow>,
    pub history: Vec<HistoryRow>,
    pub videos: Vec<VideoRow>,
}

/// Flatten a snapshot, its trend series and a video list into export rows.
///
/// Fails with a validation error if `series_map` is non-empty while
/// `snapshot` is absent: a series must always be anchored. Nothing is
/// truncated — limiting is the caller's responsibility.
pub fn to_rows(
    snapshot: Option<&ChannelSnapshot>,
    series_map: &BTreeMap<Metric, MetricSeries>,
    videos: &[VideoSummary],
) -> Result<ExportRows> {
    if snapshot.is_none() && !series_map.is_empty() {
        return Err(YtGraphError::validation_field(
            "Historical series require an anchoring snapshot",
            "snapshot",
        ));
    }

    let mut rows = ExportRows::default();

    if let Some(snap) = snapshot {
        rows.current.push(CurrentStatsRow {
            channel_id: snap.id.clone(),
            title: snap.title.clone(),
            subscribers: snap.subscriber_count,
            views: snap.view_count,
            videos: snap.video_count,
            average_views_per_video: snap.average_views_per_video(),
            published_at: snap.published_at.format("%Y-%m-%d").to_string(),
            fetched_at: utils::format_timestamp(&snap.fetched_at),
        });
    }

    for (metric, series) in series_map {
        for point in &series.points {
            rows.history.push(HistoryRow {
                timestamp: point.timestamp.format("%Y-%m-%d").to_string(),
                metric: metric.as_str().to_string(),
                value: point.value,
                origin: series.origin.as_str().to_string(),
            });
        }
    }

    for video in videos {
        rows.videos.push(VideoRow {
            video_id: video.id.clone(),
            title: video.title.clone(),
            published_at: video.published_at.format("%Y-%m-%d").to_string(),
            views: video.view_count,
            likes: video.like_count,
            comments: video.comment_count,
        });
    }

    Ok(rows)
}

/// Serialize one record group to a CSV string with a header row
pub fn to_csv_string<T: CsvRecord>(rows: &[T]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    if rows.is_empty() {
        writer.write_record(T::HEADERS)?;
    } else {
        for row in rows {
            writer.serialize(row)?;
        }
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| YtGraphError::new(format!("Failed to finalize CSV buffer: {}", e)))?;
    String::from_utf8(bytes)
        .map_err(|e| YtGraphError::with_source("CSV output was not valid UTF-8", e))
}

/// Writes one UTF-8 CSV file per record group
#[derive(Debug, Clone)]
pub struct CsvExporter {
    output_dir: PathBuf,
}

impl CsvExporter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Write the three record groups, returning the paths written.
    ///
    /// Files are named after the sanitized channel title:
    /// `<title>_current_stats.csv`, `<title>_history.csv`, `<title>_videos.csv`.
    pub fn write_all(&self, channel_title: &str, rows: &ExportRows) -> Result<Vec<PathBuf>> {
        fs::create_dir_all(&self.output_dir)?;
        let slug = utils::sanitize_filename(channel_title);

        let written = vec![
            self.write_group(&format!("{}_current_stats.csv", slug), &rows.current)?,
            self.write_group(&format!("{}_history.csv", slug), &rows.history)?,
            self.write_group(&format!("{}_videos.csv", slug), &rows.videos)?,
        ];

        info!(
            "Exported {} current, {} history and {} video rows to {}",
            rows.current.len(),
            rows.history.len(),
            rows.videos.len(),
            self.output_dir.display()
        );

        Ok(written)
    }

    fn write_group<T: CsvRecord>(&self, file_name: &str, rows: &[T]) -> Result<PathBuf> {
        let path = self.output_dir.join(file_name);
        fs::write(&path, to_csv_string(rows)?)?;
        Ok(path)
    }
}
