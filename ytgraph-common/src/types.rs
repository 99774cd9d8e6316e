//! Common types used across the YTGraphX application

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Timestamp type used throughout the application
pub type Timestamp = DateTime<Utc>;

/// The channel metrics tracked by the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Subscribers,
    Views,
    Videos,
}

impl Metric {
    /// All tracked metrics, in display order
    pub const ALL: [Metric; 3] = [Metric::Subscribers, Metric::Views, Metric::Videos];

    /// Lowercase machine name, used for CSV rows, config color keys and file names
    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Subscribers => "subscribers",
            Metric::Views => "views",
            Metric::Videos => "videos",
        }
    }

    /// Human-readable label for chart titles and table headers
    pub fn label(&self) -> &'static str {
        match self {
            Metric::Subscribers => "Subscribers",
            Metric::Views => "Views",
            Metric::Videos => "Videos",
        }
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Metric {
    type Err = crate::YtGraphError;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s {
            "subscribers" => Ok(Metric::Subscribers),
            "views" => Ok(Metric::Views),
            "videos" => Ok(Metric::Videos),
            other => Err(crate::YtGraphError::validation_field(
                format!("Unknown metric: {}", other),
                "metric",
            )),
        }
    }
}

/// A single point-in-time read of a channel's current statistics.
///
/// Immutable once fetched; one per API call. All counts are the live values
/// reported by the platform at `fetched_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelSnapshot {
    /// Channel ID (the `UC…` form)
    pub id: String,
    /// Channel display name
    pub title: String,
    /// Channel description
    pub description: String,
    /// Custom URL / handle, without scheme (e.g. `@somechannel`)
    pub custom_url: Option<String>,
    /// Channel creation timestamp
    pub published_at: Timestamp,
    /// Current subscriber count
    pub subscriber_count: u64,
    /// Current total view count
    pub view_count: u64,
    /// Current uploaded video count
    pub video_count: u64,
    /// When this snapshot was read from the API
    pub fetched_at: Timestamp,
}

impl ChannelSnapshot {
    /// The live value for a tracked metric
    pub fn metric_value(&self, metric: Metric) -> u64 {
        match metric {
            Metric::Subscribers => self.subscriber_count,
            Metric::Views => self.view_count,
            Metric::Videos => self.video_count,
        }
    }

    /// Average views per uploaded video (0-video channels report their total views)
    pub fn average_views_per_video(&self) -> u64 {
        self.view_count / self.video_count.max(1)
    }
}

/// Summary statistics for a single uploaded video
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoSummary {
    /// Video ID
    pub id: String,
    /// Video title
    pub title: String,
    /// Publish timestamp
    pub published_at: Timestamp,
    /// View count
    pub view_count: u64,
    /// Like count
    pub like_count: u64,
    /// Comment count
    pub comment_count: u64,
}

/// Whether a series was read from the platform or generated locally.
///
/// The platform exposes no historical endpoint, so trend series are
/// synthesized from the live snapshot. Consumers must never conflate the two,
/// so the distinction travels with the data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesOrigin {
    /// Read directly from the API
    Measured,
    /// Generated from a pseudo-growth model anchored on a live snapshot
    Synthesized,
}

impl SeriesOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            SeriesOrigin::Measured => "measured",
            SeriesOrigin::Synthesized => "synthesized",
        }
    }
}

impl std::fmt::Display for SeriesOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One (timestamp, value) observation within a [`MetricSeries`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    pub timestamp: Timestamp,
    pub value: u64,
}

/// An ordered sequence of points sharing one metric name.
///
/// Points are ordered by timestamp ascending. The final point always equals
/// the corresponding field of the [`ChannelSnapshot`] that anchored the
/// series; earlier points are synthesized, not retrieved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSeries {
    /// The metric all points belong to
    pub metric: Metric,
    /// Whether the points were measured or synthesized
    pub origin: SeriesOrigin,
    /// Points ordered by timestamp ascending
    pub points: Vec<TimeSeriesPoint>,
}

impl MetricSeries {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The most recent (anchoring) point
    pub fn latest(&self) -> Option<&TimeSeriesPoint> {
        self.points.last()
    }

    pub fn is_synthesized(&self) -> bool {
        self.origin == SeriesOrigin::Synthesized
    }

    /// Values never decrease as timestamps increase
    pub fn is_non_decreasing(&self) -> bool {
        self.points.windows(2).all(|w| w[0].value <= w[1].value)
    }

    /// Timestamps strictly increase
    pub fn is_chronological(&self) -> bool {
        self.points
            .windows(2)
            .all(|w| w[0].timestamp < w[1].timestamp)
    }

    /// The final point matches the anchoring snapshot's live value
    pub fn is_anchored_to(&self, snapshot: &ChannelSnapshot) -> bool {
        self.latest()
            .map(|p| p.value == snapshot.metric_value(self.metric))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn snapshot() -> ChannelSnapshot {
        ChannelSnapshot {
            id: "UC123".to_string(),
            title: "Test Channel".to_string(),
            description: String::new(),
            custom_url: Some("@testchannel".to_string()),
            published_at: Utc.with_ymd_and_hms(2015, 3, 1, 0, 0, 0).unwrap(),
            subscriber_count: 1_000,
            view_count: 50_000,
            video_count: 25,
            fetched_at: Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_metric_roundtrip() {
        for metric in Metric::ALL {
            let parsed: Metric = metric.as_str().parse().unwrap();
            assert_eq!(parsed, metric);
        }
        assert!("plays".parse::<Metric>().is_err());
    }

    #[test]
    fn test_metric_value_accessor() {
        let snap = snapshot();
        assert_eq!(snap.metric_value(Metric::Subscribers), 1_000);
        assert_eq!(snap.metric_value(Metric::Views), 50_000);
        assert_eq!(snap.metric_value(Metric::Videos), 25);
    }

    #[test]
    fn test_average_views_per_video() {
        let mut snap = snapshot();
        assert_eq!(snap.average_views_per_video(), 2_000);

        snap.video_count = 0;
        assert_eq!(snap.average_views_per_video(), 50_000);
    }

    #[test]
    fn test_series_invariant_helpers() {
        let snap = snapshot();
        let base = snap.fetched_at;
        let series = MetricSeries {
            metric: Metric::Subscribers,
            origin: SeriesOrigin::Synthesized,
            points: vec![
                TimeSeriesPoint {
                    timestamp: base - chrono::Duration::days(60),
                    value: 800,
                },
                TimeSeriesPoint {
                    timestamp: base - chrono::Duration::days(30),
                    value: 900,
                },
                TimeSeriesPoint {
                    timestamp: base,
                    value: 1_000,
                },
            ],
        };

        assert_eq!(series.len(), 3);
        assert!(series.is_synthesized());
        assert!(series.is_non_decreasing());
        assert!(series.is_chronological());
        assert!(series.is_anchored_to(&snap));
        assert_eq!(series.latest().unwrap().value, 1_000);
    }

    #[test]
    fn test_series_not_anchored_when_final_value_differs() {
        let snap = snapshot();
        let series = MetricSeries {
            metric: Metric::Views,
            origin: SeriesOrigin::Synthesized,
            points: vec![TimeSeriesPoint {
                timestamp: snap.fetched_at,
                value: 49_999,
            }],
        };
        assert!(!series.is_anchored_to(&snap));
    }

    #[test]
    fn test_non_decreasing_rejects_drop() {
        let series = MetricSeries {
            metric: Metric::Videos,
            origin: SeriesOrigin::Synthesized,
            points: vec![
                TimeSeriesPoint {
                    timestamp: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
                    value: 10,
                },
                TimeSeriesPoint {
                    timestamp: Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap(),
                    value: 9,
                },
            ],
        };
        assert!(!series.is_non_decreasing());
    }

    #[test]
    fn test_snapshot_serde_roundtrip() {
        let snap = snapshot();
        let json = serde_json::to_string(&snap).unwrap();
        let back: ChannelSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snap);
    }

    #[test]
    fn test_origin_serializes_lowercase() {
        let json = serde_json::to_string(&SeriesOrigin::Synthesized).unwrap();
        assert_eq!(json, "\"synthesized\"");
        assert_eq!(SeriesOrigin::Measured.to_string(), "measured");
    }
}
