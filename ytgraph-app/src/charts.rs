//! Chart construction and saving on top of the graphs crate

use crate::pipeline::ChannelReport;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use ytgraph_common::{utils::sanitize_filename, Metric, Result};
use ytgraph_config::ChartSettings;
use ytgraph_graphs::{FontConfig, GraphConfig, GraphRenderer, MarginConfig, MetricTrendGraph, StyleConfig};

/// Map the application chart settings onto a per-metric graph configuration
pub fn graph_config_for(metric: Metric, title: String, settings: &ChartSettings) -> GraphConfig {
    GraphConfig {
        title,
        width: settings.width,
        height: settings.height,
        x_label: None,
        y_label: None,
        style: StyleConfig {
            line_color: Some(settings.color_for(metric).to_string()),
            background_color: Some(settings.background_color.clone()),
            grid_color: Some(settings.grid_color.clone()),
            text_color: Some("#FFFFFF".to_string()),
            title_font: FontConfig {
                family: settings.font_family.clone(),
                size: settings.font_size + 8,
            },
            axis_font: FontConfig {
                family: settings.font_family.clone(),
                size: settings.font_size,
            },
            margins: MarginConfig::default(),
        },
    }
}

/// Render one PNG per metric into `output_dir`, returning the paths written.
///
/// Files are named `<sanitized-title>_<metric>.png`.
pub async fn save_charts(
    report: &ChannelReport,
    settings: &ChartSettings,
    output_dir: &Path,
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(output_dir)?;
    let slug = sanitize_filename(&report.snapshot.title);

    let mut written = Vec::new();
    for metric in Metric::ALL {
        let Some(series) = report.series.get(&metric) else {
            continue;
        };
        let graph = MetricTrendGraph::new(series.clone(), report.snapshot.title.clone());
        let config = graph_config_for(metric, graph.title(), settings);
        let path = output_dir.join(format!("{}_{}.png", slug, metric.as_str()));
        graph.render_to_file(&config, &path).await?;
        written.push(path);
    }

    info!("Saved {} charts to {}", written.len(), output_dir.display());
    Ok(written)
}

/// Render one inline SVG per metric for the dashboard
pub fn render_chart_svgs(
    report: &ChannelReport,
    settings: &ChartSettings,
) -> Result<Vec<(Metric, String)>> {
    let mut svgs = Vec::new();
    for metric in Metric::ALL {
        let Some(series) = report.series.get(&metric) else {
            continue;
        };
        let graph = MetricTrendGraph::new(series.clone(), report.snapshot.title.clone());
        let config = graph_config_for(metric, graph.title(), settings);
        svgs.push((metric, graph.render_svg(&config)?));
    }
    Ok(svgs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use tempfile::tempdir;
    use ytgraph_common::ChannelSnapshot;
    use ytgraph_stats::TrendSynthesizer;

    fn report() -> ChannelReport {
        let snapshot = ChannelSnapshot {
            id: "UC123".to_string(),
            title: "Chart Channel".to_string(),
            description: String::new(),
            custom_url: None,
            published_at: Utc.with_ymd_and_hms(2015, 3, 1, 0, 0, 0).unwrap(),
            subscriber_count: 10_000,
            view_count: 500_000,
            video_count: 120,
            fetched_at: Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap(),
        };
        let series = TrendSynthesizer::default().build_series(&snapshot, 12);
        ChannelReport {
            snapshot,
            series,
            videos: Vec::new(),
        }
    }

    #[test]
    fn test_graph_config_uses_metric_color() {
        let settings = ChartSettings::default();
        let config = graph_config_for(Metric::Views, "t".to_string(), &settings);
        assert_eq!(config.style.line_color.as_deref(), Some("#00D4AA"));
        assert_eq!(config.style.background_color.as_deref(), Some("#0F0F0F"));
        assert_eq!(config.width, 1000);
    }

    #[test]
    fn test_render_chart_svgs() {
        let svgs = render_chart_svgs(&report(), &ChartSettings::default()).unwrap();
        assert_eq!(svgs.len(), 3);
        for (metric, svg) in &svgs {
            assert!(svg.contains("</svg>"), "missing svg close for {}", metric);
        }
    }

    #[tokio::test]
    async fn test_save_charts_writes_one_png_per_metric() {
        let dir = tempdir().unwrap();
        let written = save_charts(&report(), &ChartSettings::default(), dir.path())
            .await
            .unwrap();

        assert_eq!(written.len(), 3);
        for path in &written {
            assert!(path.exists());
        }
        assert!(written
            .iter()
            .any(|p| p.file_name().unwrap() == "Chart_Channel_subscribers.png"));
    }
}
