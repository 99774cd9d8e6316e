//! Metric trend line chart implementation

use crate::{GraphConfig, GraphRenderer};
use chrono::{TimeZone, Utc};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;
use ytgraph_common::{utils, MetricSeries, Result, Timestamp, YtGraphError};

/// Line chart for a single metric's trend series.
///
/// Synthesized series are labeled as such in the chart title so a rendered
/// image can never be mistaken for measured history.
#[derive(Debug)]
pub struct MetricTrendGraph {
    /// The series to plot, points ordered by timestamp ascending
    pub series: MetricSeries,
    /// Channel display name used in the title
    pub channel_name: String,
    /// Whether to mark each point with a circle
    pub show_data_points: bool,
}

impl MetricTrendGraph {
    /// Create a new trend graph with data point markers enabled
    pub fn new(series: MetricSeries, channel_name: impl Into<String>) -> Self {
        Self {
            series,
            channel_name: channel_name.into(),
            show_data_points: true,
        }
    }

    /// Create with minimal styling (just the line, no point markers)
    pub fn minimal(series: MetricSeries, channel_name: impl Into<String>) -> Self {
        Self {
            series,
            channel_name: channel_name.into(),
            show_data_points: false,
        }
    }

    /// Chart title, tagged when the series is synthesized
    pub fn title(&self) -> String {
        let mut title = format!(
            "{} Trend - {}",
            self.series.metric.label(),
            self.channel_name
        );
        if self.series.is_synthesized() {
            title.push_str(" (synthesized)");
        }
        title
    }

    /// Convert a timestamp to a continuous x-axis value (days since epoch)
    fn day_value(timestamp: &Timestamp) -> f64 {
        timestamp.timestamp() as f64 / 86_400.0
    }

    /// Format an x-axis value back into a month label
    fn format_day_value(day: f64) -> String {
        let secs = (day * 86_400.0) as i64;
        Utc.timestamp_opt(secs, 0)
            .single()
            .map(|ts| ts.format("%b %Y").to_string())
            .unwrap_or_default()
    }

    /// Convert the series to plotters-compatible (x, y) pairs
    fn prepare_plot_data(&self) -> Vec<(f64, f64)> {
        self.series
            .points
            .iter()
            .map(|p| (Self::day_value(&p.timestamp), p.value as f64))
            .collect()
    }

    /// Get data ranges for axis scaling
    fn get_data_ranges(&self) -> (f64, f64, f64, f64) {
        let plot_data = self.prepare_plot_data();
        if plot_data.is_empty() {
            return (0.0, 1.0, 0.0, 10.0);
        }

        let x_min = plot_data.first().map(|p| p.0).unwrap_or(0.0);
        let x_max = plot_data.last().map(|p| p.0).unwrap_or(1.0);
        let x_pad = ((x_max - x_min) * 0.02).max(1.0);

        // Always start the y-axis at 0 for counts, pad the top by 10%
        let y_max = plot_data.iter().fold(0.0f64, |a, p| a.max(p.1));
        let y_max = if y_max > 0.0 { y_max * 1.1 } else { 10.0 };

        (x_min - x_pad, x_max + x_pad, 0.0, y_max)
    }

    fn draw_chart<DB: DrawingBackend>(
        &self,
        root: &DrawingArea<DB, Shift>,
        config: &GraphConfig,
    ) -> Result<()>
    where
        DB::ErrorType: std::error::Error + Send + Sync + 'static,
    {
        if self.series.is_empty() {
            return Err(YtGraphError::graph(format!(
                "No data available for {} trend chart",
                self.series.metric
            )));
        }

        let bg_color = self.get_background_color(config);
        root.fill(&bg_color)?;

        let text_color = self.get_text_color(config);
        let grid_color = config
            .style
            .grid_color
            .as_ref()
            .map(|c| self.parse_color(c))
            .unwrap_or(RGBColor(39, 39, 39));
        let line_color = config
            .style
            .line_color
            .as_ref()
            .map(|c| self.parse_color(c))
            .unwrap_or(RGBColor(255, 0, 0));

        let (x_min, x_max, y_min, y_max) = self.get_data_ranges();
        let plot_data = self.prepare_plot_data();

        let title_font = (
            config.style.title_font.family.as_str(),
            config.style.title_font.size,
        )
            .into_font()
            .color(&text_color);
        let axis_font = (
            config.style.axis_font.family.as_str(),
            config.style.axis_font.size,
        )
            .into_font()
            .color(&text_color);

        let mut chart = ChartBuilder::on(root)
            .caption(&config.title, title_font)
            .margin(config.style.margins.top as i32)
            .x_label_area_size(config.style.margins.bottom)
            .y_label_area_size(config.style.margins.left)
            .build_cartesian_2d(x_min..x_max, y_min..y_max)?;

        chart
            .configure_mesh()
            .x_desc(config.x_label.as_deref().unwrap_or("Date"))
            .y_desc(
                config
                    .y_label
                    .as_deref()
                    .unwrap_or(self.series.metric.label()),
            )
            .label_style(axis_font.clone())
            .axis_desc_style(axis_font)
            .bold_line_style(&grid_color)
            .light_line_style(&grid_color.mix(0.4))
            .x_label_formatter(&|x| Self::format_day_value(*x))
            .y_label_formatter(&|y| utils::format_count(*y as u64))
            .draw()?;

        chart.draw_series(LineSeries::new(
            plot_data.clone(),
            line_color.stroke_width(3),
        ))?;

        if self.show_data_points {
            chart.draw_series(
                plot_data
                    .iter()
                    .map(|&(x, y)| Circle::new((x, y), 4, line_color.filled())),
            )?;
        }

        root.present()?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl GraphRenderer for MetricTrendGraph {
    async fn render_to_file(&self, config: &GraphConfig, path: &Path) -> Result<()> {
        let root =
            BitMapBackend::new(path, (config.width, config.height)).into_drawing_area();
        self.draw_chart(&root, config)?;
        tracing::info!(
            "Rendered {} trend chart to {}",
            self.series.metric,
            path.display()
        );
        Ok(())
    }

    fn render_svg(&self, config: &GraphConfig) -> Result<String> {
        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, (config.width, config.height))
                .into_drawing_area();
            self.draw_chart(&root, config)?;
        }
        Ok(svg)
    }
}
