//! Plain-text report formatting for the CLI

use crate::pipeline::ChannelReport;
use ytgraph_common::{
    utils::{format_count, format_date},
    ChannelSnapshot, VideoSummary,
};

const SEPARATOR: &str =
    "============================================================";

/// Format the channel summary block
pub fn format_channel_info(snapshot: &ChannelSnapshot) -> String {
    let mut out = String::new();
    out.push('\n');
    out.push_str(SEPARATOR);
    out.push('\n');
    out.push_str(&format!("CHANNEL: {}\n", snapshot.title));
    out.push_str(SEPARATOR);
    out.push('\n');

    if let Some(url) = &snapshot.custom_url {
        out.push_str(&format!(
            "URL:          https://youtube.com/{}\n",
            url
        ));
    }
    out.push_str(&format!(
        "Created:      {}\n",
        format_date(&snapshot.published_at)
    ));
    out.push_str(&format!(
        "Subscribers:  {:>10}\n",
        format_count(snapshot.subscriber_count)
    ));
    out.push_str(&format!(
        "Views:        {:>10}\n",
        format_count(snapshot.view_count)
    ));
    out.push_str(&format!(
        "Videos:       {:>10}\n",
        format_count(snapshot.video_count)
    ));
    out.push_str(&format!(
        "Views/video:  {:>10}\n",
        format_count(snapshot.average_views_per_video())
    ));

    if !snapshot.description.is_empty() {
        let description: String = if snapshot.description.chars().count() > 200 {
            let truncated: String = snapshot.description.chars().take(200).collect();
            format!("{}...", truncated)
        } else {
            snapshot.description.clone()
        };
        out.push_str("\nDescription:\n");
        out.push_str(&format!("  {}\n", description));
    }
    out.push_str(SEPARATOR);
    out.push('\n');
    out
}

/// Format the recent videos block
pub fn format_recent_videos(videos: &[VideoSummary]) -> String {
    if videos.is_empty() {
        return "\nNo videos found.\n".to_string();
    }

    let mut out = String::new();
    out.push_str(&format!("\nLATEST {} VIDEOS:\n", videos.len()));
    out.push_str("------------------------------------------------------------\n");

    for (i, video) in videos.iter().enumerate() {
        out.push_str(&format!("\n{}. {}\n", i + 1, video.title));
        out.push_str(&format!("   Published: {}\n", format_date(&video.published_at)));
        out.push_str(&format!(
            "   {} views, {} likes, {} comments\n",
            format_count(video.view_count),
            format_count(video.like_count),
            format_count(video.comment_count)
        ));
    }
    out
}

/// Format the closing summary, naming the synthesized data points
pub fn format_summary(report: &ChannelReport, quota_used: u64) -> String {
    let mut out = String::new();
    out.push_str("\nAnalysis complete.\n");
    for series in report.series.values() {
        out.push_str(&format!(
            "  {} data points for {} ({})\n",
            series.len(),
            series.metric.label().to_lowercase(),
            series.origin
        ));
    }
    if report.has_synthesized_data() {
        out.push_str(
            "  Note: historical series are synthesized from the current snapshot,\n  not retrieved from the platform.\n",
        );
    }
    out.push_str(&format!("  API quota units used: {}\n", quota_used));
    out
}
