//! Web dashboard for channel lookup, charts and CSV download
//!
//! Stateless: every request runs one sequential fetch → synthesize → format
//! pipeline. The only shared state is the immutable configuration and the
//! pooled HTTP client.

use crate::charts;
use crate::pipeline::{analyze_channel, ChannelReport};
use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::warn;
use ytgraph_common::{
    utils::{format_count, format_date, sanitize_filename},
    Result, YouTubeClient, YtGraphError,
};
use ytgraph_config::Config;
use ytgraph_stats::{to_csv_string, to_rows, TrendSynthesizer};

/// Shared application state for the dashboard
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<Config>,
    /// YouTube API client
    pub client: YouTubeClient,
    /// Trend synthesizer
    pub synthesizer: TrendSynthesizer,
}

impl AppState {
    pub fn new(config: Arc<Config>, client: YouTubeClient) -> Self {
        let synthesizer = TrendSynthesizer::new(
            config.history.monthly_growth,
            config.history.variation,
        );
        Self {
            config,
            client,
            synthesizer,
        }
    }
}

/// Query parameters for the report and export endpoints
#[derive(Debug, Deserialize)]
pub struct ChannelQuery {
    /// Channel ID, handle or username
    pub q: String,
    /// Lookback window length in months
    pub months: Option<u32>,
    /// Number of recent videos to include
    pub videos: Option<usize>,
}

/// Create the dashboard router with all endpoints
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/channel", get(channel_report))
        .route("/export/stats.csv", get(export_stats))
        .route("/export/history.csv", get(export_history))
        .route("/export/videos.csv", get(export_videos))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run the pipeline for one dashboard request
async fn run_pipeline(state: &AppState, query: &ChannelQuery) -> Result<ChannelReport> {
    let months = query
        .months
        .unwrap_or(state.config.history.months)
        .clamp(1, 120);
    let videos = query.videos.unwrap_or(5).min(50);
    analyze_channel(&state.client, &state.synthesizer, &query.q, months, videos).await
}

async fn index() -> Html<String> {
    Html(index_page())
}

async fn channel_report(
    State(state): State<AppState>,
    Query(query): Query<ChannelQuery>,
) -> Response {
    match run_pipeline(&state, &query).await {
        Ok(report) => match charts::render_chart_svgs(&report, &state.config.chart) {
            Ok(svgs) => Html(report_page(&report, &svgs, &query)).into_response(),
            Err(error) => error_response(&error),
        },
        Err(error) => error_response(&error),
    }
}

async fn export_stats(
    State(state): State<AppState>,
    Query(query): Query<ChannelQuery>,
) -> Response {
    match run_pipeline(&state, &query).await {
        Ok(report) => {
            let rows = match to_rows(Some(&report.snapshot), &report.series, &report.videos) {
                Ok(rows) => rows,
                Err(error) => return error_response(&error),
            };
            match to_csv_string(&rows.current) {
                Ok(csv) => csv_response(&report.snapshot.title, "current_stats", csv),
                Err(error) => error_response(&error),
            }
        }
        Err(error) => error_response(&error),
    }
}

async fn export_history(
    State(state): State<AppState>,
    Query(query): Query<ChannelQuery>,
) -> Response {
    match run_pipeline(&state, &query).await {
        Ok(report) => {
            let rows = match to_rows(Some(&report.snapshot), &report.series, &report.videos) {
                Ok(rows) => rows,
                Err(error) => return error_response(&error),
            };
            match to_csv_string(&rows.history) {
                Ok(csv) => csv_response(&report.snapshot.title, "history", csv),
                Err(error) => error_response(&error),
            }
        }
        Err(error) => error_response(&error),
    }
}

async fn export_videos(
    State(state): State<AppState>,
    Query(query): Query<ChannelQuery>,
) -> Response {
    match run_pipeline(&state, &query).await {
        Ok(report) => {
            let rows = match to_rows(Some(&report.snapshot), &report.series, &report.videos) {
                Ok(rows) => rows,
                Err(error) => return error_response(&error),
            };
            match to_csv_string(&rows.videos) {
                Ok(csv) => csv_response(&report.snapshot.title, "videos", csv),
                Err(error) => error_response(&error),
            }
        }
        Err(error) => error_response(&error),
    }
}

/// Build a CSV attachment response
fn csv_response(channel_title: &str, group: &str, csv: String) -> Response {
    let file_name = format!("{}_{}.csv", sanitize_filename(channel_title), group);
    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file_name),
            ),
        ],
        csv,
    )
        .into_response()
}

/// Map the error taxonomy to an HTTP status code
fn status_for(error: &YtGraphError) -> StatusCode {
    match error {
        YtGraphError::NotFound { .. } => StatusCode::NOT_FOUND,
        YtGraphError::QuotaExceeded { .. } => StatusCode::TOO_MANY_REQUESTS,
        YtGraphError::Network { .. } => StatusCode::BAD_GATEWAY,
        YtGraphError::Validation { .. } => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Render an error as an inline page without crashing the session
fn error_response(error: &YtGraphError) -> Response {
    warn!("Dashboard request failed: {}", error);
    let status = status_for(error);
    (status, Html(error_page(error))).into_response()
}

// ============================================================================
// HTML rendering
// ============================================================================

/// Escape text for safe HTML interpolation
fn html_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

const STYLE: &str = r#"
body { background: #0F0F0F; color: #EEEEEE; font-family: sans-serif; margin: 0; padding: 2rem; }
a { color: #FF6B35; }
.header { background: linear-gradient(90deg, #FF0000, #CC0000); padding: 1.5rem; border-radius: 10px; margin-bottom: 2rem; text-align: center; }
.header h1 { color: white; margin: 0; }
.header p { color: #FFCCCC; margin: 0.5rem 0 0 0; }
.card { background: #272727; padding: 1rem 1.5rem; border-radius: 10px; border-left: 4px solid #FF0000; margin: 1rem 0; }
.stats { display: flex; gap: 1rem; flex-wrap: wrap; }
.stats .card { flex: 1; min-width: 10rem; text-align: center; }
.metric-value { font-size: 1.8rem; font-weight: bold; color: #FF0000; }
.metric-label { color: #CCCCCC; }
.chart { margin: 1.5rem 0; }
.chart svg { max-width: 100%; height: auto; border-radius: 10px; }
table { border-collapse: collapse; width: 100%; }
th, td { border-bottom: 1px solid #333; padding: 0.5rem; text-align: left; }
form input[type=text] { padding: 0.5rem; width: 20rem; background: #272727; color: #EEEEEE; border: 1px solid #444; border-radius: 5px; }
form button { padding: 0.5rem 1rem; background: #FF0000; color: white; border: none; border-radius: 5px; cursor: pointer; }
.notice { color: #FFCC66; }
.error { color: #FF6B6B; }
"#;

/// Wrap body content in the page skeleton
fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n<style>{}</style>\n</head>\n<body>\n{}\n</body>\n</html>\n",
        html_escape(title),
        STYLE,
        body
    )
}

/// The lookup form shared by the index and report pages
fn lookup_form(query: &str) -> String {
    format!(
        "<form action=\"/channel\" method=\"get\">\n<input type=\"text\" name=\"q\" value=\"{}\" placeholder=\"Channel ID, @handle or username\" required>\n<button type=\"submit\">Analyze</button>\n</form>",
        html_escape(query)
    )
}

/// Landing page with the channel lookup form
fn index_page() -> String {
    let body = format!(
        "<div class=\"header\"><h1>YTGraphX</h1><p>YouTube channel statistics tracker</p></div>\n\
         <div class=\"card\">\n{}\n\
         <p>Look up a channel by ID, @handle or username to see its current\n\
         statistics, trend charts and recent videos, and to download the data\n\
         as CSV.</p>\n\
         <p class=\"notice\">Historical trends are synthesized from the current\n\
         snapshot for display purposes; they are not measured history.</p>\n</div>",
        lookup_form("")
    );
    page("YTGraphX", &body)
}

/// The channel report page: stat cards, charts, videos, export links
fn report_page(
    report: &ChannelReport,
    svgs: &[(ytgraph_common::Metric, String)],
    query: &ChannelQuery,
) -> String {
    let snapshot = &report.snapshot;
    let encoded_q = urlencoding::encode(&query.q);
    let months = query.months.map(|m| format!("&months={}", m)).unwrap_or_default();

    let mut body = format!(
        "<div class=\"header\"><h1>{}</h1><p>Channel created {}</p></div>\n{}\n",
        html_escape(&snapshot.title),
        format_date(&snapshot.published_at),
        lookup_form(&query.q)
    );

    body.push_str(&format!(
        "<div class=\"stats\">\n\
         <div class=\"card\"><div class=\"metric-value\">{}</div><div class=\"metric-label\">Subscribers</div></div>\n\
         <div class=\"card\"><div class=\"metric-value\">{}</div><div class=\"metric-label\">Views</div></div>\n\
         <div class=\"card\"><div class=\"metric-value\">{}</div><div class=\"metric-label\">Videos</div></div>\n\
         <div class=\"card\"><div class=\"metric-value\">{}</div><div class=\"metric-label\">Views per video</div></div>\n\
         </div>\n",
        format_count(snapshot.subscriber_count),
        format_count(snapshot.view_count),
        format_count(snapshot.video_count),
        format_count(snapshot.average_views_per_video()),
    ));

    if report.has_synthesized_data() {
        body.push_str(
            "<p class=\"notice\">The trend charts below are synthesized from the current snapshot; they are not measured history.</p>\n",
        );
    }

    for (_, svg) in svgs {
        body.push_str(&format!("<div class=\"chart\">{}</div>\n", svg));
    }

    if !report.videos.is_empty() {
        body.push_str("<div class=\"card\"><h2>Recent videos</h2>\n<table>\n<tr><th>Title</th><th>Published</th><th>Views</th><th>Likes</th><th>Comments</th></tr>\n");
        for video in &report.videos {
            body.push_str(&format!(
                "<tr><td><a href=\"https://youtube.com/watch?v={}\">{}</a></td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
                html_escape(&video.id),
                html_escape(&video.title),
                format_date(&video.published_at),
                format_count(video.view_count),
                format_count(video.like_count),
                format_count(video.comment_count),
            ));
        }
        body.push_str("</table></div>\n");
    }

    body.push_str(&format!(
        "<div class=\"card\"><h2>Export</h2>\n\
         <p><a href=\"/export/stats.csv?q={q}{m}\">Current stats CSV</a> |\n\
         <a href=\"/export/history.csv?q={q}{m}\">Historical data CSV</a> |\n\
         <a href=\"/export/videos.csv?q={q}{m}\">Videos CSV</a></p>\n</div>",
        q = encoded_q,
        m = months,
    ));

    page(&format!("{} - YTGraphX", snapshot.title), &body)
}

/// Inline error page
fn error_page(error: &YtGraphError) -> String {
    let body = format!(
        "<div class=\"header\"><h1>YTGraphX</h1><p>YouTube channel statistics tracker</p></div>\n\
         <div class=\"card\"><p class=\"error\">{}</p></div>\n{}",
        html_escape(&error.to_string()),
        lookup_form("")
    );
    page("Error - YTGraphX", &body)
}
