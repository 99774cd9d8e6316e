//! YouTube Data API v3 client
//!
//! This module provides the HTTP client for the channel statistics endpoints,
//! including identifier resolution, typed response models and quota
//! accounting. There is no retry or backoff: transient failures propagate to
//! the caller as errors to display.

use crate::{ChannelSnapshot, Result, VideoSummary, YtGraphError};
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Configuration for the YouTube API client
#[derive(Debug, Clone)]
pub struct YouTubeConfig {
    /// Base URL of the Data API (e.g., "https://www.googleapis.com/youtube/v3")
    pub base_url: String,
    /// API key for authentication
    pub api_key: String,
    /// Request timeout in seconds (default: 30)
    pub timeout_secs: u64,
    /// Connection pool max idle connections per host (default: 10)
    pub max_idle_per_host: usize,
}

impl Default for YouTubeConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.googleapis.com/youtube/v3".to_string(),
            api_key: String::new(),
            timeout_secs: 30,
            max_idle_per_host: 10,
        }
    }
}

impl YouTubeConfig {
    /// Create a new configuration with the minimum required parameters
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Default::default()
        }
    }

    /// Set the base URL (useful for pointing tests at a local server)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Set the connection pool size
    pub fn with_pool_size(mut self, max_idle_per_host: usize) -> Self {
        self.max_idle_per_host = max_idle_per_host;
        self
    }
}

/// The identifier lookup strategies, tried in order until one resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ResolveStrategy {
    /// Treat the identifier as a channel ID (`channels.list?id=`)
    ChannelId,
    /// Treat the identifier as a handle (`channels.list?forHandle=`)
    Handle,
    /// Treat the identifier as a legacy username (`channels.list?forUsername=`)
    Username,
}

impl ResolveStrategy {
    /// The `channels.list` query parameter this strategy fills
    fn param_name(&self) -> &'static str {
        match self {
            ResolveStrategy::ChannelId => "id",
            ResolveStrategy::Handle => "forHandle",
            ResolveStrategy::Username => "forUsername",
        }
    }
}

/// Lookup order: channel ID first, then handle, then username.
const RESOLUTION_ORDER: [ResolveStrategy; 3] = [
    ResolveStrategy::ChannelId,
    ResolveStrategy::Handle,
    ResolveStrategy::Username,
];

/// YouTube Data API client with connection pooling and quota accounting
#[derive(Debug, Clone)]
pub struct YouTubeClient {
    client: Client,
    config: YouTubeConfig,
    quota_used: Arc<AtomicU64>,
}

impl YouTubeClient {
    /// Create a new client with the given configuration
    pub fn new(config: YouTubeConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(YtGraphError::config("YouTube API key is required"));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(config.max_idle_per_host)
            .build()
            .map_err(|e| YtGraphError::network_with_source("Failed to create HTTP client", e))?;

        Ok(Self {
            client,
            config,
            quota_used: Arc::new(AtomicU64::new(0)),
        })
    }

    /// Create a new client with default configuration
    pub fn with_defaults(api_key: impl Into<String>) -> Result<Self> {
        Self::new(YouTubeConfig::new(api_key))
    }

    /// Quota units consumed by this client so far.
    ///
    /// Each `channels.list`, `playlistItems.list` and `videos.list` call costs
    /// one unit; a channel lookup costs one unit per attempted strategy and a
    /// video-list page costs one unit per API call it makes.
    pub fn quota_used(&self) -> u64 {
        self.quota_used.load(Ordering::Relaxed)
    }

    /// Build a request URL for an API resource
    fn resource_url(&self, resource: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), resource)
    }

    /// Make an authenticated request to an API resource and parse the JSON response
    #[instrument(skip(self), fields(resource = %resource))]
    async fn request_json<T>(&self, resource: &str, params: &[(&str, &str)]) -> Result<T>
    where
        T: for<'de> Deserialize<'de>,
    {
        let url = self.resource_url(resource);
        debug!("Making request to: {}", url);

        let mut query_params = vec![("key", self.config.api_key.as_str())];
        query_params.extend_from_slice(params);

        self.quota_used.fetch_add(1, Ordering::Relaxed);

        let response = self
            .client
            .get(&url)
            .query(&query_params)
            .send()
            .await
            .map_err(YtGraphError::from)?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| YtGraphError::network_with_source("Failed to read response body", e))?;

        if !status.is_success() {
            warn!("API returned error status {}", status);
            return Err(classify_api_error(status, &text));
        }

        debug!("Request successful: {}", status);
        serde_json::from_str(&text).map_err(YtGraphError::from)
    }

    /// Run one lookup strategy; `Ok(None)` means no channel matched.
    async fn resolve(
        &self,
        strategy: ResolveStrategy,
        query: &str,
    ) -> Result<Option<ChannelResource>> {
        let response: ListResponse<ChannelResource> = self
            .request_json(
                "channels",
                &[
                    ("part", "snippet,statistics"),
                    (strategy.param_name(), query),
                ],
            )
            .await?;

        Ok(response.items.into_iter().flatten().next())
    }

    /// Fetch the current snapshot for a channel.
    ///
    /// `identifier` may be a channel ID, a legacy username, or a handle
    /// (with or without the `@` prefix). The lookup strategies are tried in
    /// order — channel ID, handle, username — and the first non-empty result
    /// wins. Costs one quota unit per attempted strategy.
    #[instrument(skip(self), fields(identifier = %identifier))]
    pub async fn fetch_channel(&self, identifier: &str) -> Result<ChannelSnapshot> {
        let query = normalize_identifier(identifier);
        if query.is_empty() {
            return Err(YtGraphError::validation_field(
                "Channel identifier cannot be empty",
                "identifier",
            ));
        }

        for strategy in RESOLUTION_ORDER {
            debug!("Trying lookup strategy {:?}", strategy);
            if let Some(resource) = self.resolve(strategy, &query).await? {
                info!("Resolved channel '{}' via {:?}", identifier, strategy);
                return Ok(resource.into_snapshot(Utc::now()));
            }
        }

        Err(YtGraphError::not_found(identifier))
    }

    /// Fetch the most recent uploads of a channel, newest first.
    ///
    /// Follows the uploads playlist: channel contentDetails → playlist items
    /// → video details. Bounded by `limit` (at most one playlist page of 50).
    /// Costs one quota unit per underlying API call.
    #[instrument(skip(self), fields(channel_id = %channel_id, limit = limit))]
    pub async fn fetch_recent_videos(
        &self,
        channel_id: &str,
        limit: usize,
    ) -> Result<Vec<VideoSummary>> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let response: ListResponse<ChannelContentResource> = self
            .request_json("channels", &[("part", "contentDetails"), ("id", channel_id)])
            .await?;

        let uploads_playlist = response
            .items
            .into_iter()
            .flatten()
            .next()
            .and_then(|c| c.content_details)
            .map(|d| d.related_playlists.uploads)
            .ok_or_else(|| YtGraphError::not_found(channel_id))?;

        let max_results = limit.min(50).to_string();
        let playlist: ListResponse<PlaylistItemResource> = self
            .request_json(
                "playlistItems",
                &[
                    ("part", "contentDetails"),
                    ("playlistId", uploads_playlist.as_str()),
                    ("maxResults", max_results.as_str()),
                ],
            )
            .await?;

        let video_ids: Vec<String> = playlist
            .items
            .into_iter()
            .flatten()
            .map(|item| item.content_details.video_id)
            .collect();

        if video_ids.is_empty() {
            return Ok(Vec::new());
        }

        let joined = video_ids.join(",");
        let details: ListResponse<VideoResource> = self
            .request_json(
                "videos",
                &[("part", "snippet,statistics"), ("id", joined.as_str())],
            )
            .await?;

        let mut by_id: std::collections::HashMap<String, VideoSummary> = details
            .items
            .into_iter()
            .flatten()
            .map(|v| (v.id.clone(), v.into_summary()))
            .collect();

        // Preserve the playlist order (newest first); the videos endpoint
        // does not guarantee it.
        Ok(video_ids
            .iter()
            .filter_map(|id| by_id.remove(id))
            .collect())
    }
}

/// Strip whitespace and the optional `@` handle prefix
fn normalize_identifier(identifier: &str) -> String {
    identifier.trim().trim_start_matches('@').to_string()
}

/// Map a non-success API response to the error taxonomy.
///
/// Quota exhaustion (403 with a quota reason) is surfaced as its own variant;
/// everything else becomes a YouTube API error with the status attached.
fn classify_api_error(status: StatusCode, body: &str) -> YtGraphError {
    let envelope: Option<ApiErrorEnvelope> = serde_json::from_str(body).ok();
    let (message, reasons) = match envelope {
        Some(env) => (
            env.error.message,
            env.error
                .errors
                .into_iter()
                .flatten()
                .filter_map(|e| e.reason)
                .collect::<Vec<_>>(),
        ),
        None => (format!("API returned status {}", status), Vec::new()),
    };

    let quota_reasons = ["quotaExceeded", "dailyLimitExceeded", "rateLimitExceeded"];
    if status == StatusCode::FORBIDDEN
        && reasons.iter().any(|r| quota_reasons.contains(&r.as_str()))
    {
        return YtGraphError::quota_exceeded(message);
    }

    YtGraphError::youtube_with_status(message, status.as_u16())
}

/// Parse a string-encoded counter; absent or malformed counters read 0
fn parse_count(value: Option<&String>) -> u64 {
    value.and_then(|s| s.parse().ok()).unwrap_or(0)
}

// ============================================================================
// API Response Models
// ============================================================================

/// Generic list response wrapper shared by the endpoints used here
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse<T> {
    /// Matched resources; absent when nothing matched
    pub items: Option<Vec<T>>,
    /// Paging metadata
    pub page_info: Option<PageInfo>,
}

/// Paging metadata returned by list endpoints
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub total_results: Option<i64>,
    pub results_per_page: Option<i64>,
}

/// A channel resource with snippet and statistics parts
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelResource {
    pub id: String,
    pub snippet: ChannelSnippet,
    pub statistics: ChannelStatistics,
}

impl ChannelResource {
    /// Convert the raw resource into the application snapshot type
    pub fn into_snapshot(self, fetched_at: DateTime<Utc>) -> ChannelSnapshot {
        ChannelSnapshot {
            id: self.id,
            title: self.snippet.title,
            description: self.snippet.description.unwrap_or_default(),
            custom_url: self.snippet.custom_url,
            published_at: self.snippet.published_at,
            subscriber_count: parse_count(self.statistics.subscriber_count.as_ref()),
            view_count: parse_count(self.statistics.view_count.as_ref()),
            video_count: parse_count(self.statistics.video_count.as_ref()),
            fetched_at,
        }
    }
}

/// Channel snippet part
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelSnippet {
    pub title: String,
    pub description: Option<String>,
    pub custom_url: Option<String>,
    pub published_at: DateTime<Utc>,
}

/// Channel statistics part; the API encodes counters as strings
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelStatistics {
    pub subscriber_count: Option<String>,
    pub view_count: Option<String>,
    pub video_count: Option<String>,
    pub hidden_subscriber_count: Option<bool>,
}

/// A channel resource carrying only the contentDetails part
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelContentResource {
    pub id: String,
    pub content_details: Option<ChannelContentDetails>,
}

/// Channel contentDetails part
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelContentDetails {
    pub related_playlists: RelatedPlaylists,
}

/// Playlists related to a channel; `uploads` holds every public upload
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelatedPlaylists {
    pub uploads: String,
}

/// A playlist item pointing at an uploaded video
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItemResource {
    pub content_details: PlaylistItemContentDetails,
}

/// Playlist item contentDetails part
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItemContentDetails {
    pub video_id: String,
}

/// A video resource with snippet and statistics parts
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoResource {
    pub id: String,
    pub snippet: VideoSnippet,
    pub statistics: VideoStatistics,
}

impl VideoResource {
    /// Convert the raw resource into the application summary type
    pub fn into_summary(self) -> VideoSummary {
        VideoSummary {
            id: self.id,
            title: self.snippet.title,
            published_at: self.snippet.published_at,
            view_count: parse_count(self.statistics.view_count.as_ref()),
            like_count: parse_count(self.statistics.like_count.as_ref()),
            comment_count: parse_count(self.statistics.comment_count.as_ref()),
        }
    }
}

/// Video snippet part
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoSnippet {
    pub title: String,
    pub published_at: DateTime<Utc>,
}

/// Video statistics part; counters are strings, likes/comments may be hidden
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoStatistics {
    pub view_count: Option<String>,
    pub like_count: Option<String>,
    pub comment_count: Option<String>,
}

/// Error envelope returned by the API on failure
#[derive(Debug, Clone, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Clone, Deserialize)]
struct ApiErrorBody {
    #[allow(dead_code)]
    code: Option<i32>,
    message: String,
    errors: Option<Vec<ApiErrorDetail>>,
}

#[derive(Debug, Clone, Deserialize)]
struct ApiErrorDetail {
    reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_creation() {
        let config = YouTubeConfig::new("test-key");
        assert_eq!(config.api_key, "test-key");
        assert_eq!(config.base_url, "https://www.googleapis.com/youtube/v3");
        assert_eq!(config.timeout_secs, 30); // default
    }

    #[test]
    fn test_config_builder() {
        let config = YouTubeConfig::new("test-key")
            .with_base_url("http://localhost:9000/v3")
            .with_timeout(60)
            .with_pool_size(20);

        assert_eq!(config.base_url, "http://localhost:9000/v3");
        assert_eq!(config.timeout_secs, 60);
        assert_eq!(config.max_idle_per_host, 20);
    }

    #[test]
    fn test_client_requires_api_key() {
        let result = YouTubeClient::new(YouTubeConfig::default());
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("API key is required"));
    }

    #[test]
    fn test_client_creation() {
        let client = YouTubeClient::with_defaults("test-key").unwrap();
        assert_eq!(client.quota_used(), 0);
    }

    #[test]
    fn test_resource_url_building() {
        let config = YouTubeConfig::new("k").with_base_url("http://example.com/v3/");
        let client = YouTubeClient::new(config).unwrap();
        assert_eq!(
            client.resource_url("channels"),
            "http://example.com/v3/channels"
        );
    }

    #[test]
    fn test_normalize_identifier() {
        assert_eq!(normalize_identifier("@somehandle"), "somehandle");
        assert_eq!(normalize_identifier("  UC123  "), "UC123");
        assert_eq!(normalize_identifier("plainname"), "plainname");
    }

    #[test]
    fn test_resolution_order() {
        assert_eq!(RESOLUTION_ORDER[0].param_name(), "id");
        assert_eq!(RESOLUTION_ORDER[1].param_name(), "forHandle");
        assert_eq!(RESOLUTION_ORDER[2].param_name(), "forUsername");
    }

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count(Some(&"1234".to_string())), 1234);
        assert_eq!(parse_count(Some(&"not-a-number".to_string())), 0);
        assert_eq!(parse_count(None), 0);
    }

    // ========================================================================
    // Response Model Tests
    // ========================================================================

    #[test]
    fn test_channel_response_deserialization() {
        let json = r#"{
            "pageInfo": {"totalResults": 1, "resultsPerPage": 5},
            "items": [
                {
                    "id": "UC_x5XG1OV2P6uZZ5FSM9Ttw",
                    "snippet": {
                        "title": "Google for Developers",
                        "description": "Developer news",
                        "customUrl": "@googledevelopers",
                        "publishedAt": "2007-08-23T00:34:43Z"
                    },
                    "statistics": {
                        "viewCount": "250000000",
                        "subscriberCount": "2400000",
                        "hiddenSubscriberCount": false,
                        "videoCount": "6100"
                    }
                }
            ]
        }"#;

        let response: ListResponse<ChannelResource> = serde_json::from_str(json).unwrap();
        let channel = response.items.unwrap().remove(0);
        assert_eq!(channel.id, "UC_x5XG1OV2P6uZZ5FSM9Ttw");
        assert_eq!(channel.snippet.title, "Google for Developers");

        let snapshot = channel.into_snapshot(Utc::now());
        assert_eq!(snapshot.subscriber_count, 2_400_000);
        assert_eq!(snapshot.view_count, 250_000_000);
        assert_eq!(snapshot.video_count, 6_100);
        assert_eq!(snapshot.custom_url.as_deref(), Some("@googledevelopers"));
    }

    #[test]
    fn test_empty_list_response() {
        let json = r#"{"pageInfo": {"totalResults": 0, "resultsPerPage": 5}}"#;
        let response: ListResponse<ChannelResource> = serde_json::from_str(json).unwrap();
        assert!(response.items.is_none());
    }

    #[test]
    fn test_snapshot_defaults_for_hidden_counters() {
        let json = r#"{
            "id": "UCabc",
            "snippet": {
                "title": "Hidden Counts",
                "publishedAt": "2020-01-01T00:00:00Z"
            },
            "statistics": {
                "hiddenSubscriberCount": true,
                "viewCount": "42"
            }
        }"#;

        let channel: ChannelResource = serde_json::from_str(json).unwrap();
        let snapshot = channel.into_snapshot(Utc::now());
        assert_eq!(snapshot.subscriber_count, 0);
        assert_eq!(snapshot.view_count, 42);
        assert_eq!(snapshot.video_count, 0);
        assert_eq!(snapshot.description, "");
    }

    #[test]
    fn test_video_response_deserialization() {
        let json = r#"{
            "items": [
                {
                    "id": "dQw4w9WgXcQ",
                    "snippet": {
                        "title": "Some Video",
                        "publishedAt": "2023-05-01T10:00:00Z"
                    },
                    "statistics": {
                        "viewCount": "1500",
                        "likeCount": "120",
                        "commentCount": "30"
                    }
                }
            ]
        }"#;

        let response: ListResponse<VideoResource> = serde_json::from_str(json).unwrap();
        let video = response.items.unwrap().remove(0).into_summary();
        assert_eq!(video.id, "dQw4w9WgXcQ");
        assert_eq!(video.view_count, 1_500);
        assert_eq!(video.like_count, 120);
        assert_eq!(video.comment_count, 30);
    }

    #[test]
    fn test_playlist_item_deserialization() {
        let json = r#"{
            "items": [
                {"contentDetails": {"videoId": "vid1"}},
                {"contentDetails": {"videoId": "vid2"}}
            ]
        }"#;

        let response: ListResponse<PlaylistItemResource> = serde_json::from_str(json).unwrap();
        let ids: Vec<String> = response
            .items
            .unwrap()
            .into_iter()
            .map(|i| i.content_details.video_id)
            .collect();
        assert_eq!(ids, vec!["vid1", "vid2"]);
    }

    #[test]
    fn test_uploads_playlist_deserialization() {
        let json = r#"{
            "items": [
                {
                    "id": "UCabc",
                    "contentDetails": {
                        "relatedPlaylists": {"uploads": "UUabc"}
                    }
                }
            ]
        }"#;

        let response: ListResponse<ChannelContentResource> = serde_json::from_str(json).unwrap();
        let uploads = response
            .items
            .unwrap()
            .remove(0)
            .content_details
            .unwrap()
            .related_playlists
            .uploads;
        assert_eq!(uploads, "UUabc");
    }

    // ========================================================================
    // Error Classification Tests
    // ========================================================================

    #[test]
    fn test_quota_error_classification() {
        let body = r#"{
            "error": {
                "code": 403,
                "message": "The request cannot be completed because you have exceeded your quota.",
                "errors": [{"reason": "quotaExceeded"}]
            }
        }"#;

        let error = classify_api_error(StatusCode::FORBIDDEN, body);
        assert!(error.is_quota_exceeded());
        assert!(error.to_string().contains("exceeded your quota"));
    }

    #[test]
    fn test_forbidden_without_quota_reason_is_api_error() {
        let body = r#"{
            "error": {
                "code": 403,
                "message": "API key not valid",
                "errors": [{"reason": "forbidden"}]
            }
        }"#;

        let error = classify_api_error(StatusCode::FORBIDDEN, body);
        assert!(!error.is_quota_exceeded());
        assert!(error.to_string().contains("API key not valid"));
    }

    #[test]
    fn test_bad_request_classification() {
        let body = r#"{
            "error": {
                "code": 400,
                "message": "Invalid parameter",
                "errors": [{"reason": "invalidParameter"}]
            }
        }"#;

        let error = classify_api_error(StatusCode::BAD_REQUEST, body);
        match error {
            YtGraphError::YouTube { status_code, .. } => assert_eq!(status_code, Some(400)),
            other => panic!("Expected YouTube error, got {:?}", other),
        }
    }

    #[test]
    fn test_unparseable_error_body() {
        let error = classify_api_error(StatusCode::INTERNAL_SERVER_ERROR, "<html>oops</html>");
        assert!(error.to_string().contains("500"));
    }

    #[tokio::test]
    async fn test_fetch_recent_videos_zero_limit_skips_requests() {
        let client = YouTubeClient::with_defaults("test-key").unwrap();
        let videos = client.fetch_recent_videos("UCabc", 0).await.unwrap();
        assert!(videos.is_empty());
        assert_eq!(client.quota_used(), 0);
    }

    #[tokio::test]
    async fn test_fetch_channel_rejects_empty_identifier() {
        let client = YouTubeClient::with_defaults("test-key").unwrap();
        let result = client.fetch_channel("   ").await;
        assert!(matches!(
            result.unwrap_err(),
            YtGraphError::Validation { .. }
        ));
        assert_eq!(client.quota_used(), 0);
    }
}
