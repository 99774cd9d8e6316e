//! End-to-end tests driving the client and pipeline against a local mock
//! of the statistics API.

use axum::{extract::Query, routing::get, Json, Router};
use serde_json::{json, Value};
use std::collections::HashMap;
use ytgraph_app::analyze_channel;
use ytgraph_common::{Metric, YouTubeClient, YouTubeConfig};
use ytgraph_stats::TrendSynthesizer;

fn channel_json() -> Value {
    json!({
        "id": "UCmock",
        "snippet": {
            "title": "Mock Channel",
            "description": "A channel served by the test API",
            "customUrl": "@mockchannel",
            "publishedAt": "2015-03-01T00:00:00Z"
        },
        "statistics": {
            "subscriberCount": "1000000",
            "viewCount": "50000000",
            "hiddenSubscriberCount": false,
            "videoCount": "300"
        }
    })
}

async fn channels(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    let part = params.get("part").cloned().unwrap_or_default();
    if part.contains("contentDetails") {
        if params.get("id").map(String::as_str) == Some("UCmock") {
            return Json(json!({
                "items": [{
                    "id": "UCmock",
                    "contentDetails": {"relatedPlaylists": {"uploads": "UUmock"}}
                }]
            }));
        }
        return Json(json!({"pageInfo": {"totalResults": 0, "resultsPerPage": 5}}));
    }

    // Only the channel ID and the handle resolve; username lookups miss.
    let hit = params.get("id").map(String::as_str) == Some("UCmock")
        || params.get("forHandle").map(String::as_str) == Some("mockchannel");
    if hit {
        Json(json!({"items": [channel_json()]}))
    } else {
        Json(json!({"pageInfo": {"totalResults": 0, "resultsPerPage": 5}}))
    }
}

async fn playlist_items(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    assert_eq!(
        params.get("playlistId").map(String::as_str),
        Some("UUmock")
    );
    Json(json!({
        "items": [
            {"contentDetails": {"videoId": "vid1"}},
            {"contentDetails": {"videoId": "vid2"}}
        ]
    }))
}

async fn videos(Query(_params): Query<HashMap<String, String>>) -> Json<Value> {
    // Deliberately reversed relative to the playlist order
    Json(json!({
        "items": [
            {
                "id": "vid2",
                "snippet": {"title": "Second Video", "publishedAt": "2024-05-01T00:00:00Z"},
                "statistics": {"viewCount": "200", "likeCount": "20", "commentCount": "2"}
            },
            {
                "id": "vid1",
                "snippet": {"title": "First Video", "publishedAt": "2024-05-15T00:00:00Z"},
                "statistics": {"viewCount": "100", "likeCount": "10"}
            }
        ]
    }))
}

async fn spawn_mock_api() -> String {
    let router = Router::new()
        .route("/channels", get(channels))
        .route("/playlistItems", get(playlist_items))
        .route("/videos", get(videos));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind mock API");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

async fn mock_client() -> YouTubeClient {
    let base_url = spawn_mock_api().await;
    YouTubeClient::new(YouTubeConfig::new("test-key").with_base_url(base_url)).unwrap()
}

#[tokio::test]
async fn resolves_channel_by_id_in_one_lookup() {
    let client = mock_client().await;

    let snapshot = client.fetch_channel("UCmock").await.unwrap();
    assert_eq!(snapshot.title, "Mock Channel");
    assert_eq!(snapshot.subscriber_count, 1_000_000);
    assert_eq!(snapshot.view_count, 50_000_000);
    assert_eq!(snapshot.video_count, 300);
    assert_eq!(client.quota_used(), 1);
}

#[tokio::test]
async fn falls_back_to_handle_lookup() {
    let client = mock_client().await;

    let snapshot = client.fetch_channel("@mockchannel").await.unwrap();
    assert_eq!(snapshot.id, "UCmock");
    // First strategy (channel ID) missed, second (handle) hit
    assert_eq!(client.quota_used(), 2);
}

#[tokio::test]
async fn unresolvable_identifier_fails_with_not_found() {
    let client = mock_client().await;

    let error = client.fetch_channel("@nosuchchannel").await.unwrap_err();
    assert!(error.is_not_found());
    assert!(error.to_string().contains("@nosuchchannel"));
    // All three strategies were attempted
    assert_eq!(client.quota_used(), 3);
}

#[tokio::test]
async fn videos_keep_playlist_order() {
    let client = mock_client().await;

    let videos = client.fetch_recent_videos("UCmock", 5).await.unwrap();
    assert_eq!(videos.len(), 2);
    assert_eq!(videos[0].id, "vid1");
    assert_eq!(videos[1].id, "vid2");
    // Hidden comment counter reads 0
    assert_eq!(videos[0].comment_count, 0);
}

#[tokio::test]
async fn full_pipeline_produces_anchored_report() {
    let client = mock_client().await;
    let synthesizer = TrendSynthesizer::default();

    let report = analyze_channel(&client, &synthesizer, "UCmock", 12, 2)
        .await
        .unwrap();

    assert_eq!(report.snapshot.id, "UCmock");
    assert_eq!(report.videos.len(), 2);
    for metric in Metric::ALL {
        let series = &report.series[&metric];
        assert_eq!(series.len(), 12);
        assert!(series.is_non_decreasing());
        assert!(series.is_anchored_to(&report.snapshot));
    }
    // channel + contentDetails + playlistItems + videos
    assert_eq!(client.quota_used(), 4);
}
