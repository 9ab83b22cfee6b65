//! Integration tests for `VideoApiClient` using wiremock HTTP mocks.

use vidatlas_youtube::{VideoApiClient, VideoApiError};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> VideoApiClient {
    VideoApiClient::with_base_url("test-key", 30, 0, 0, base_url)
        .expect("client construction should not fail")
}

fn retrying_client(base_url: &str) -> VideoApiClient {
    VideoApiClient::with_base_url("test-key", 30, 3, 0, base_url)
        .expect("client construction should not fail")
}

fn search_body() -> serde_json::Value {
    serde_json::json!({
        "items": [
            {
                "id": { "videoId": "vid-1" },
                "snippet": {
                    "title": "Nazaré big wave session",
                    "channelTitle": "Surf Channel",
                    "publishedAt": "2024-03-01T12:00:00Z",
                    "thumbnails": {
                        "default": { "url": "https://img.example/vid-1-default.jpg" },
                        "high": { "url": "https://img.example/vid-1-high.jpg" }
                    },
                    "locationDescription": "Nazaré, Portugal"
                }
            },
            {
                "id": { "videoId": "vid-2" },
                "snippet": {
                    "title": "Ericeira morning",
                    "channelTitle": "Surf Channel",
                    "publishedAt": "2024-02-15T08:30:00Z",
                    "thumbnails": {}
                }
            }
        ]
    })
}

#[tokio::test]
async fn search_channel_returns_parsed_items() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("key", "test-key"))
        .and(query_param("channelId", "UCsurf"))
        .and(query_param("part", "snippet"))
        .and(query_param("order", "date"))
        .and(query_param("maxResults", "50"))
        .and(query_param("type", "video"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_body()))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let items = client
        .search_channel("UCsurf", 50)
        .await
        .expect("should parse search response");

    assert_eq!(items.len(), 2);
    assert_eq!(items[0].id.video_id.as_deref(), Some("vid-1"));
    assert_eq!(items[0].snippet.title, "Nazaré big wave session");
    assert_eq!(
        items[0].snippet.location_description.as_deref(),
        Some("Nazaré, Portugal")
    );
    assert_eq!(items[1].id.video_id.as_deref(), Some("vid-2"));
    assert!(items[1].snippet.tags.is_empty());
}

#[tokio::test]
async fn search_channel_with_no_items_is_empty() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let items = client.search_channel("UCempty", 50).await.unwrap();
    assert!(items.is_empty());
}

#[tokio::test]
async fn list_videos_batches_ids_into_one_request() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "items": [
            {
                "id": "vid-1",
                "snippet": { "tags": ["surf", "bigwave"] },
                "recordingDetails": {
                    "location": { "latitude": 39.6, "longitude": -9.07 },
                    "recordingDate": "2024-02-28T00:00:00Z"
                }
            },
            {
                "id": "vid-2"
            }
        ]
    });

    Mock::given(method("GET"))
        .and(path("/videos"))
        .and(query_param("key", "test-key"))
        .and(query_param("id", "vid-1,vid-2"))
        .and(query_param("part", "snippet,recordingDetails,localizations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let details = client
        .list_videos(&["vid-1".to_owned(), "vid-2".to_owned()])
        .await
        .expect("should parse detail response");

    assert_eq!(details.len(), 2);
    assert_eq!(details[0].id, "vid-1");
    let recording = details[0].recording_details.as_ref().unwrap();
    assert_eq!(recording.location.as_ref().unwrap().latitude, Some(39.6));
    assert!(details[1].recording_details.is_none());
}

#[tokio::test]
async fn list_videos_with_no_ids_skips_the_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/videos"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let details = client.list_videos(&[]).await.unwrap();
    assert!(details.is_empty());
}

#[tokio::test]
async fn non_success_status_is_a_typed_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(403))
        .expect(1)
        .mount(&server)
        .await;

    // Retrying client: a 403 must still fail on the first attempt.
    let client = retrying_client(&server.uri());
    let result = client.search_channel("UCsurf", 50).await;

    assert!(matches!(
        result,
        Err(VideoApiError::UnexpectedStatus { status: 403, .. })
    ));
}

#[tokio::test]
async fn server_error_is_retried_until_success() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_body()))
        .expect(1)
        .mount(&server)
        .await;

    let client = retrying_client(&server.uri());
    let items = client
        .search_channel("UCsurf", 50)
        .await
        .expect("should succeed after retries");

    assert_eq!(items.len(), 2);
}

#[tokio::test]
async fn malformed_body_is_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/videos"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .expect(1)
        .mount(&server)
        .await;

    let client = retrying_client(&server.uri());
    let result = client.list_videos(&["vid-1".to_owned()]).await;

    assert!(matches!(result, Err(VideoApiError::Deserialize { .. })));
}
