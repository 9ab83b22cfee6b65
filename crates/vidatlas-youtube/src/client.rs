//! HTTP client for the video-hosting REST API.
//!
//! Wraps `reqwest` with API key management, typed response deserialization,
//! and bounded retry with back-off on the two endpoints the pipeline calls.

use std::time::Duration;

use reqwest::{Client, Url};

use crate::error::VideoApiError;
use crate::retry::retry_with_backoff;
use crate::types::{SearchItem, SearchResponse, VideoDetail, VideoListResponse};

const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/youtube/v3/";

/// Client for the video-hosting REST API.
///
/// Manages the HTTP client, API key, base URL, and retry policy. Use
/// [`VideoApiClient::new`] for production or
/// [`VideoApiClient::with_base_url`] to point at a mock server in tests.
pub struct VideoApiClient {
    client: Client,
    api_key: String,
    base_url: Url,
    /// Maximum number of retry attempts after the first failure.
    max_retries: u32,
    /// Base delay in milliseconds for exponential back-off.
    backoff_base_ms: u64,
}

impl VideoApiClient {
    /// Creates a client pointed at the production API.
    ///
    /// # Errors
    ///
    /// Returns [`VideoApiError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        api_key: &str,
        timeout_secs: u64,
        max_retries: u32,
        backoff_base_ms: u64,
    ) -> Result<Self, VideoApiError> {
        Self::with_base_url(
            api_key,
            timeout_secs,
            max_retries,
            backoff_base_ms,
            DEFAULT_BASE_URL,
        )
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`VideoApiError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`VideoApiError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        max_retries: u32,
        backoff_base_ms: u64,
        base_url: &str,
    ) -> Result<Self, VideoApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("vidatlas/0.1 (media-aggregation)")
            .build()?;

        // Normalise: the base URL must end with a slash so that join()
        // appends the endpoint instead of replacing the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| VideoApiError::InvalidBaseUrl {
            base_url: normalised.clone(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
            max_retries,
            backoff_base_ms,
        })
    }

    /// Fetches the most recent videos of a channel.
    ///
    /// Calls the `search` endpoint bounded to `max_results`, ordered by
    /// recency, filtered to video-type results. Returns rows in the order
    /// the API assigned them.
    ///
    /// # Errors
    ///
    /// - [`VideoApiError::UnexpectedStatus`] on a non-2xx response (after
    ///   retries for 5xx/429).
    /// - [`VideoApiError::Http`] on network failure (after retries).
    /// - [`VideoApiError::Deserialize`] if the response does not match the
    ///   expected shape.
    pub async fn search_channel(
        &self,
        channel_id: &str,
        max_results: u32,
    ) -> Result<Vec<SearchItem>, VideoApiError> {
        let url = self.build_url(
            "search",
            &[
                ("channelId", channel_id),
                ("part", "snippet"),
                ("order", "date"),
                ("maxResults", &max_results.to_string()),
                ("type", "video"),
            ],
        )?;

        let body = retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            self.request_json(&url)
        })
        .await?;

        let response: SearchResponse =
            serde_json::from_value(body).map_err(|e| VideoApiError::Deserialize {
                context: format!("search(channelId={channel_id})"),
                source: e,
            })?;

        Ok(response.items)
    }

    /// Fetches detail records for a batch of video ids in one call.
    ///
    /// Calls the `videos` endpoint with the comma-joined id list and the
    /// parts carrying tags, recording details, and localizations. An empty
    /// `ids` slice short-circuits to an empty result without a request.
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`Self::search_channel`].
    pub async fn list_videos(&self, ids: &[String]) -> Result<Vec<VideoDetail>, VideoApiError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let joined = ids.join(",");
        let url = self.build_url(
            "videos",
            &[
                ("id", joined.as_str()),
                ("part", "snippet,recordingDetails,localizations"),
            ],
        )?;

        let body = retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            self.request_json(&url)
        })
        .await?;

        let response: VideoListResponse =
            serde_json::from_value(body).map_err(|e| VideoApiError::Deserialize {
                context: format!("videos(id={joined})"),
                source: e,
            })?;

        Ok(response.items)
    }

    /// Builds the full request URL with properly percent-encoded query
    /// parameters, always including the API key.
    fn build_url(&self, endpoint: &str, extra: &[(&str, &str)]) -> Result<Url, VideoApiError> {
        let mut url = self
            .base_url
            .join(endpoint)
            .map_err(|e| VideoApiError::InvalidBaseUrl {
                base_url: self.base_url.to_string(),
                reason: e.to_string(),
            })?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("key", &self.api_key);
            for (k, v) in extra {
                pairs.append_pair(k, v);
            }
        }
        Ok(url)
    }

    /// Sends a GET request, asserts a 2xx status, and parses the body as JSON.
    async fn request_json(&self, url: &Url) -> Result<serde_json::Value, VideoApiError> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(VideoApiError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| VideoApiError::Deserialize {
            context: url.to_string(),
            source: e,
        })
    }
}
