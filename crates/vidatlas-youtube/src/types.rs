//! Video API response types.
//!
//! Models the JSON returned by the hosting service's `search` and `videos`
//! endpoints, reduced to the fields the pipeline reads. Unknown fields are
//! ignored by serde.

use chrono::{DateTime, Utc};
use serde::Deserialize;

// ---------------------------------------------------------------------------
// search endpoint
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub items: Vec<SearchItem>,
}

/// One row of a channel search, ordered by recency.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchItem {
    pub id: SearchItemId,
    pub snippet: SearchSnippet,
}

/// The search endpoint nests the video id one level down; with `type=video`
/// the `videoId` variant is the only one populated.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchItemId {
    #[serde(rename = "videoId", default)]
    pub video_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchSnippet {
    pub title: String,
    pub channel_title: String,
    pub published_at: DateTime<Utc>,
    #[serde(default)]
    pub thumbnails: Thumbnails,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Free-text, human-written place description. Parsed heuristically;
    /// only used when no structured location is available.
    #[serde(default)]
    pub location_description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Thumbnails {
    #[serde(default)]
    pub default: Option<Thumbnail>,
    #[serde(default)]
    pub medium: Option<Thumbnail>,
    #[serde(default)]
    pub high: Option<Thumbnail>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Thumbnail {
    pub url: String,
}

// ---------------------------------------------------------------------------
// videos (detail) endpoint
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct VideoListResponse {
    #[serde(default)]
    pub items: Vec<VideoDetail>,
}

/// Detail record for one video, keyed by id and matched back to its search
/// row during normalization.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoDetail {
    pub id: String,
    #[serde(default)]
    pub snippet: Option<DetailSnippet>,
    #[serde(default)]
    pub recording_details: Option<RecordingDetails>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DetailSnippet {
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordingDetails {
    #[serde(default)]
    pub location: Option<RecordingLocation>,
    #[serde(default)]
    pub recording_date: Option<DateTime<Utc>>,
}

/// Structured location block. Coordinates are usually present when the block
/// exists at all; the display names rarely are, which is what the geocoding
/// backfill is for.
#[derive(Debug, Clone, Deserialize)]
pub struct RecordingLocation {
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}
