//! Shared domain types for the aggregation pipeline.
//!
//! [`MediaItem`] is the unit every stage of the pipeline passes around:
//! produced by the source fetcher, improved by the enrichment stage, and
//! persisted wholesale inside a [`CachedBatch`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One entry retrieved from a video source.
///
/// `id` is source-assigned and stable across refetches; `published_at` is
/// always present while `recording_date` is only set when the source
/// captured it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaItem {
    pub id: String,
    pub title: String,
    pub source_name: String,
    pub published_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recording_date: Option<DateTime<Utc>>,
    pub thumbnail_url: String,
    pub permalink_url: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoInfo>,
}

/// Geographic annotation of a [`MediaItem`].
///
/// Field absence is meaningful: a missing `city` stays `None` and is never
/// coerced to an empty string. An annotation with neither coordinates nor
/// names is never attached to an item — the `location` field is omitted
/// instead.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeoInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

impl GeoInfo {
    /// `true` when the annotation carries no information at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.city.is_none()
            && self.country.is_none()
            && self.latitude.is_none()
            && self.longitude.is_none()
    }

    /// `true` when both coordinates are present but at least one display
    /// name is missing — the item is a candidate for reverse geocoding.
    #[must_use]
    pub fn needs_enrichment(&self) -> bool {
        self.latitude.is_some()
            && self.longitude.is_some()
            && (self.city.is_none() || self.country.is_none())
    }
}

/// The persisted unit: one full aggregated batch plus its capture instant.
///
/// Created whole after a successful fetch-and-merge, overwritten whole on
/// every fresh fetch or enrichment pass, never partially updated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedBatch {
    pub items: Vec<MediaItem>,
    /// Epoch milliseconds at fetch/merge time. Staleness is computed from
    /// the wall clock at read time, never stored.
    pub timestamp: i64,
}
