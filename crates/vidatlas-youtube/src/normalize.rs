//! Normalization of raw API rows into [`MediaItem`]s.
//!
//! A search row carries the display fields; the matching detail record (when
//! the batched lookup succeeded) contributes tags, the recording date, and
//! the structured location. A missing detail record degrades to the search
//! fields alone.

use vidatlas_core::{GeoInfo, MediaItem};

use crate::types::{SearchItem, SearchSnippet, Thumbnails, VideoDetail};

/// Merges one search row with its optional detail record.
///
/// Returns `None` when the search row has no video id (non-video rows that
/// slipped past the `type=video` filter).
///
/// Location resolution priority, first match wins:
/// 1. the structured location block from the detail record (kept even when
///    names are missing — the enrichment stage backfills those);
/// 2. the free-text description parsed by [`parse_location_description`];
/// 3. nothing — the `location` field is omitted.
#[must_use]
pub fn merge_item(search: &SearchItem, detail: Option<&VideoDetail>) -> Option<MediaItem> {
    let id = search.id.video_id.clone()?;
    let snippet = &search.snippet;

    let tags = detail
        .and_then(|d| d.snippet.as_ref())
        .map(|s| s.tags.clone())
        .filter(|tags| !tags.is_empty())
        .unwrap_or_else(|| snippet.tags.clone());

    let recording_date = detail
        .and_then(|d| d.recording_details.as_ref())
        .and_then(|r| r.recording_date);

    Some(MediaItem {
        title: snippet.title.clone(),
        source_name: snippet.channel_title.clone(),
        published_at: snippet.published_at,
        recording_date,
        thumbnail_url: best_thumbnail(&snippet.thumbnails),
        permalink_url: format!("https://www.youtube.com/watch?v={id}"),
        tags,
        location: resolve_location(snippet, detail),
        id,
    })
}

fn best_thumbnail(thumbnails: &Thumbnails) -> String {
    [&thumbnails.high, &thumbnails.medium, &thumbnails.default]
        .into_iter()
        .find_map(|t| t.as_ref().map(|t| t.url.clone()))
        .unwrap_or_default()
}

fn resolve_location(snippet: &SearchSnippet, detail: Option<&VideoDetail>) -> Option<GeoInfo> {
    let structured = detail
        .and_then(|d| d.recording_details.as_ref())
        .and_then(|r| r.location.as_ref())
        .map(|loc| GeoInfo {
            city: loc.city.clone(),
            country: loc.country.clone(),
            latitude: loc.latitude,
            longitude: loc.longitude,
        })
        .filter(|geo| !geo.is_empty());
    if structured.is_some() {
        return structured;
    }

    snippet
        .location_description
        .as_deref()
        .and_then(parse_location_description)
}

/// Parses a comma-separated, human-written place description.
///
/// The segment after the last comma is taken as the country, the first
/// segment as the city; middle segments (regions, states) are dropped. A
/// description without a comma yields nothing — there is no way to tell a
/// bare city from a bare country. Coordinates are never produced here.
#[must_use]
pub fn parse_location_description(text: &str) -> Option<GeoInfo> {
    let parts: Vec<&str> = text
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect();
    if parts.len() < 2 {
        return None;
    }
    Some(GeoInfo {
        city: Some(parts[0].to_owned()),
        country: Some(parts[parts.len() - 1].to_owned()),
        latitude: None,
        longitude: None,
    })
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use crate::types::{
        DetailSnippet, RecordingDetails, RecordingLocation, SearchItemId, Thumbnail,
    };

    use super::*;

    fn search_item(id: &str) -> SearchItem {
        SearchItem {
            id: SearchItemId {
                video_id: Some(id.to_owned()),
            },
            snippet: SearchSnippet {
                title: format!("video {id}"),
                channel_title: "Surf Channel".to_owned(),
                published_at: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
                thumbnails: Thumbnails::default(),
                tags: Vec::new(),
                location_description: None,
            },
        }
    }

    fn detail_with_tags(id: &str, tags: &[&str]) -> VideoDetail {
        VideoDetail {
            id: id.to_owned(),
            snippet: Some(DetailSnippet {
                tags: tags.iter().map(|&t| t.to_owned()).collect(),
            }),
            recording_details: None,
        }
    }

    #[test]
    fn merge_without_detail_keeps_base_fields() {
        let item = merge_item(&search_item("a"), None).unwrap();
        assert_eq!(item.id, "a");
        assert_eq!(item.title, "video a");
        assert_eq!(item.source_name, "Surf Channel");
        assert!(item.tags.is_empty());
        assert!(item.recording_date.is_none());
        assert!(item.location.is_none());
        assert_eq!(item.permalink_url, "https://www.youtube.com/watch?v=a");
    }

    #[test]
    fn merge_with_detail_takes_detail_tags() {
        let detail = detail_with_tags("b", &["x"]);
        let item = merge_item(&search_item("b"), Some(&detail)).unwrap();
        assert_eq!(item.tags, vec!["x".to_owned()]);
    }

    #[test]
    fn merge_without_video_id_is_skipped() {
        let mut search = search_item("a");
        search.id.video_id = None;
        assert!(merge_item(&search, None).is_none());
    }

    #[test]
    fn merge_takes_recording_date_from_detail() {
        let recorded = Utc.with_ymd_and_hms(2024, 2, 20, 8, 0, 0).unwrap();
        let detail = VideoDetail {
            id: "a".to_owned(),
            snippet: None,
            recording_details: Some(RecordingDetails {
                location: None,
                recording_date: Some(recorded),
            }),
        };
        let item = merge_item(&search_item("a"), Some(&detail)).unwrap();
        assert_eq!(item.recording_date, Some(recorded));
    }

    #[test]
    fn structured_location_wins_over_description() {
        let mut search = search_item("a");
        search.snippet.location_description = Some("Lisbon, Portugal".to_owned());
        let detail = VideoDetail {
            id: "a".to_owned(),
            snippet: None,
            recording_details: Some(RecordingDetails {
                location: Some(RecordingLocation {
                    latitude: Some(39.6),
                    longitude: Some(-9.07),
                    city: None,
                    country: None,
                }),
                recording_date: None,
            }),
        };
        let item = merge_item(&search, Some(&detail)).unwrap();
        let geo = item.location.unwrap();
        assert_eq!(geo.latitude, Some(39.6));
        // Names stay absent — backfilling them is the enrichment stage's job.
        assert!(geo.city.is_none());
        assert!(geo.needs_enrichment());
    }

    #[test]
    fn empty_structured_location_falls_back_to_description() {
        let mut search = search_item("a");
        search.snippet.location_description = Some("Lisbon, Portugal".to_owned());
        let detail = VideoDetail {
            id: "a".to_owned(),
            snippet: None,
            recording_details: Some(RecordingDetails {
                location: Some(RecordingLocation {
                    latitude: None,
                    longitude: None,
                    city: None,
                    country: None,
                }),
                recording_date: None,
            }),
        };
        let item = merge_item(&search, Some(&detail)).unwrap();
        let geo = item.location.unwrap();
        assert_eq!(geo.city.as_deref(), Some("Lisbon"));
        assert_eq!(geo.country.as_deref(), Some("Portugal"));
    }

    #[test]
    fn best_thumbnail_prefers_high_resolution() {
        let thumbnails = Thumbnails {
            default: Some(Thumbnail {
                url: "default.jpg".to_owned(),
            }),
            medium: Some(Thumbnail {
                url: "medium.jpg".to_owned(),
            }),
            high: Some(Thumbnail {
                url: "high.jpg".to_owned(),
            }),
        };
        assert_eq!(best_thumbnail(&thumbnails), "high.jpg");
    }

    #[test]
    fn best_thumbnail_falls_back_down_the_ladder() {
        let thumbnails = Thumbnails {
            default: Some(Thumbnail {
                url: "default.jpg".to_owned(),
            }),
            medium: None,
            high: None,
        };
        assert_eq!(best_thumbnail(&thumbnails), "default.jpg");
    }

    #[test]
    fn two_part_description_parses_city_and_country() {
        let geo = parse_location_description("Lisbon, Portugal").unwrap();
        assert_eq!(geo.city.as_deref(), Some("Lisbon"));
        assert_eq!(geo.country.as_deref(), Some("Portugal"));
        assert!(geo.latitude.is_none());
    }

    #[test]
    fn description_without_comma_yields_nothing() {
        assert!(parse_location_description("Unknown").is_none());
    }

    #[test]
    fn three_part_description_drops_the_region() {
        let geo = parse_location_description("Austin, Texas, USA").unwrap();
        assert_eq!(geo.city.as_deref(), Some("Austin"));
        assert_eq!(geo.country.as_deref(), Some("USA"));
    }

    #[test]
    fn blank_segments_are_ignored() {
        assert!(parse_location_description("Lisbon, ").is_none());
        assert!(parse_location_description(" , ").is_none());
    }
}
