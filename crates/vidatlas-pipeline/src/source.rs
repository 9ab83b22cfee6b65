//! Per-channel fetch-and-merge.
//!
//! One call per configured channel: a bounded recency-ordered search, one
//! batched detail lookup for the returned ids, and a merge back into
//! [`MediaItem`]s in search order. Failures are isolated at the smallest
//! scope — a dead detail endpoint degrades to base fields, a dead channel
//! degrades to an empty contribution, and neither aborts sibling channels.

use std::collections::HashMap;

use futures::future::join_all;

use vidatlas_core::{ChannelConfig, MediaItem};
use vidatlas_geocode::GeocodeClient;
use vidatlas_youtube::{merge_item, VideoApiClient, VideoApiError, VideoDetail};

use crate::enrich::backfill_location;

/// Fetches and merges the recent videos of one channel.
///
/// Any error is logged and degraded to an empty list so the caller's fan-out
/// never aborts on a single bad channel.
pub async fn fetch_source(
    video: &VideoApiClient,
    geocoder: &GeocodeClient,
    channel: &ChannelConfig,
    max_results: u32,
) -> Vec<MediaItem> {
    match try_fetch_source(video, geocoder, channel, max_results).await {
        Ok(items) => {
            tracing::debug!(channel = %channel.name, count = items.len(), "fetched channel");
            items
        }
        Err(e) => {
            tracing::warn!(
                channel = %channel.name,
                error = %e,
                "channel fetch failed — contributing no items"
            );
            Vec::new()
        }
    }
}

/// The fallible core of [`fetch_source`], returning typed errors so the
/// wrapper decides where degradation happens.
async fn try_fetch_source(
    video: &VideoApiClient,
    geocoder: &GeocodeClient,
    channel: &ChannelConfig,
    max_results: u32,
) -> Result<Vec<MediaItem>, VideoApiError> {
    let search_items = video.search_channel(&channel.channel_id, max_results).await?;
    if search_items.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<String> = search_items
        .iter()
        .filter_map(|item| item.id.video_id.clone())
        .collect();

    // Detail failure is non-fatal: proceed with search fields only.
    let details: HashMap<String, VideoDetail> = match video.list_videos(&ids).await {
        Ok(details) => details.into_iter().map(|d| (d.id.clone(), d)).collect(),
        Err(e) => {
            tracing::warn!(
                channel = %channel.name,
                error = %e,
                "detail lookup failed — merging search fields only"
            );
            HashMap::new()
        }
    };

    let merged: Vec<MediaItem> = search_items
        .iter()
        .filter_map(|item| {
            let detail = item
                .id
                .video_id
                .as_deref()
                .and_then(|id| details.get(id));
            merge_item(item, detail)
        })
        .collect();

    // Items whose structured location has coordinates but no names get their
    // names backfilled now; the geocode calls share one rate-limit queue.
    let items = join_all(
        merged
            .into_iter()
            .map(|item| backfill_location(geocoder, item)),
    )
    .await;

    Ok(items)
}
