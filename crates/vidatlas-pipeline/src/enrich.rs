//! Batch enrichment: backfilling missing place names from coordinates.
//!
//! Runs over a whole batch (fresh or cached) and resolves every item whose
//! location has coordinates but lacks a display name. A pass that finds no
//! candidates is free: no network calls, no cache write.

use futures::future::join_all;

use vidatlas_cache::BatchCache;
use vidatlas_core::{GeoInfo, MediaItem};
use vidatlas_geocode::GeocodeClient;

/// Backfills missing place names across `items`, then persists the improved
/// batch.
///
/// Items without an incomplete location pass through untouched. When at
/// least one item was a candidate, the merged batch is written back to the
/// cache unconditionally — enrichment improves the cached data, it is not a
/// transient view transform. Already-present names are never overwritten.
pub async fn enhance(
    items: Vec<MediaItem>,
    geocoder: &GeocodeClient,
    cache: &BatchCache,
) -> Vec<MediaItem> {
    let candidates = items
        .iter()
        .filter(|item| item.location.as_ref().is_some_and(GeoInfo::needs_enrichment))
        .count();
    if candidates == 0 {
        return items;
    }

    tracing::info!(candidates, total = items.len(), "backfilling missing place names");

    let enriched = join_all(
        items
            .into_iter()
            .map(|item| backfill_location(geocoder, item)),
    )
    .await;

    cache.save(&enriched);
    enriched
}

/// Resolves one item's missing place names, if it needs any.
///
/// Fills only absent fields. A geocoder failure leaves the item's location
/// exactly as it was — per-item enrichment is best-effort and never blocks
/// siblings.
pub(crate) async fn backfill_location(geocoder: &GeocodeClient, mut item: MediaItem) -> MediaItem {
    let Some(geo) = item.location.as_mut() else {
        return item;
    };
    if !geo.needs_enrichment() {
        return item;
    }
    let (Some(lat), Some(lon)) = (geo.latitude, geo.longitude) else {
        return item;
    };

    match geocoder.resolve(lat, lon).await {
        Ok(place) => {
            if geo.city.is_none() {
                geo.city = place.city;
            }
            if geo.country.is_none() {
                geo.country = place.country;
            }
        }
        Err(e) => {
            tracing::warn!(
                item = %item.id,
                error = %e,
                "geocode failed — keeping incomplete location"
            );
        }
    }
    item
}
