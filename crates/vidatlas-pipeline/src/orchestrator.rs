//! Aggregation across all configured channels.
//!
//! The orchestrator owns the decision between serving from cache and
//! refetching. It never propagates an error to its caller: every failure
//! mode below it already degrades to an empty contribution, so the worst
//! case is an empty batch.

use futures::future::join_all;
use tokio_util::sync::CancellationToken;

use vidatlas_cache::BatchCache;
use vidatlas_core::{ChannelConfig, MediaItem};
use vidatlas_geocode::GeocodeClient;
use vidatlas_youtube::VideoApiClient;

use crate::enrich::enhance;
use crate::source::fetch_source;

pub struct Aggregator {
    video: VideoApiClient,
    geocoder: GeocodeClient,
    cache: BatchCache,
    channels: Vec<ChannelConfig>,
    max_results: u32,
}

impl Aggregator {
    #[must_use]
    pub fn new(
        video: VideoApiClient,
        geocoder: GeocodeClient,
        cache: BatchCache,
        channels: Vec<ChannelConfig>,
        max_results: u32,
    ) -> Self {
        Self {
            video,
            geocoder,
            cache,
            channels,
            max_results,
        }
    }

    /// Returns the aggregated batch, serving from cache when possible.
    pub async fn fetch_all(&self, force_refresh: bool) -> Vec<MediaItem> {
        self.fetch_all_with_cancel(force_refresh, CancellationToken::new())
            .await
    }

    /// [`Self::fetch_all`] with an explicit cancellation token.
    ///
    /// A caller abandoning the aggregation cancels the token; in-flight work
    /// is dropped and an empty batch is returned. Cache state is whatever
    /// the last completed write left behind.
    pub async fn fetch_all_with_cancel(
        &self,
        force_refresh: bool,
        cancel: CancellationToken,
    ) -> Vec<MediaItem> {
        if cancel.is_cancelled() {
            return Vec::new();
        }

        let run = async {
            if !force_refresh {
                if let Some(cached) = self.cache.load() {
                    tracing::debug!(items = cached.len(), "serving cached batch");
                    // The only path that can refresh the cache without a
                    // live refetch: an enrichment pass over the cached items.
                    return enhance(cached, &self.geocoder, &self.cache).await;
                }
            }

            let results = join_all(self.channels.iter().map(|channel| {
                fetch_source(&self.video, &self.geocoder, channel, self.max_results)
            }))
            .await;

            let mut items: Vec<MediaItem> = results.into_iter().flatten().collect();
            // Stable sort: equal timestamps keep their concatenation order,
            // and channel order is fixed by the roster.
            items.sort_by(|a, b| b.published_at.cmp(&a.published_at));

            tracing::info!(
                channels = self.channels.len(),
                items = items.len(),
                "aggregated fresh batch"
            );
            self.cache.save(&items);
            items
        };

        tokio::select! {
            () = cancel.cancelled() => {
                tracing::info!("aggregation cancelled — returning empty batch");
                Vec::new()
            }
            items = run => items,
        }
    }
}
