//! Time-expiring cache for the aggregated media batch.
//!
//! Exactly one batch is ever stored, always under [`CACHE_KEY`], always
//! overwritten wholesale. The cache must never be a source of fatal errors:
//! every storage or serialization failure is logged and degraded to
//! "miss" / "no-op" so the pipeline can always fall back to a live fetch.

use chrono::Utc;
use std::sync::Arc;

use vidatlas_core::{CachedBatch, MediaItem};

use crate::error::CacheError;
use crate::store::BlobStore;

/// Fixed storage key for the single persisted batch.
const CACHE_KEY: &str = "media_batch";

/// Default staleness threshold past which a stored batch is treated as absent.
pub const DEFAULT_TTL_HOURS: u64 = 24;

pub struct BatchCache {
    store: Arc<dyn BlobStore>,
    ttl_ms: i64,
}

impl BatchCache {
    #[must_use]
    pub fn new(store: Arc<dyn BlobStore>, ttl_hours: u64) -> Self {
        #[allow(clippy::cast_possible_wrap)]
        let ttl_ms = (ttl_hours * 60 * 60 * 1000) as i64;
        Self { store, ttl_ms }
    }

    /// Replaces the stored batch with `items`, stamped with the current time.
    ///
    /// Storage failures are logged and swallowed; the caller keeps its
    /// in-memory batch either way.
    pub fn save(&self, items: &[MediaItem]) {
        if let Err(e) = self.try_save(items) {
            tracing::warn!(error = %e, "failed to persist batch — continuing without cache");
        }
    }

    fn try_save(&self, items: &[MediaItem]) -> Result<(), CacheError> {
        let batch = CachedBatch {
            items: items.to_vec(),
            timestamp: Utc::now().timestamp_millis(),
        };
        let bytes = serde_json::to_vec(&batch)?;
        self.store.write(CACHE_KEY, &bytes)
    }

    /// Returns the stored batch, or `None` if absent, unreadable, or older
    /// than the expiry window. An expired batch is removed as a side effect.
    #[must_use]
    pub fn load(&self) -> Option<Vec<MediaItem>> {
        let batch = self.read_batch()?;
        if self.age_ms(&batch) > self.ttl_ms {
            tracing::debug!("cached batch expired — clearing");
            self.clear();
            return None;
        }
        Some(batch.items)
    }

    /// Removes the stored batch. Failures are logged and swallowed.
    pub fn clear(&self) {
        if let Err(e) = self.store.remove(CACHE_KEY) {
            tracing::warn!(error = %e, "failed to clear cached batch");
        }
    }

    /// `true` when a batch is stored and within the expiry window.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.read_batch()
            .is_some_and(|batch| self.age_ms(&batch) <= self.ttl_ms)
    }

    /// Age of the stored batch in whole minutes, or `None` if absent or
    /// unreadable. Computed from the wall clock at call time.
    #[must_use]
    pub fn age_minutes(&self) -> Option<i64> {
        self.read_batch().map(|batch| self.age_ms(&batch) / 60_000)
    }

    fn read_batch(&self) -> Option<CachedBatch> {
        let bytes = match self.store.read(CACHE_KEY) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(error = %e, "cache read failed — treating as miss");
                return None;
            }
        };
        match serde_json::from_slice(&bytes) {
            Ok(batch) => Some(batch),
            Err(e) => {
                tracing::warn!(error = %e, "cached batch is corrupt — treating as miss");
                None
            }
        }
    }

    #[allow(clippy::unused_self)]
    fn age_ms(&self, batch: &CachedBatch) -> i64 {
        Utc::now().timestamp_millis() - batch.timestamp
    }
}
