//! Shared rate limiter for the reverse-geocoding service.
//!
//! The public geocoding service allows at most one request per second per
//! client. [`RateLimiter`] is a single-flight queue: concurrent callers line
//! up on an async mutex and each departs at least `min_interval` after the
//! previous one, so the service sees the configured rate no matter how many
//! enrichment tasks fan out at once.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

pub struct RateLimiter {
    min_interval: Duration,
    next_ready: Mutex<Instant>,
}

impl RateLimiter {
    #[must_use]
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            next_ready: Mutex::new(Instant::now()),
        }
    }

    /// Waits for this caller's slot.
    ///
    /// The lock is held across the sleep so that queued callers are spaced
    /// `min_interval` apart rather than all waking at once.
    pub async fn acquire(&self) {
        let mut next_ready = self.next_ready.lock().await;
        let now = Instant::now();
        if now < *next_ready {
            tokio::time::sleep_until(*next_ready).await;
        }
        *next_ready = Instant::now() + self.min_interval;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn first_acquire_does_not_wait() {
        let limiter = RateLimiter::new(Duration::from_secs(1));
        let start = Instant::now();
        limiter.acquire().await;
        assert_eq!(Instant::now(), start);
    }

    #[tokio::test(start_paused = true)]
    async fn sequential_acquires_are_spaced_by_interval() {
        let limiter = RateLimiter::new(Duration::from_secs(1));
        let start = Instant::now();
        limiter.acquire().await;
        limiter.acquire().await;
        limiter.acquire().await;
        assert!(Instant::now() - start >= Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_acquires_serialize() {
        use std::sync::Arc;

        let limiter = Arc::new(RateLimiter::new(Duration::from_secs(1)));
        let start = Instant::now();

        let a = {
            let limiter = Arc::clone(&limiter);
            tokio::spawn(async move {
                limiter.acquire().await;
                Instant::now()
            })
        };
        let b = {
            let limiter = Arc::clone(&limiter);
            tokio::spawn(async move {
                limiter.acquire().await;
                Instant::now()
            })
        };

        let (done_a, done_b) = (a.await.unwrap(), b.await.unwrap());
        let later = done_a.max(done_b);
        assert!(
            later - start >= Duration::from_secs(1),
            "second caller should have waited out the shared interval"
        );
    }
}
