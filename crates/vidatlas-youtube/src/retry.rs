//! Retry with exponential back-off and jitter for the video API client.
//!
//! [`retry_with_backoff`] wraps the two paginated endpoints and retries on
//! transient errors only (network failures, 5xx, 429). Client errors and
//! malformed responses are returned immediately — retrying won't fix them.

use std::future::Future;
use std::time::Duration;

use crate::error::VideoApiError;

/// Returns `true` for errors that are worth retrying after a back-off delay.
///
/// **Retriable:**
/// - Network-level failures: timeout, connection reset.
/// - HTTP 5xx: transient server/infrastructure errors.
/// - HTTP 429: the API has asked us to back off.
///
/// **Not retriable:**
/// - Other non-2xx statuses (quota exhaustion, bad key, bad request).
/// - [`VideoApiError::Deserialize`] — malformed response.
/// - [`VideoApiError::InvalidBaseUrl`] — configuration error.
pub(crate) fn is_retriable(err: &VideoApiError) -> bool {
    match err {
        VideoApiError::Http(e) => {
            e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
        }
        VideoApiError::UnexpectedStatus { status, .. } => *status >= 500 || *status == 429,
        VideoApiError::Deserialize { .. } | VideoApiError::InvalidBaseUrl { .. } => false,
    }
}

/// Runs `operation` with up to `max_retries` additional attempts on transient errors.
///
/// Back-off schedule with `backoff_base_ms = 1_000`:
///
/// | Attempt | Sleep before next attempt        |
/// |---------|----------------------------------|
/// | 1       | 1 000 ms × 2⁰ ± 25 % jitter     |
/// | 2       | 1 000 ms × 2¹ ± 25 % jitter     |
/// | 3       | 1 000 ms × 2² ± 25 % jitter     |
///
/// Delay is capped at 60 s. Non-retriable errors are returned immediately.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_ms: u64,
    mut operation: F,
) -> Result<T, VideoApiError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, VideoApiError>>,
{
    const MAX_DELAY_MS: u64 = 60_000;
    let mut attempt = 0u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt >= max_retries {
                    return Err(err);
                }
                attempt += 1;
                let computed = backoff_base_ms.saturating_mul(1u64 << (attempt - 1).min(10));
                let capped = computed.min(MAX_DELAY_MS);
                #[allow(
                    clippy::cast_possible_truncation,
                    clippy::cast_sign_loss,
                    clippy::cast_precision_loss
                )]
                let delay_ms = (capped as f64 * (rand::random::<f64>() * 0.5 + 0.75)) as u64;
                tracing::warn!(
                    attempt,
                    max_retries,
                    delay_ms,
                    error = %err,
                    "transient video API error — retrying after back-off"
                );
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
        }
    }
}
