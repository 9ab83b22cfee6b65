//! HTTP client for a Nominatim-style reverse-geocoding service.
//!
//! Turns raw coordinates into display names. Every call goes through the
//! shared [`RateLimiter`] first; the service's usage policy also requires a
//! client-identifying `User-Agent`, which is set at construction.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, Url};
use serde::Deserialize;

use crate::error::GeocodeError;
use crate::limiter::RateLimiter;

const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org/";

/// City and country names resolved from a coordinate pair.
///
/// Absent fields stay absent: the service omitting a name never produces an
/// empty string here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedPlace {
    pub city: Option<String>,
    pub country: Option<String>,
}

/// Response body of the `reverse` endpoint, reduced to the fields we read.
#[derive(Debug, Deserialize)]
struct ReverseResponse {
    #[serde(default)]
    address: Option<Address>,
}

/// The service reports the settlement under different keys depending on its
/// size; `city_name` applies the documented fallback chain.
#[derive(Debug, Deserialize)]
struct Address {
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    town: Option<String>,
    #[serde(default)]
    village: Option<String>,
    #[serde(default)]
    hamlet: Option<String>,
    #[serde(default)]
    country: Option<String>,
}

impl Address {
    fn city_name(self) -> (Option<String>, Option<String>) {
        let city = self.city.or(self.town).or(self.village).or(self.hamlet);
        (city, self.country)
    }
}

/// Client for the reverse-geocoding service.
///
/// Holds the shared [`RateLimiter`] so that every caller — source-fetch
/// backfill and batch enrichment alike — queues against the same rate
/// policy. Use [`GeocodeClient::new`] for production or
/// [`GeocodeClient::with_base_url`] to point at a mock server in tests.
pub struct GeocodeClient {
    client: Client,
    base_url: Url,
    limiter: Arc<RateLimiter>,
}

impl GeocodeClient {
    /// Creates a client pointed at the production geocoding service.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        user_agent: &str,
        timeout_secs: u64,
        limiter: Arc<RateLimiter>,
    ) -> Result<Self, GeocodeError> {
        Self::with_base_url(user_agent, timeout_secs, limiter, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`GeocodeError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn with_base_url(
        user_agent: &str,
        timeout_secs: u64,
        limiter: Arc<RateLimiter>,
        base_url: &str,
    ) -> Result<Self, GeocodeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url =
            Url::parse(&normalised).map_err(|e| GeocodeError::InvalidBaseUrl {
                base_url: normalised.clone(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            client,
            base_url,
            limiter,
        })
    }

    /// Resolves a coordinate pair to city and country display names.
    ///
    /// Waits for the shared rate-limit slot, then calls the `reverse`
    /// endpoint with `format=json&addressdetails=1`. Fields the service does
    /// not report come back as `None`.
    ///
    /// # Errors
    ///
    /// - [`GeocodeError::Http`] on network failure.
    /// - [`GeocodeError::UnexpectedStatus`] on a non-2xx response.
    /// - [`GeocodeError::Deserialize`] if the body is not the expected JSON.
    ///
    /// Callers treat any of these as "no names resolved" — enrichment is
    /// best-effort and never fails a batch.
    pub async fn resolve(&self, lat: f64, lon: f64) -> Result<ResolvedPlace, GeocodeError> {
        self.limiter.acquire().await;

        let mut url = self.base_url.join("reverse").map_err(|e| {
            GeocodeError::InvalidBaseUrl {
                base_url: self.base_url.to_string(),
                reason: e.to_string(),
            }
        })?;
        url.query_pairs_mut()
            .append_pair("lat", &lat.to_string())
            .append_pair("lon", &lon.to_string())
            .append_pair("format", "json")
            .append_pair("addressdetails", "1");

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(GeocodeError::UnexpectedStatus {
                status: status.as_u16(),
                lat,
                lon,
            });
        }

        let body = response.text().await?;
        let parsed: ReverseResponse =
            serde_json::from_str(&body).map_err(|e| GeocodeError::Deserialize {
                context: format!("reverse({lat}, {lon})"),
                source: e,
            })?;

        let (city, country) = match parsed.address {
            Some(address) => address.city_name(),
            None => (None, None),
        };

        tracing::debug!(lat, lon, ?city, ?country, "resolved coordinates");
        Ok(ResolvedPlace { city, country })
    }
}
