use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from geocoder for ({lat}, {lon})")]
    UnexpectedStatus { status: u16, lat: f64, lon: f64 },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid geocoder base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}
