pub mod client;
pub mod error;
pub mod normalize;
mod retry;
pub mod types;

pub use client::VideoApiClient;
pub use error::VideoApiError;
pub use normalize::{merge_item, parse_location_description};
pub use types::{SearchItem, SearchResponse, VideoDetail, VideoListResponse};
