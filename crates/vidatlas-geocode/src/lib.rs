pub mod client;
pub mod error;
pub mod limiter;

pub use client::{GeocodeClient, ResolvedPlace};
pub use error::GeocodeError;
pub use limiter::RateLimiter;
