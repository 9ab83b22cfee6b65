pub mod cache;
pub mod error;
pub mod store;

pub use cache::{BatchCache, DEFAULT_TTL_HOURS};
pub use error::CacheError;
pub use store::{BlobStore, FileStore, MemoryStore};
