pub mod enrich;
pub mod orchestrator;
pub mod source;

pub use enrich::enhance;
pub use orchestrator::Aggregator;
pub use source::fetch_source;
