// Log ingestion: line-by-line scan that turns admin log text into stored events

pub mod dimension_resolver;
pub mod engine;
pub mod player_directory;

pub use dimension_resolver::DimensionResolver;
pub use engine::{IngestEngine, ScanState};
pub use player_directory::PlayerDirectory;
