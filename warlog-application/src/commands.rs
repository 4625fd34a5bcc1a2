// Write-side use cases

pub mod dictionary_commands;
pub mod ingest_commands;

pub use dictionary_commands::*;
pub use ingest_commands::*;
