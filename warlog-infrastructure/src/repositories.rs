// Storage adapters for the domain repository ports

pub mod sqlite_store;

pub use sqlite_store::*;
