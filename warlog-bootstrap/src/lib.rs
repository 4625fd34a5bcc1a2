// Warlog Bootstrap: wires configuration, storage and the CLI commands

pub mod context;
pub mod lifecycle;

pub use context::AppContext;
pub use lifecycle::{init_tracing, run_localize, run_parse, run_report};
