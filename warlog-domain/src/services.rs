// Domain services: pure log parsing and report aggregation

pub mod correlation;
pub mod leaderboard;
pub mod line_classifier;
pub mod name_decoder;
pub mod session_clock;

pub use correlation::*;
pub use leaderboard::*;
pub use line_classifier::*;
pub use name_decoder::*;
pub use session_clock::*;
