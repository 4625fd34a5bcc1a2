// Domain entities

pub mod dimension;
pub mod event;
pub mod model;
pub mod player;
pub mod report;

pub use dimension::*;
pub use event::*;
pub use model::*;
pub use player::*;
pub use report::*;
