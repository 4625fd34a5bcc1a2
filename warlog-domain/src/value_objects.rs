// Domain value objects
pub mod dimension_kind;
pub mod identifiers;
pub mod session_kind;

pub use dimension_kind::*;
pub use identifiers::*;
pub use session_kind::*;
