// Player entity
// Keyed by the id the server prints; the display name follows the latest sighting

use serde::{Deserialize, Serialize};

use crate::value_objects::PlayerId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub display_name: String,
}

impl Player {
    pub fn new(id: PlayerId, display_name: impl Into<String>) -> Self {
        Self {
            id,
            display_name: display_name.into(),
        }
    }

    /// Name used when a referenced player row is missing from storage.
    pub fn placeholder_name(id: PlayerId) -> String {
        format!("#{}", id)
    }
}
