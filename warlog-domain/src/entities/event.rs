// Event entities
// Session markers, kills and damage hits as written by ingestion

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{DimensionId, EventId, PlayerId, SessionKind};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSessionEvent {
    pub kind: SessionKind,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NewKillEvent {
    pub killed_player_id: PlayerId,
    pub killer_player_id: PlayerId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KillEvent {
    pub id: EventId,
    pub killed_player_id: PlayerId,
    pub killer_player_id: PlayerId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NewDamageEvent {
    pub dealt_by_player_id: PlayerId,
    pub received_by_player_id: PlayerId,
    pub weapon_id: DimensionId,
    pub body_part_id: DimensionId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageEvent {
    pub id: EventId,
    pub dealt_by_player_id: PlayerId,
    pub received_by_player_id: PlayerId,
    pub weapon_id: DimensionId,
    pub body_part_id: DimensionId,
    pub occurred_at: DateTime<Utc>,
}

/// Result of an append that is keyed on the full event tuple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted(EventId),
    AlreadyPresent,
}

impl InsertOutcome {
    pub fn is_inserted(&self) -> bool {
        matches!(self, InsertOutcome::Inserted(_))
    }
}
