// Report rows handed to renderers

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::PlayerId;

/// Weapon or body part attributed to a kill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "label", rename_all = "snake_case")]
pub enum Attribution {
    Known(String),
    Unknown,
}

impl Attribution {
    pub fn label<'a>(&'a self, unknown: &'a str) -> &'a str {
        match self {
            Attribution::Known(label) => label,
            Attribution::Unknown => unknown,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineRow {
    pub occurred_at: DateTime<Utc>,
    pub killed_player_id: PlayerId,
    pub killed_name: String,
    pub killer_player_id: PlayerId,
    pub killer_name: String,
    pub weapon: Attribution,
    pub body_part: Attribution,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardRow {
    pub rank: usize,
    pub player_id: PlayerId,
    pub name: String,
    pub kills: u64,
    pub deaths: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyReport {
    pub day: NaiveDate,
    pub server_name: String,
    pub server_full_name: String,
    pub timeline: Vec<TimelineRow>,
    pub leaderboard: Vec<LeaderboardRow>,
}
