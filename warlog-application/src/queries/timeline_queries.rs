use std::collections::{BTreeSet, HashMap};

use chrono::NaiveDate;

use warlog_domain::services::correlate_kills;
use warlog_domain::{
    day_range, Attribution, Dimension, DimensionId, DimensionKind, KillEvent, Player, PlayerId,
    TimeRange, TimelineRow,
};

use crate::queries::players_of;
use crate::{AppError, AppState};

/// Kills of one day with the weapon and body part of the lethal hit.
pub async fn daily_timeline(state: &AppState, day: NaiveDate) -> Result<Vec<TimelineRow>, AppError> {
    let range = day_range(day, state.config.utc_offset());
    let kills = state.event_repo.fetch_kill_events(&range).await?;
    let players = players_of(state, &kills).await?;
    timeline_rows(state, &range, &kills, &players).await
}

pub(crate) async fn timeline_rows(
    state: &AppState,
    range: &TimeRange,
    kills: &[KillEvent],
    players: &HashMap<PlayerId, Player>,
) -> Result<Vec<TimelineRow>, AppError> {
    if kills.is_empty() {
        return Ok(Vec::new());
    }
    let policy = state.correlation_policy();
    // A lethal hit can land just before midnight for a kill just after it.
    let damages = state
        .event_repo
        .fetch_damage_events(&range.extend_back(policy.window))
        .await?;
    let correlated = correlate_kills(kills, &damages, &policy);

    let weapon_ids: BTreeSet<DimensionId> = correlated
        .iter()
        .filter_map(|row| row.damage.map(|d| d.weapon_id))
        .collect();
    let body_part_ids: BTreeSet<DimensionId> = correlated
        .iter()
        .filter_map(|row| row.damage.map(|d| d.body_part_id))
        .collect();
    let weapons = dimensions(state, DimensionKind::Weapon, weapon_ids).await?;
    let body_parts = dimensions(state, DimensionKind::BodyPart, body_part_ids).await?;

    Ok(correlated
        .into_iter()
        .map(|row| TimelineRow {
            occurred_at: row.kill.occurred_at,
            killed_player_id: row.kill.killed_player_id,
            killed_name: name_of(players, row.kill.killed_player_id),
            killer_player_id: row.kill.killer_player_id,
            killer_name: name_of(players, row.kill.killer_player_id),
            weapon: attribution(&weapons, row.damage.map(|d| d.weapon_id)),
            body_part: attribution(&body_parts, row.damage.map(|d| d.body_part_id)),
        })
        .collect())
}

async fn dimensions(
    state: &AppState,
    kind: DimensionKind,
    ids: BTreeSet<DimensionId>,
) -> Result<HashMap<DimensionId, Dimension>, AppError> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let ids: Vec<DimensionId> = ids.into_iter().collect();
    Ok(state.dimension_repo.fetch_dimensions(kind, &ids).await?)
}

fn name_of(players: &HashMap<PlayerId, Player>, id: PlayerId) -> String {
    players
        .get(&id)
        .map(|player| player.display_name.clone())
        .unwrap_or_else(|| Player::placeholder_name(id))
}

fn attribution(rows: &HashMap<DimensionId, Dimension>, id: Option<DimensionId>) -> Attribution {
    id.and_then(|id| rows.get(&id))
        .map(|row| Attribution::Known(row.report_name().to_string()))
        .unwrap_or(Attribution::Unknown)
}
