use std::collections::{BTreeMap, HashMap};

use crate::entities::{KillEvent, LeaderboardRow, Player};
use crate::value_objects::PlayerId;

/// Kills and deaths per player for one set of kill events.
///
/// Kill counts and death counts are aggregated separately and then merged
/// as a full outer join, so a player seen on only one side still gets a row
/// with zero on the other.
pub fn build_leaderboard(
    kills: &[KillEvent],
    players: &HashMap<PlayerId, Player>,
) -> Vec<LeaderboardRow> {
    let mut as_killer: BTreeMap<PlayerId, u64> = BTreeMap::new();
    let mut as_killed: BTreeMap<PlayerId, u64> = BTreeMap::new();
    for kill in kills {
        *as_killer.entry(kill.killer_player_id).or_default() += 1;
        *as_killed.entry(kill.killed_player_id).or_default() += 1;
    }

    let mut merged: BTreeMap<PlayerId, (Option<u64>, Option<u64>)> = BTreeMap::new();
    for (id, count) in as_killer {
        merged.entry(id).or_default().0 = Some(count);
    }
    for (id, count) in as_killed {
        merged.entry(id).or_default().1 = Some(count);
    }

    let mut rows: Vec<LeaderboardRow> = merged
        .into_iter()
        .map(|(id, (kills, deaths))| LeaderboardRow {
            rank: 0,
            player_id: id,
            name: players
                .get(&id)
                .map(|player| player.display_name.clone())
                .unwrap_or_else(|| Player::placeholder_name(id)),
            kills: kills.unwrap_or(0),
            deaths: deaths.unwrap_or(0),
        })
        .collect();

    rows.sort_by(|a, b| {
        b.kills
            .cmp(&a.kills)
            .then(a.deaths.cmp(&b.deaths))
            .then_with(|| a.name.cmp(&b.name))
            .then(a.player_id.cmp(&b.player_id))
    });
    for (position, row) in rows.iter_mut().enumerate() {
        row.rank = position + 1;
    }
    rows
}
