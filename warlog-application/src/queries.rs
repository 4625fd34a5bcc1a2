// Read-side use cases: per-day report data

pub mod leaderboard_queries;
pub mod report_queries;
pub mod timeline_queries;

pub use leaderboard_queries::*;
pub use report_queries::*;
pub use timeline_queries::*;

use std::collections::{BTreeSet, HashMap};

use warlog_domain::{KillEvent, Player, PlayerId};

use crate::{AppError, AppState};

pub(crate) async fn players_of(
    state: &AppState,
    kills: &[KillEvent],
) -> Result<HashMap<PlayerId, Player>, AppError> {
    let ids: Vec<PlayerId> = kills
        .iter()
        .flat_map(|kill| [kill.killed_player_id, kill.killer_player_id])
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    Ok(state.player_repo.fetch_players(&ids).await?)
}
