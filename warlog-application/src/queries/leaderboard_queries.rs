use chrono::NaiveDate;

use warlog_domain::services::build_leaderboard;
use warlog_domain::{day_range, LeaderboardRow};

use crate::queries::players_of;
use crate::{AppError, AppState};

pub async fn daily_leaderboard(
    state: &AppState,
    day: NaiveDate,
) -> Result<Vec<LeaderboardRow>, AppError> {
    let range = day_range(day, state.config.utc_offset());
    let kills = state.event_repo.fetch_kill_events(&range).await?;
    let players = players_of(state, &kills).await?;
    Ok(build_leaderboard(&kills, &players))
}
