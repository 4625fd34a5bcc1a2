use chrono::NaiveDate;
use tracing::info;

use warlog_domain::services::build_leaderboard;
use warlog_domain::{day_range, DailyReport};

use crate::queries::players_of;
use crate::queries::timeline_queries::timeline_rows;
use crate::{AppError, AppState};

/// Timeline and leaderboard for one server day, read from one kill snapshot.
pub async fn daily_report(state: &AppState, day: NaiveDate) -> Result<DailyReport, AppError> {
    let range = day_range(day, state.config.utc_offset());
    let kills = state.event_repo.fetch_kill_events(&range).await?;
    let players = players_of(state, &kills).await?;
    let timeline = timeline_rows(state, &range, &kills, &players).await?;
    let leaderboard = build_leaderboard(&kills, &players);
    info!(
        server = %state.config.server.name,
        day = %day,
        kills = kills.len(),
        players = leaderboard.len(),
        "daily report assembled"
    );
    Ok(DailyReport {
        day,
        server_name: state.config.server.name.clone(),
        server_full_name: state.config.server.full_name.clone(),
        timeline,
        leaderboard,
    })
}
