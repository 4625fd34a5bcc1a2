use std::path::Path;

use tokio::io::{AsyncBufRead, BufReader};
use tracing::{error, info};

use crate::ingest::IngestEngine;
use crate::{AppError, AppState, IngestSummary};

/// Scans one admin log stream into storage and reports what was written.
pub async fn ingest_log<R>(state: &AppState, reader: R) -> Result<IngestSummary, AppError>
where
    R: AsyncBufRead + Unpin,
{
    let before = state.metrics.snapshot();
    let mut engine = IngestEngine::new(state);
    engine.run(reader).await?;
    let after = state.metrics.snapshot();
    Ok(IngestSummary {
        lines_read: after.lines_read - before.lines_read,
        sessions: after.sessions - before.sessions,
        kills_inserted: after.kills_inserted - before.kills_inserted,
        kills_duplicate: after.kills_duplicate - before.kills_duplicate,
        damage_inserted: after.damage_inserted - before.damage_inserted,
        damage_duplicate: after.damage_duplicate - before.damage_duplicate,
        lines_skipped: after.lines_skipped - before.lines_skipped,
        lines_unrecognized: after.lines_unrecognized - before.lines_unrecognized,
    })
}

pub async fn ingest_log_file(state: &AppState, path: &Path) -> Result<IngestSummary, AppError> {
    let file = tokio::fs::File::open(path).await.map_err(|err| {
        error!("failed to open log {}: {}", path.display(), err);
        AppError::Io(err)
    })?;
    info!(
        path = %path.display(),
        server = %state.config.server.name,
        encoding = state.decoder.encoding_name(),
        "ingesting admin log"
    );
    let summary = ingest_log(state, BufReader::new(file)).await?;
    info!(
        path = %path.display(),
        kills = summary.kills_inserted,
        damage = summary.damage_inserted,
        skipped = summary.lines_skipped,
        "ingest finished"
    );
    Ok(summary)
}
