use std::sync::Arc;

use chrono::{FixedOffset, NaiveDate, NaiveTime};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, info, warn};

use warlog_domain::ports::EventRepository;
use warlog_domain::services::{LineClassifier, LogLine, PlayerMention, SessionClock};
use warlog_domain::{
    local_to_utc, Dimension, DimensionKind, NewDamageEvent, NewKillEvent, NewSessionEvent, SessionKind,
};

use crate::ingest::{DimensionResolver, PlayerDirectory};
use crate::{AppError, AppState, Metrics};

/// Where the scan currently is relative to server sessions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanState {
    Scanning,
    InSession(SessionClock),
}

pub struct IngestEngine {
    players: PlayerDirectory,
    dimensions: DimensionResolver,
    events: Arc<dyn EventRepository>,
    classifier: Arc<LineClassifier>,
    metrics: Arc<Metrics>,
    offset: FixedOffset,
    scan: ScanState,
    line_no: u64,
}

impl IngestEngine {
    pub fn new(state: &AppState) -> Self {
        Self {
            players: PlayerDirectory::new(state.player_repo.clone(), state.decoder),
            dimensions: DimensionResolver::new(state.dimension_repo.clone()),
            events: state.event_repo.clone(),
            classifier: state.classifier.clone(),
            metrics: state.metrics.clone(),
            offset: state.config.utc_offset(),
            scan: ScanState::Scanning,
            line_no: 0,
        }
    }

    pub fn scan_state(&self) -> &ScanState {
        &self.scan
    }

    /// Feeds every line of `reader`; storage and read failures abort the scan.
    pub async fn run<R>(&mut self, mut reader: R) -> Result<(), AppError>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut buf = Vec::with_capacity(512);
        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf).await? == 0 {
                break;
            }
            self.feed_line(&buf).await?;
        }
        if let ScanState::InSession(clock) = &self.scan {
            debug!(
                anchor = %clock.anchor_date(),
                first = ?clock.init_time(),
                "input ended inside a session"
            );
        }
        self.scan = ScanState::Scanning;
        Ok(())
    }

    pub async fn feed_line(&mut self, raw: &[u8]) -> Result<(), AppError> {
        self.line_no += 1;
        self.metrics.record_line();

        let line = trim_line_ending(raw);
        let Some(&first) = line.first() else {
            return Ok(());
        };
        if first == 0 || first == b'*' {
            if let ScanState::InSession(clock) = &self.scan {
                debug!(
                    line = self.line_no,
                    first = ?clock.init_time(),
                    "session closed by end marker"
                );
            }
            self.scan = ScanState::Scanning;
            return Ok(());
        }

        let parsed = match self.classifier.classify(line) {
            Ok(parsed) => parsed,
            Err(err) => {
                warn!(line = self.line_no, error = %err, "skipping malformed line");
                self.metrics.record_skipped();
                self.touch_clock(line);
                return Ok(());
            }
        };

        match parsed {
            LogLine::SessionStart { date, time } => self.start_session(date, time).await,
            LogLine::Unrecognized => {
                debug!(line = self.line_no, "unrecognized line skipped");
                self.metrics.record_unrecognized();
                self.touch_clock(line);
                Ok(())
            }
            LogLine::Kill {
                time,
                killed,
                killer,
            } => {
                let Some(occurred_at) = self.timestamp(time) else {
                    return Ok(());
                };
                self.record_kill(occurred_at, killed, killer).await
            }
            LogLine::Damage {
                time,
                dealer,
                receiver,
                weapon_label,
                body_part_label,
                ..
            } => {
                let Some(occurred_at) = self.timestamp(time) else {
                    return Ok(());
                };
                self.record_damage(occurred_at, dealer, receiver, &weapon_label, &body_part_label)
                    .await
            }
        }
    }

    async fn start_session(&mut self, date: NaiveDate, time: NaiveTime) -> Result<(), AppError> {
        let occurred_at = local_to_utc(date.and_time(time), self.offset);
        let outcome = self
            .events
            .insert_session_event(&NewSessionEvent {
                kind: SessionKind::Restart,
                occurred_at,
            })
            .await?;
        info!(
            line = self.line_no,
            started = %occurred_at,
            new = outcome.is_inserted(),
            "server session"
        );
        self.metrics.record_session();
        self.scan = ScanState::InSession(SessionClock::new(date));
        Ok(())
    }

    /// Full timestamp for an in-session line; lines outside a session are skipped.
    fn timestamp(&mut self, time: NaiveTime) -> Option<chrono::DateTime<chrono::Utc>> {
        match &mut self.scan {
            ScanState::InSession(clock) => Some(local_to_utc(clock.resolve(time), self.offset)),
            ScanState::Scanning => {
                debug!(line = self.line_no, "event outside of a session");
                self.metrics.record_skipped();
                None
            }
        }
    }

    // Unused lines still count as "seen" for the day-rollover rule.
    fn touch_clock(&mut self, line: &[u8]) {
        if let ScanState::InSession(clock) = &mut self.scan {
            if let Some(time) = self.classifier.leading_time(line) {
                clock.resolve(time);
            }
        }
    }

    async fn record_kill(
        &mut self,
        occurred_at: chrono::DateTime<chrono::Utc>,
        killed: PlayerMention<'_>,
        killer: PlayerMention<'_>,
    ) -> Result<(), AppError> {
        let killer = self.players.resolve(killer.id, killer.raw_name).await?;
        let killed = self.players.resolve(killed.id, killed.raw_name).await?;
        let outcome = self
            .events
            .insert_kill_event(&NewKillEvent {
                killed_player_id: killed.id,
                killer_player_id: killer.id,
                occurred_at,
            })
            .await?;
        self.metrics.record_kill(outcome.is_inserted());
        Ok(())
    }

    async fn record_damage(
        &mut self,
        occurred_at: chrono::DateTime<chrono::Utc>,
        dealer: PlayerMention<'_>,
        receiver: PlayerMention<'_>,
        weapon_label: &str,
        body_part_label: &str,
    ) -> Result<(), AppError> {
        if Dimension::normalize_label(weapon_label).is_empty()
            || Dimension::normalize_label(body_part_label).is_empty()
        {
            warn!(line = self.line_no, "skipping damage line with a blank label");
            self.metrics.record_skipped();
            return Ok(());
        }
        let dealer = self.players.resolve(dealer.id, dealer.raw_name).await?;
        let receiver = self.players.resolve(receiver.id, receiver.raw_name).await?;
        let weapon = self.dimensions.resolve(DimensionKind::Weapon, weapon_label).await?;
        let body_part = self
            .dimensions
            .resolve(DimensionKind::BodyPart, body_part_label)
            .await?;
        let outcome = self
            .events
            .insert_damage_event(&NewDamageEvent {
                dealt_by_player_id: dealer.id,
                received_by_player_id: receiver.id,
                weapon_id: weapon.id,
                body_part_id: body_part.id,
                occurred_at,
            })
            .await?;
        self.metrics.record_damage(outcome.is_inserted());
        Ok(())
    }
}

fn trim_line_ending(raw: &[u8]) -> &[u8] {
    let line = raw.strip_suffix(b"\n").unwrap_or(raw);
    line.strip_suffix(b"\r").unwrap_or(line)
}
