use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

#[derive(Debug, Default)]
pub struct Metrics {
    lines_read: AtomicU64,
    sessions: AtomicU64,
    kills_inserted: AtomicU64,
    kills_duplicate: AtomicU64,
    damage_inserted: AtomicU64,
    damage_duplicate: AtomicU64,
    lines_skipped: AtomicU64,
    lines_unrecognized: AtomicU64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IngestSummary {
    pub lines_read: u64,
    pub sessions: u64,
    pub kills_inserted: u64,
    pub kills_duplicate: u64,
    pub damage_inserted: u64,
    pub damage_duplicate: u64,
    pub lines_skipped: u64,
    pub lines_unrecognized: u64,
}

impl Metrics {
    pub fn record_line(&self) {
        self.lines_read.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_session(&self) {
        self.sessions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_kill(&self, inserted: bool) {
        if inserted {
            self.kills_inserted.fetch_add(1, Ordering::Relaxed);
        } else {
            self.kills_duplicate.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_damage(&self, inserted: bool) {
        if inserted {
            self.damage_inserted.fetch_add(1, Ordering::Relaxed);
        } else {
            self.damage_duplicate.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_skipped(&self) {
        self.lines_skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_unrecognized(&self) {
        self.lines_unrecognized.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> IngestSummary {
        IngestSummary {
            lines_read: self.lines_read.load(Ordering::Relaxed),
            sessions: self.sessions.load(Ordering::Relaxed),
            kills_inserted: self.kills_inserted.load(Ordering::Relaxed),
            kills_duplicate: self.kills_duplicate.load(Ordering::Relaxed),
            damage_inserted: self.damage_inserted.load(Ordering::Relaxed),
            damage_duplicate: self.damage_duplicate.load(Ordering::Relaxed),
            lines_skipped: self.lines_skipped.load(Ordering::Relaxed),
            lines_unrecognized: self.lines_unrecognized.load(Ordering::Relaxed),
        }
    }

    pub fn render_summary(&self) -> String {
        let s = self.snapshot();
        format!(
            "lines={} sessions={} kills={} (+{} already stored) damage={} (+{} already stored) skipped={} unrecognized={}",
            s.lines_read,
            s.sessions,
            s.kills_inserted,
            s.kills_duplicate,
            s.damage_inserted,
            s.damage_duplicate,
            s.lines_skipped,
            s.lines_unrecognized
        )
    }
}
