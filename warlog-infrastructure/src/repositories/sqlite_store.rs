use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;
use rusqlite::{params, params_from_iter, Connection, ErrorCode, OptionalExtension, Row};
use tokio::sync::Mutex;

use warlog_domain::ports::{DimensionRepository, EventRepository, PlayerRepository};
use warlog_domain::{
    millis_to_utc, utc_to_millis, DamageEvent, DbConfig, Dimension, DimensionId, DimensionKind,
    EventId, InsertOutcome, KillEvent, NewDamageEvent, NewKillEvent, NewSessionEvent, Player,
    PlayerId, StoreError, StoreResult, TimeRange,
};

// Keeps `IN (...)` lists well under SQLite's bound-parameter limit.
const ID_CHUNK: usize = 500;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS players (
    id INTEGER PRIMARY KEY,
    display_name TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS session_events (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    kind TEXT NOT NULL,
    occurred_at INTEGER NOT NULL,
    UNIQUE (kind, occurred_at)
);
CREATE TABLE IF NOT EXISTS kill_events (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    killed_player_id INTEGER NOT NULL REFERENCES players(id),
    killer_player_id INTEGER NOT NULL REFERENCES players(id),
    occurred_at INTEGER NOT NULL,
    UNIQUE (killed_player_id, killer_player_id, occurred_at)
);
CREATE INDEX IF NOT EXISTS kill_events_occurred_at ON kill_events(occurred_at);
CREATE TABLE IF NOT EXISTS damage_events (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    dealt_by_player_id INTEGER NOT NULL REFERENCES players(id),
    received_by_player_id INTEGER NOT NULL REFERENCES players(id),
    weapon_id INTEGER NOT NULL,
    body_part_id INTEGER NOT NULL,
    occurred_at INTEGER NOT NULL,
    UNIQUE (dealt_by_player_id, received_by_player_id, weapon_id, body_part_id, occurred_at)
);
CREATE INDEX IF NOT EXISTS damage_events_occurred_at ON damage_events(occurred_at);
CREATE TABLE IF NOT EXISTS dict.weapons (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE,
    localized_name TEXT
);
CREATE TABLE IF NOT EXISTS dict.body_parts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE,
    localized_name TEXT
);
"#;

/// One server's event database with the shared dictionary attached as `dict`.
pub struct SqliteRepository {
    conn: Mutex<Connection>,
}

impl SqliteRepository {
    pub fn open(config: &DbConfig) -> Result<Self> {
        for path in [&config.database_path, &config.dictionary_path] {
            if let Some(parent) = Path::new(path).parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed creating db dir at {}", parent.display()))?;
            }
        }
        let conn = Connection::open(&config.database_path)
            .with_context(|| format!("failed opening sqlite db at {}", config.database_path))?;
        conn.execute("ATTACH DATABASE ?1 AS dict", params![config.dictionary_path])
            .with_context(|| format!("failed attaching dictionary {}", config.dictionary_path))?;
        Ok(Self::with_connection(conn))
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("failed opening in-memory sqlite")?;
        conn.execute_batch("ATTACH DATABASE ':memory:' AS dict")
            .context("failed attaching in-memory dictionary")?;
        Ok(Self::with_connection(conn))
    }

    fn with_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }
}

fn dimension_table(kind: DimensionKind) -> &'static str {
    match kind {
        DimensionKind::Weapon => "dict.weapons",
        DimensionKind::BodyPart => "dict.body_parts",
    }
}

fn conflict_or_backend(err: rusqlite::Error, what: String) -> StoreError {
    match &err {
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.code == ErrorCode::ConstraintViolation =>
        {
            StoreError::Conflict(what)
        }
        _ => StoreError::Backend(anyhow::Error::new(err).context(what)),
    }
}

/// `execute` result of an `ON CONFLICT DO NOTHING` insert.
fn outcome(conn: &Connection, changed: usize) -> InsertOutcome {
    if changed == 0 {
        InsertOutcome::AlreadyPresent
    } else {
        InsertOutcome::Inserted(EventId(conn.last_insert_rowid()))
    }
}

fn placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}

fn dimension_from_row(kind: DimensionKind, row: &Row<'_>) -> rusqlite::Result<Dimension> {
    Ok(Dimension {
        id: DimensionId(row.get(0)?),
        kind,
        name: row.get(1)?,
        localized_name: row.get(2)?,
    })
}

#[async_trait]
impl PlayerRepository for SqliteRepository {
    async fn find_player(&self, id: PlayerId) -> StoreResult<Option<Player>> {
        let conn = self.conn.lock().await;
        let player = conn
            .query_row(
                "SELECT id, display_name FROM players WHERE id = ?1",
                params![id.0],
                |row| Ok(Player::new(PlayerId(row.get(0)?), row.get::<_, String>(1)?)),
            )
            .optional()
            .with_context(|| format!("failed reading player {}", id))?;
        Ok(player)
    }

    async fn insert_player(&self, player: &Player) -> StoreResult<()> {
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO players (id, display_name) VALUES (?1, ?2)",
            params![player.id.0, player.display_name],
        )
        .map_err(|err| conflict_or_backend(err, format!("player {}", player.id)))?;
        Ok(())
    }

    async fn rename_player(&self, id: PlayerId, display_name: &str) -> StoreResult<()> {
        let conn = self.conn.lock().await;
        conn.execute(
            "UPDATE players SET display_name = ?2 WHERE id = ?1",
            params![id.0, display_name],
        )
        .with_context(|| format!("failed renaming player {}", id))?;
        Ok(())
    }

    async fn fetch_players(&self, ids: &[PlayerId]) -> StoreResult<HashMap<PlayerId, Player>> {
        let conn = self.conn.lock().await;
        let mut out = HashMap::with_capacity(ids.len());
        for chunk in ids.chunks(ID_CHUNK) {
            let sql = format!(
                "SELECT id, display_name FROM players WHERE id IN ({})",
                placeholders(chunk.len())
            );
            let mut stmt = conn.prepare(&sql).context("failed preparing players query")?;
            let rows = stmt
                .query_map(params_from_iter(chunk.iter().map(|id| id.0)), |row| {
                    Ok(Player::new(PlayerId(row.get(0)?), row.get::<_, String>(1)?))
                })
                .context("failed querying players")?;
            for row in rows {
                let player = row.context("failed decoding player row")?;
                out.insert(player.id, player);
            }
        }
        Ok(out)
    }
}

#[async_trait]
impl DimensionRepository for SqliteRepository {
    async fn find_dimension(&self, kind: DimensionKind, name: &str) -> StoreResult<Option<Dimension>> {
        let conn = self.conn.lock().await;
        let sql = format!(
            "SELECT id, name, localized_name FROM {} WHERE name = ?1",
            dimension_table(kind)
        );
        let dimension = conn
            .query_row(&sql, params![name], |row| dimension_from_row(kind, row))
            .optional()
            .with_context(|| format!("failed reading {} '{}'", kind.as_str(), name))?;
        Ok(dimension)
    }

    async fn insert_dimension(&self, kind: DimensionKind, name: &str) -> StoreResult<Dimension> {
        let conn = self.conn.lock().await;
        let sql = format!("INSERT INTO {} (name) VALUES (?1)", dimension_table(kind));
        conn.execute(&sql, params![name])
            .map_err(|err| conflict_or_backend(err, format!("{} '{}'", kind.as_str(), name)))?;
        Ok(Dimension {
            id: DimensionId(conn.last_insert_rowid()),
            kind,
            name: name.to_string(),
            localized_name: None,
        })
    }

    async fn set_localized_name(
        &self,
        kind: DimensionKind,
        name: &str,
        localized_name: Option<&str>,
    ) -> StoreResult<bool> {
        let conn = self.conn.lock().await;
        let sql = format!(
            "UPDATE {} SET localized_name = ?2 WHERE name = ?1",
            dimension_table(kind)
        );
        let changed = conn
            .execute(&sql, params![name, localized_name])
            .with_context(|| format!("failed localizing {} '{}'", kind.as_str(), name))?;
        Ok(changed > 0)
    }

    async fn fetch_dimensions(
        &self,
        kind: DimensionKind,
        ids: &[DimensionId],
    ) -> StoreResult<HashMap<DimensionId, Dimension>> {
        let conn = self.conn.lock().await;
        let mut out = HashMap::with_capacity(ids.len());
        for chunk in ids.chunks(ID_CHUNK) {
            let sql = format!(
                "SELECT id, name, localized_name FROM {} WHERE id IN ({})",
                dimension_table(kind),
                placeholders(chunk.len())
            );
            let mut stmt = conn.prepare(&sql).context("failed preparing dictionary query")?;
            let rows = stmt
                .query_map(params_from_iter(chunk.iter().map(|id| id.0)), |row| {
                    dimension_from_row(kind, row)
                })
                .context("failed querying dictionary")?;
            for row in rows {
                let dimension = row.context("failed decoding dictionary row")?;
                out.insert(dimension.id, dimension);
            }
        }
        Ok(out)
    }
}

#[async_trait]
impl EventRepository for SqliteRepository {
    async fn ensure_schema(&self) -> StoreResult<()> {
        let conn = self.conn.lock().await;
        conn.execute_batch(SCHEMA)
            .context("failed creating warlog tables")?;
        Ok(())
    }

    async fn insert_session_event(&self, event: &NewSessionEvent) -> StoreResult<InsertOutcome> {
        let conn = self.conn.lock().await;
        let changed = conn
            .execute(
                "INSERT INTO session_events (kind, occurred_at) VALUES (?1, ?2) ON CONFLICT DO NOTHING",
                params![event.kind.as_str(), utc_to_millis(event.occurred_at)],
            )
            .context("failed inserting session event")?;
        Ok(outcome(&conn, changed))
    }

    async fn insert_kill_event(&self, event: &NewKillEvent) -> StoreResult<InsertOutcome> {
        let conn = self.conn.lock().await;
        let changed = conn
            .execute(
                "INSERT INTO kill_events (killed_player_id, killer_player_id, occurred_at) \
                 VALUES (?1, ?2, ?3) ON CONFLICT DO NOTHING",
                params![
                    event.killed_player_id.0,
                    event.killer_player_id.0,
                    utc_to_millis(event.occurred_at)
                ],
            )
            .context("failed inserting kill event")?;
        Ok(outcome(&conn, changed))
    }

    async fn insert_damage_event(&self, event: &NewDamageEvent) -> StoreResult<InsertOutcome> {
        let conn = self.conn.lock().await;
        let changed = conn
            .execute(
                "INSERT INTO damage_events \
                 (dealt_by_player_id, received_by_player_id, weapon_id, body_part_id, occurred_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5) ON CONFLICT DO NOTHING",
                params![
                    event.dealt_by_player_id.0,
                    event.received_by_player_id.0,
                    event.weapon_id.0,
                    event.body_part_id.0,
                    utc_to_millis(event.occurred_at)
                ],
            )
            .context("failed inserting damage event")?;
        Ok(outcome(&conn, changed))
    }

    async fn fetch_kill_events(&self, range: &TimeRange) -> StoreResult<Vec<KillEvent>> {
        let conn = self.conn.lock().await;
        let mut stmt = conn
            .prepare(
                "SELECT id, killed_player_id, killer_player_id, occurred_at FROM kill_events \
                 WHERE occurred_at >= ?1 AND occurred_at < ?2 ORDER BY occurred_at, id",
            )
            .context("failed preparing kill query")?;
        let rows = stmt
            .query_map(
                params![utc_to_millis(range.start), utc_to_millis(range.end)],
                |row| {
                    Ok(KillEvent {
                        id: EventId(row.get(0)?),
                        killed_player_id: PlayerId(row.get(1)?),
                        killer_player_id: PlayerId(row.get(2)?),
                        occurred_at: millis_to_utc(row.get(3)?),
                    })
                },
            )
            .context("failed querying kill events")?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row.context("failed decoding kill row")?);
        }
        Ok(out)
    }

    async fn fetch_damage_events(&self, range: &TimeRange) -> StoreResult<Vec<DamageEvent>> {
        let conn = self.conn.lock().await;
        let mut stmt = conn
            .prepare(
                "SELECT id, dealt_by_player_id, received_by_player_id, weapon_id, body_part_id, occurred_at \
                 FROM damage_events WHERE occurred_at >= ?1 AND occurred_at < ?2 ORDER BY occurred_at, id",
            )
            .context("failed preparing damage query")?;
        let rows = stmt
            .query_map(
                params![utc_to_millis(range.start), utc_to_millis(range.end)],
                |row| {
                    Ok(DamageEvent {
                        id: EventId(row.get(0)?),
                        dealt_by_player_id: PlayerId(row.get(1)?),
                        received_by_player_id: PlayerId(row.get(2)?),
                        weapon_id: DimensionId(row.get(3)?),
                        body_part_id: DimensionId(row.get(4)?),
                        occurred_at: millis_to_utc(row.get(5)?),
                    })
                },
            )
            .context("failed querying damage events")?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row.context("failed decoding damage row")?);
        }
        Ok(out)
    }

    async fn ping(&self) -> StoreResult<()> {
        let conn = self.conn.lock().await;
        conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))
            .context("sqlite ping failed")?;
        Ok(())
    }
}
