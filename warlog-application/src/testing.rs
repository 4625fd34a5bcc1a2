// In-memory ports for application tests

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use warlog_domain::ports::{DimensionRepository, EventRepository, PlayerRepository};
use warlog_domain::services::{LineClassifier, NameDecoder};
use warlog_domain::{
    DamageEvent, Dimension, DimensionId, DimensionKind, EventId, InsertOutcome, KillEvent,
    NewDamageEvent, NewKillEvent, NewSessionEvent, Player, PlayerId, RuntimeConfig, StoreError,
    StoreResult, TimeRange,
};

use crate::{AppState, Metrics};

#[derive(Default)]
struct Inner {
    players: HashMap<PlayerId, Player>,
    renames: usize,
    dimensions: Vec<Dimension>,
    sessions: Vec<NewSessionEvent>,
    kills: Vec<KillEvent>,
    damages: Vec<DamageEvent>,
    next_event_id: i64,
    player_race: Option<Player>,
    dimension_race: bool,
}

impl Inner {
    fn next_id(&mut self) -> EventId {
        self.next_event_id += 1;
        EventId(self.next_event_id)
    }

    fn push_dimension(&mut self, kind: DimensionKind, name: &str) -> Dimension {
        let dimension = Dimension {
            id: DimensionId(self.dimensions.len() as i64 + 1),
            kind,
            name: name.to_string(),
            localized_name: None,
        };
        self.dimensions.push(dimension.clone());
        dimension
    }
}

/// Players, dictionaries and events kept in memory with the same
/// uniqueness rules the storage backend enforces.
#[derive(Default)]
pub struct MemoryRepository {
    inner: Mutex<Inner>,
}

impl MemoryRepository {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().expect("memory repository lock")
    }

    pub fn player_count(&self) -> usize {
        self.lock().players.len()
    }

    pub fn rename_count(&self) -> usize {
        self.lock().renames
    }

    pub fn dimension_count(&self, kind: DimensionKind) -> usize {
        self.lock().dimensions.iter().filter(|d| d.kind == kind).count()
    }

    pub fn session_count(&self) -> usize {
        self.lock().sessions.len()
    }

    pub fn kills(&self) -> Vec<KillEvent> {
        self.lock().kills.clone()
    }

    pub fn damages(&self) -> Vec<DamageEvent> {
        self.lock().damages.clone()
    }

    /// Row counts of every table, for comparing before and after a run.
    pub fn fingerprint(&self) -> (usize, usize, usize, usize, usize) {
        let inner = self.lock();
        (
            inner.players.len(),
            inner.dimensions.len(),
            inner.sessions.len(),
            inner.kills.len(),
            inner.damages.len(),
        )
    }

    /// The next player insert loses a race against `winner`.
    pub fn fail_next_player_insert_with_race(&self, winner: Player) {
        self.lock().player_race = Some(winner);
    }

    /// The next dimension insert loses a race against an identical insert.
    pub fn fail_next_dimension_insert_with_race(&self) {
        self.lock().dimension_race = true;
    }

    pub fn seed_player(&self, id: i64, name: &str) {
        let player = Player::new(PlayerId(id), name);
        self.lock().players.insert(player.id, player);
    }

    pub fn seed_kill(&self, killed: i64, killer: i64, at: DateTime<Utc>) -> EventId {
        let mut inner = self.lock();
        let id = inner.next_id();
        inner.kills.push(KillEvent {
            id,
            killed_player_id: PlayerId(killed),
            killer_player_id: PlayerId(killer),
            occurred_at: at,
        });
        id
    }

    pub fn seed_damage(
        &self,
        dealer: i64,
        receiver: i64,
        weapon: DimensionId,
        body_part: DimensionId,
        at: DateTime<Utc>,
    ) -> EventId {
        let mut inner = self.lock();
        let id = inner.next_id();
        inner.damages.push(DamageEvent {
            id,
            dealt_by_player_id: PlayerId(dealer),
            received_by_player_id: PlayerId(receiver),
            weapon_id: weapon,
            body_part_id: body_part,
            occurred_at: at,
        });
        id
    }

    pub fn seed_dimension(&self, kind: DimensionKind, name: &str) -> DimensionId {
        self.lock().push_dimension(kind, name).id
    }
}

#[async_trait]
impl PlayerRepository for MemoryRepository {
    async fn find_player(&self, id: PlayerId) -> StoreResult<Option<Player>> {
        Ok(self.lock().players.get(&id).cloned())
    }

    async fn insert_player(&self, player: &Player) -> StoreResult<()> {
        let mut inner = self.lock();
        if let Some(winner) = inner.player_race.take() {
            inner.players.insert(winner.id, winner);
            return Err(StoreError::Conflict(format!("player {}", player.id)));
        }
        if inner.players.contains_key(&player.id) {
            return Err(StoreError::Conflict(format!("player {}", player.id)));
        }
        inner.players.insert(player.id, player.clone());
        Ok(())
    }

    async fn rename_player(&self, id: PlayerId, display_name: &str) -> StoreResult<()> {
        let mut inner = self.lock();
        if let Some(player) = inner.players.get_mut(&id) {
            player.display_name = display_name.to_string();
            inner.renames += 1;
        }
        Ok(())
    }

    async fn fetch_players(&self, ids: &[PlayerId]) -> StoreResult<HashMap<PlayerId, Player>> {
        let inner = self.lock();
        Ok(ids
            .iter()
            .filter_map(|id| inner.players.get(id).map(|p| (*id, p.clone())))
            .collect())
    }
}

#[async_trait]
impl DimensionRepository for MemoryRepository {
    async fn find_dimension(&self, kind: DimensionKind, name: &str) -> StoreResult<Option<Dimension>> {
        Ok(self
            .lock()
            .dimensions
            .iter()
            .find(|d| d.kind == kind && d.name == name)
            .cloned())
    }

    async fn insert_dimension(&self, kind: DimensionKind, name: &str) -> StoreResult<Dimension> {
        let mut inner = self.lock();
        if std::mem::take(&mut inner.dimension_race) {
            inner.push_dimension(kind, name);
            return Err(StoreError::Conflict(format!("{} {}", kind.as_str(), name)));
        }
        if inner.dimensions.iter().any(|d| d.kind == kind && d.name == name) {
            return Err(StoreError::Conflict(format!("{} {}", kind.as_str(), name)));
        }
        Ok(inner.push_dimension(kind, name))
    }

    async fn set_localized_name(
        &self,
        kind: DimensionKind,
        name: &str,
        localized_name: Option<&str>,
    ) -> StoreResult<bool> {
        let mut inner = self.lock();
        match inner
            .dimensions
            .iter_mut()
            .find(|d| d.kind == kind && d.name == name)
        {
            Some(row) => {
                row.localized_name = localized_name.map(str::to_string);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn fetch_dimensions(
        &self,
        kind: DimensionKind,
        ids: &[DimensionId],
    ) -> StoreResult<HashMap<DimensionId, Dimension>> {
        Ok(self
            .lock()
            .dimensions
            .iter()
            .filter(|d| d.kind == kind && ids.contains(&d.id))
            .map(|d| (d.id, d.clone()))
            .collect())
    }
}

#[async_trait]
impl EventRepository for MemoryRepository {
    async fn ensure_schema(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn insert_session_event(&self, event: &NewSessionEvent) -> StoreResult<InsertOutcome> {
        let mut inner = self.lock();
        if inner.sessions.contains(event) {
            return Ok(InsertOutcome::AlreadyPresent);
        }
        inner.sessions.push(event.clone());
        let id = inner.next_id();
        Ok(InsertOutcome::Inserted(id))
    }

    async fn insert_kill_event(&self, event: &NewKillEvent) -> StoreResult<InsertOutcome> {
        let mut inner = self.lock();
        let exists = inner.kills.iter().any(|k| {
            k.killed_player_id == event.killed_player_id
                && k.killer_player_id == event.killer_player_id
                && k.occurred_at == event.occurred_at
        });
        if exists {
            return Ok(InsertOutcome::AlreadyPresent);
        }
        let id = inner.next_id();
        inner.kills.push(KillEvent {
            id,
            killed_player_id: event.killed_player_id,
            killer_player_id: event.killer_player_id,
            occurred_at: event.occurred_at,
        });
        Ok(InsertOutcome::Inserted(id))
    }

    async fn insert_damage_event(&self, event: &NewDamageEvent) -> StoreResult<InsertOutcome> {
        let mut inner = self.lock();
        let exists = inner.damages.iter().any(|d| {
            d.dealt_by_player_id == event.dealt_by_player_id
                && d.received_by_player_id == event.received_by_player_id
                && d.weapon_id == event.weapon_id
                && d.body_part_id == event.body_part_id
                && d.occurred_at == event.occurred_at
        });
        if exists {
            return Ok(InsertOutcome::AlreadyPresent);
        }
        let id = inner.next_id();
        inner.damages.push(DamageEvent {
            id,
            dealt_by_player_id: event.dealt_by_player_id,
            received_by_player_id: event.received_by_player_id,
            weapon_id: event.weapon_id,
            body_part_id: event.body_part_id,
            occurred_at: event.occurred_at,
        });
        Ok(InsertOutcome::Inserted(id))
    }

    async fn fetch_kill_events(&self, range: &TimeRange) -> StoreResult<Vec<KillEvent>> {
        Ok(self
            .lock()
            .kills
            .iter()
            .filter(|k| range.contains(k.occurred_at))
            .cloned()
            .collect())
    }

    async fn fetch_damage_events(&self, range: &TimeRange) -> StoreResult<Vec<DamageEvent>> {
        Ok(self
            .lock()
            .damages
            .iter()
            .filter(|d| range.contains(d.occurred_at))
            .cloned()
            .collect())
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}

pub fn state_with(repo: Arc<MemoryRepository>) -> AppState {
    state_with_config(repo, RuntimeConfig::default())
}

pub fn state_with_config(repo: Arc<MemoryRepository>, config: RuntimeConfig) -> AppState {
    AppState {
        config,
        player_repo: repo.clone(),
        dimension_repo: repo.clone(),
        event_repo: repo,
        classifier: Arc::new(LineClassifier::new().expect("patterns compile")),
        decoder: NameDecoder::default(),
        metrics: Arc::new(Metrics::default()),
    }
}
