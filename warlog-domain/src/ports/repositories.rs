use std::collections::HashMap;

use async_trait::async_trait;

use crate::entities::{
    DamageEvent,
    Dimension,
    InsertOutcome,
    KillEvent,
    NewDamageEvent,
    NewKillEvent,
    NewSessionEvent,
    Player,
};
use crate::error::StoreResult;
use crate::utils::TimeRange;
use crate::value_objects::{DimensionId, DimensionKind, PlayerId};

#[async_trait]
pub trait PlayerRepository: Send + Sync {
    async fn find_player(&self, id: PlayerId) -> StoreResult<Option<Player>>;
    /// Fails with `StoreError::Conflict` when the id is already taken.
    async fn insert_player(&self, player: &Player) -> StoreResult<()>;
    async fn rename_player(&self, id: PlayerId, display_name: &str) -> StoreResult<()>;
    async fn fetch_players(&self, ids: &[PlayerId]) -> StoreResult<HashMap<PlayerId, Player>>;
}

#[async_trait]
pub trait DimensionRepository: Send + Sync {
    async fn find_dimension(&self, kind: DimensionKind, name: &str) -> StoreResult<Option<Dimension>>;
    /// Fails with `StoreError::Conflict` when the name already exists.
    async fn insert_dimension(&self, kind: DimensionKind, name: &str) -> StoreResult<Dimension>;
    /// Returns false when no row carries `name`.
    async fn set_localized_name(
        &self,
        kind: DimensionKind,
        name: &str,
        localized_name: Option<&str>,
    ) -> StoreResult<bool>;
    async fn fetch_dimensions(
        &self,
        kind: DimensionKind,
        ids: &[DimensionId],
    ) -> StoreResult<HashMap<DimensionId, Dimension>>;
}

#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn ensure_schema(&self) -> StoreResult<()>;
    async fn insert_session_event(&self, event: &NewSessionEvent) -> StoreResult<InsertOutcome>;
    async fn insert_kill_event(&self, event: &NewKillEvent) -> StoreResult<InsertOutcome>;
    async fn insert_damage_event(&self, event: &NewDamageEvent) -> StoreResult<InsertOutcome>;
    async fn fetch_kill_events(&self, range: &TimeRange) -> StoreResult<Vec<KillEvent>>;
    async fn fetch_damage_events(&self, range: &TimeRange) -> StoreResult<Vec<DamageEvent>>;
    async fn ping(&self) -> StoreResult<()>;
}
