use std::cmp::Ordering;
use std::collections::HashMap;

use chrono::Duration;

use crate::entities::{DamageEvent, KillEvent, DEFAULT_CORRELATION_WINDOW_MS};
use crate::value_objects::PlayerId;

/// How far back from a kill a damage event may lie and still be its cause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CorrelationPolicy {
    pub window: Duration,
}

impl CorrelationPolicy {
    pub fn from_millis(window_ms: i64) -> Self {
        Self {
            window: Duration::milliseconds(window_ms.max(0)),
        }
    }
}

impl Default for CorrelationPolicy {
    fn default() -> Self {
        Self::from_millis(DEFAULT_CORRELATION_WINDOW_MS)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CorrelatedKill<'a> {
    pub kill: &'a KillEvent,
    pub damage: Option<&'a DamageEvent>,
}

/// Damage events grouped by `(dealer, receiver)`, each group sorted by time then id.
#[derive(Debug, Default)]
pub struct DamageIndex<'a> {
    by_pair: HashMap<(PlayerId, PlayerId), Vec<&'a DamageEvent>>,
}

impl<'a> DamageIndex<'a> {
    pub fn build(damages: &'a [DamageEvent]) -> Self {
        let mut by_pair: HashMap<(PlayerId, PlayerId), Vec<&'a DamageEvent>> = HashMap::new();
        for damage in damages {
            by_pair
                .entry((damage.dealt_by_player_id, damage.received_by_player_id))
                .or_default()
                .push(damage);
        }
        for group in by_pair.values_mut() {
            group.sort_by(|a, b| a.occurred_at.cmp(&b.occurred_at).then(a.id.cmp(&b.id)));
        }
        Self { by_pair }
    }

    /// Latest hit by the killer on the victim inside `[kill - window, kill]`;
    /// equal timestamps go to the most recently inserted row.
    pub fn lethal_for(&self, kill: &KillEvent, policy: &CorrelationPolicy) -> Option<&'a DamageEvent> {
        let group = self
            .by_pair
            .get(&(kill.killer_player_id, kill.killed_player_id))?;
        let upto = group.partition_point(|damage| damage.occurred_at <= kill.occurred_at);
        let candidate = *group.get(upto.checked_sub(1)?)?;
        if candidate.occurred_at >= kill.occurred_at - policy.window {
            Some(candidate)
        } else {
            None
        }
    }
}

/// Timeline order: time ascending, then victim id and killer id descending.
pub fn timeline_order(a: &KillEvent, b: &KillEvent) -> Ordering {
    a.occurred_at
        .cmp(&b.occurred_at)
        .then_with(|| b.killed_player_id.cmp(&a.killed_player_id))
        .then_with(|| b.killer_player_id.cmp(&a.killer_player_id))
}

pub fn correlate_kills<'a>(
    kills: &'a [KillEvent],
    damages: &'a [DamageEvent],
    policy: &CorrelationPolicy,
) -> Vec<CorrelatedKill<'a>> {
    let index = DamageIndex::build(damages);
    let mut ordered: Vec<&KillEvent> = kills.iter().collect();
    ordered.sort_by(|a, b| timeline_order(a, b));
    ordered
        .into_iter()
        .map(|kill| CorrelatedKill {
            kill,
            damage: index.lethal_for(kill, policy),
        })
        .collect()
}
