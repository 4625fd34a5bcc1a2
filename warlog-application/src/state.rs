use std::sync::Arc;

use warlog_domain::ports::{DimensionRepository, EventRepository, PlayerRepository};
use warlog_domain::services::{CorrelationPolicy, LineClassifier, NameDecoder};
use warlog_domain::RuntimeConfig;

use crate::Metrics;

#[derive(Clone)]
pub struct AppState {
    pub config: RuntimeConfig,
    pub player_repo: Arc<dyn PlayerRepository>,
    pub dimension_repo: Arc<dyn DimensionRepository>,
    pub event_repo: Arc<dyn EventRepository>,
    pub classifier: Arc<LineClassifier>,
    pub decoder: NameDecoder,
    pub metrics: Arc<Metrics>,
}

impl AppState {
    pub fn correlation_policy(&self) -> CorrelationPolicy {
        CorrelationPolicy::from_millis(self.config.correlation_window_ms)
    }
}
