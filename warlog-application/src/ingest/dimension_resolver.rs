use std::sync::Arc;

use warlog_domain::ports::DimensionRepository;
use warlog_domain::{Dimension, DimensionKind, StoreError, StoreResult};

const MAX_ATTEMPTS: usize = 3;

/// Find-or-create for weapon and body-part labels.
pub struct DimensionResolver {
    repo: Arc<dyn DimensionRepository>,
}

impl DimensionResolver {
    pub fn new(repo: Arc<dyn DimensionRepository>) -> Self {
        Self { repo }
    }

    pub async fn resolve(&self, kind: DimensionKind, label: &str) -> StoreResult<Dimension> {
        let name = Dimension::normalize_label(label);
        let mut last_conflict = None;
        for _ in 0..MAX_ATTEMPTS {
            if let Some(existing) = self.repo.find_dimension(kind, &name).await? {
                return Ok(existing);
            }
            // Another writer may create the row between find and insert.
            match self.repo.insert_dimension(kind, &name).await {
                Ok(created) => return Ok(created),
                Err(StoreError::Conflict(reason)) => last_conflict = Some(reason),
                Err(err) => return Err(err),
            }
        }
        Err(StoreError::Conflict(last_conflict.unwrap_or_else(|| {
            format!("{} '{}' could not be resolved", kind.as_str(), name)
        })))
    }
}
