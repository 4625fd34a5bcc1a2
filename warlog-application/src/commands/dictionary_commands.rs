use tracing::info;

use warlog_domain::{Dimension, DimensionKind};

use crate::{AppError, AppState};

/// Assigns the report name of a weapon or body part; a blank value clears it.
pub async fn localize_dimension(
    state: &AppState,
    kind: DimensionKind,
    name: &str,
    localized: &str,
) -> Result<(), AppError> {
    let key = Dimension::normalize_label(name);
    if key.is_empty() {
        return Err(AppError::BadRequest(format!("{} name is empty", kind.as_str())));
    }
    let localized = localized.trim();
    let value = (!localized.is_empty()).then_some(localized);
    let updated = state
        .dimension_repo
        .set_localized_name(kind, &key, value)
        .await?;
    if !updated {
        return Err(AppError::NotFound(format!("{} '{}'", kind.as_str(), key)));
    }
    info!(kind = kind.as_str(), name = %key, localized = ?value, "dictionary entry localized");
    Ok(())
}
