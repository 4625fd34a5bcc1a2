// Weapon and body-part dictionary rows

use serde::{Deserialize, Serialize};

use crate::value_objects::{DimensionId, DimensionKind};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimension {
    pub id: DimensionId,
    pub kind: DimensionKind,
    pub name: String,
    pub localized_name: Option<String>,
}

impl Dimension {
    /// Localized name when one was assigned, the source label otherwise.
    pub fn report_name(&self) -> &str {
        self.localized_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.name)
    }

    pub fn normalize_label(label: &str) -> String {
        label.trim().to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_name_prefers_localized() {
        let mut weapon = Dimension {
            id: DimensionId(1),
            kind: DimensionKind::Weapon,
            name: "m4a1".to_string(),
            localized_name: None,
        };
        assert_eq!(weapon.report_name(), "m4a1");
        weapon.localized_name = Some("  ".to_string());
        assert_eq!(weapon.report_name(), "m4a1");
        weapon.localized_name = Some("М4А1".to_string());
        assert_eq!(weapon.report_name(), "М4А1");
    }

    #[test]
    fn normalize_label_trims_and_lowercases() {
        assert_eq!(Dimension::normalize_label("  Head "), "head");
        assert_eq!(Dimension::normalize_label("AKM"), "akm");
    }
}
