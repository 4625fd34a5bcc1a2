// Dimension kind value object

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DimensionKind {
    Weapon,
    BodyPart,
}

impl DimensionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DimensionKind::Weapon => "weapon",
            DimensionKind::BodyPart => "body-part",
        }
    }
}

impl TryFrom<&str> for DimensionKind {
    type Error = String;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "weapon" => Ok(DimensionKind::Weapon),
            "body-part" | "bodypart" => Ok(DimensionKind::BodyPart),
            other => Err(format!("unknown dimension kind '{}'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_cli_spellings() {
        assert_eq!(DimensionKind::try_from("Weapon"), Ok(DimensionKind::Weapon));
        assert_eq!(DimensionKind::try_from("body_part"), Ok(DimensionKind::BodyPart));
        assert_eq!(DimensionKind::try_from("body-part"), Ok(DimensionKind::BodyPart));
        assert!(DimensionKind::try_from("vehicle").is_err());
    }
}
