use chrono::{Duration, FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_CORRELATION_WINDOW_MS: i64 = 3_000;
pub const DEFAULT_UNKNOWN_LABEL: &str = "unknown";
pub const DEFAULT_NAME_ENCODING: &str = "windows-1251";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServerProfile {
    pub name: String,
    #[serde(default)]
    pub full_name: String,
}

impl ServerProfile {
    /// Storage partition used for this server's players and events.
    pub fn schema_name(&self) -> String {
        format!("srv_{}", self.name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportLanguage {
    En,
    Ru,
}

impl ReportLanguage {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "en" | "english" => Some(ReportLanguage::En),
            "ru" | "russian" => Some(ReportLanguage::Ru),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub server: ServerProfile,
    pub report_dir: String,
    pub report_language: ReportLanguage,
    pub unknown_label: String,
    pub name_encoding: String,
    pub utc_offset_minutes: i32,
    pub correlation_window_ms: i64,
}

impl RuntimeConfig {
    /// Offset applied to log wall-clock times and report day boundaries.
    pub fn utc_offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_minutes * 60).unwrap_or_else(|| Utc.fix())
    }

    pub fn correlation_window(&self) -> Duration {
        Duration::milliseconds(self.correlation_window_ms)
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            server: ServerProfile {
                name: "main".to_string(),
                full_name: "Main".to_string(),
            },
            report_dir: "./reports".to_string(),
            report_language: ReportLanguage::En,
            unknown_label: DEFAULT_UNKNOWN_LABEL.to_string(),
            name_encoding: DEFAULT_NAME_ENCODING.to_string(),
            utc_offset_minutes: 0,
            correlation_window_ms: DEFAULT_CORRELATION_WINDOW_MS,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DbConfig {
    pub database_path: String,
    pub dictionary_path: String,
}
