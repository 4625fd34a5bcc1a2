use std::env;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use serde::Deserialize;
use tokio::fs;

use warlog_domain::services::NameDecoder;
use warlog_domain::{
    DbConfig, ReportLanguage, RuntimeConfig, ServerProfile, DEFAULT_CORRELATION_WINDOW_MS,
    DEFAULT_NAME_ENCODING, DEFAULT_UNKNOWN_LABEL,
};

use crate::config::validation::validate_server_name;

const CONFIG_ENV: &str = "WARLOG_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "./config.toml";

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AppConfig {
    pub data_dir: String,
    pub dictionary_db: String,
    pub report_dir: String,
    pub log_dir: Option<String>,
    pub log_file_prefix: String,
    pub name_encoding: String,
    pub utc_offset_minutes: i32,
    pub correlation_window_ms: i64,
    pub unknown_label: String,
    pub report_language: String,
    pub servers: Vec<ServerProfile>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: "./data".to_string(),
            dictionary_db: "dictionary.db".to_string(),
            report_dir: "./reports".to_string(),
            log_dir: None,
            log_file_prefix: "warlog.log".to_string(),
            name_encoding: DEFAULT_NAME_ENCODING.to_string(),
            utc_offset_minutes: 0,
            correlation_window_ms: DEFAULT_CORRELATION_WINDOW_MS,
            unknown_label: DEFAULT_UNKNOWN_LABEL.to_string(),
            report_language: "en".to_string(),
            servers: vec![ServerProfile {
                name: "main".to_string(),
                full_name: "Main".to_string(),
            }],
        }
    }
}

/// Where the effective configuration came from, reported once logging is up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOrigin {
    File(PathBuf),
    Defaults(PathBuf),
}

impl AppConfig {
    /// Reads `explicit`, else `$WARLOG_CONFIG`, else `./config.toml`.
    /// A missing file yields defaults; env overrides apply either way.
    pub async fn load(explicit: Option<&Path>) -> Result<(Self, ConfigOrigin)> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => PathBuf::from(
                env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string()),
            ),
        };
        let base_dir = path.parent().map(Path::to_path_buf);

        let (mut config, origin) = if path.exists() {
            let content = fs::read_to_string(&path)
                .await
                .map_err(|err| anyhow!("failed to read {}: {}", path.display(), err))?;
            let config: AppConfig = toml::from_str(&content)
                .map_err(|err| anyhow!("invalid config {}: {}", path.display(), err))?;
            (config, ConfigOrigin::File(path))
        } else {
            (AppConfig::default(), ConfigOrigin::Defaults(path))
        };
        config.apply_env_overrides();
        config.resolve_paths(base_dir.as_deref());
        config.normalize();
        config.validate()?;
        Ok((config, origin))
    }

    pub fn normalize(&mut self) {
        if let Some(log_dir) = &self.log_dir {
            if log_dir.trim().is_empty() {
                self.log_dir = None;
            }
        }
        if self.log_file_prefix.trim().is_empty() {
            self.log_file_prefix = AppConfig::default().log_file_prefix;
        }
        if self.unknown_label.trim().is_empty() {
            self.unknown_label = DEFAULT_UNKNOWN_LABEL.to_string();
        }
        self.name_encoding = self.name_encoding.trim().to_string();
        self.report_language = self.report_language.trim().to_lowercase();
        for server in &mut self.servers {
            server.name = server.name.trim().to_string();
            server.full_name = server.full_name.trim().to_string();
            if server.full_name.is_empty() {
                server.full_name = server.name.clone();
            }
        }
    }

    fn resolve_paths(&mut self, base_dir: Option<&Path>) {
        let Some(base) = base_dir else {
            return;
        };
        self.data_dir = resolve_path(base, &self.data_dir);
        self.report_dir = resolve_path(base, &self.report_dir);
        if let Some(log_dir) = &self.log_dir {
            self.log_dir = Some(resolve_path(base, log_dir));
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.data_dir.trim().is_empty() {
            return Err(anyhow!("data_dir must not be empty"));
        }
        if self.dictionary_db.trim().is_empty() {
            return Err(anyhow!("dictionary_db must not be empty"));
        }
        if NameDecoder::for_label(&self.name_encoding).is_none() {
            return Err(anyhow!("unknown name_encoding '{}'", self.name_encoding));
        }
        if ReportLanguage::parse(&self.report_language).is_none() {
            return Err(anyhow!(
                "report_language must be 'en' or 'ru', got '{}'",
                self.report_language
            ));
        }
        if !(-14 * 60..=14 * 60).contains(&self.utc_offset_minutes) {
            return Err(anyhow!("utc_offset_minutes out of range"));
        }
        if self.correlation_window_ms < 0 {
            return Err(anyhow!("correlation_window_ms must not be negative"));
        }
        if self.servers.is_empty() {
            return Err(anyhow!("at least one server must be configured"));
        }
        for (index, server) in self.servers.iter().enumerate() {
            validate_server_name(&server.name)?;
            if self.servers[..index].iter().any(|s| s.name == server.name) {
                return Err(anyhow!("duplicate server name '{}'", server.name));
            }
        }
        Ok(())
    }

    pub fn server(&self, name: &str) -> Result<&ServerProfile> {
        self.servers
            .iter()
            .find(|server| server.name == name.trim())
            .ok_or_else(|| {
                let known: Vec<&str> = self.servers.iter().map(|s| s.name.as_str()).collect();
                anyhow!("unknown server '{}', configured: {}", name, known.join(", "))
            })
    }

    pub fn to_runtime_config(&self, server: &str) -> Result<RuntimeConfig> {
        let server = self.server(server)?.clone();
        Ok(RuntimeConfig {
            server,
            report_dir: self.report_dir.clone(),
            report_language: ReportLanguage::parse(&self.report_language)
                .unwrap_or(ReportLanguage::En),
            unknown_label: self.unknown_label.clone(),
            name_encoding: self.name_encoding.clone(),
            utc_offset_minutes: self.utc_offset_minutes,
            correlation_window_ms: self.correlation_window_ms,
        })
    }

    pub fn to_db_config(&self, server: &str) -> Result<DbConfig> {
        let server = self.server(server)?;
        let data_dir = Path::new(&self.data_dir);
        let dictionary = Path::new(self.dictionary_db.trim());
        let dictionary_path = if dictionary.is_absolute() {
            dictionary.to_path_buf()
        } else {
            data_dir.join(dictionary)
        };
        Ok(DbConfig {
            database_path: data_dir
                .join(format!("{}.db", server.schema_name()))
                .to_string_lossy()
                .to_string(),
            dictionary_path: dictionary_path.to_string_lossy().to_string(),
        })
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(value) = env::var("WARLOG_DATA_DIR") {
            self.data_dir = value;
        }
        if let Ok(value) = env::var("WARLOG_DICTIONARY_DB") {
            self.dictionary_db = value;
        }
        if let Ok(value) = env::var("WARLOG_REPORT_DIR") {
            self.report_dir = value;
        }
        if let Ok(value) = env::var("WARLOG_LOG_DIR") {
            self.log_dir = Some(value);
        }
        if let Ok(value) = env::var("WARLOG_LOG_FILE_PREFIX") {
            self.log_file_prefix = value;
        }
        if let Ok(value) = env::var("WARLOG_NAME_ENCODING") {
            self.name_encoding = value;
        }
        if let Ok(value) = env::var("WARLOG_UTC_OFFSET_MINUTES") {
            self.utc_offset_minutes = value.parse().unwrap_or(self.utc_offset_minutes);
        }
        if let Ok(value) = env::var("WARLOG_CORRELATION_WINDOW_MS") {
            self.correlation_window_ms = value.parse().unwrap_or(self.correlation_window_ms);
        }
        if let Ok(value) = env::var("WARLOG_UNKNOWN_LABEL") {
            self.unknown_label = value;
        }
        if let Ok(value) = env::var("WARLOG_REPORT_LANGUAGE") {
            self.report_language = value;
        }
    }
}

fn resolve_path(base: &Path, value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return trimmed.to_string();
    }
    let path = Path::new(trimmed);
    if path.is_absolute() {
        trimmed.to_string()
    } else {
        base.join(path).to_string_lossy().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parsed(text: &str) -> AppConfig {
        let mut config: AppConfig = toml::from_str(text).expect("toml");
        config.normalize();
        config
    }

    #[test]
    fn defaults_are_valid() {
        AppConfig::default().validate().expect("defaults validate");
    }

    #[test]
    fn servers_and_paths_from_file() {
        let config = parsed(
            r#"
            data_dir = "/var/lib/warlog"
            utc_offset_minutes = 180
            report_language = "RU"

            [[servers]]
            name = "chern"
            full_name = "Chernarus PvP"

            [[servers]]
            name = "livonia"
            full_name = ""
            "#,
        );
        config.validate().expect("validate");
        assert_eq!(config.servers[1].full_name, "livonia");

        let runtime = config.to_runtime_config("chern").expect("runtime");
        assert_eq!(runtime.server.full_name, "Chernarus PvP");
        assert_eq!(runtime.report_language, ReportLanguage::Ru);
        assert_eq!(runtime.utc_offset().local_minus_utc(), 180 * 60);

        let db = config.to_db_config("chern").expect("db");
        assert_eq!(db.database_path, "/var/lib/warlog/srv_chern.db");
        assert_eq!(db.dictionary_path, "/var/lib/warlog/dictionary.db");
    }

    #[test]
    fn unknown_server_lists_configured_names() {
        let config = AppConfig::default();
        let err = config.to_runtime_config("nope").expect_err("unknown server");
        assert!(err.to_string().contains("configured: main"));
    }

    #[test]
    fn rejects_bad_values() {
        let duplicate = parsed(
            r#"
            [[servers]]
            name = "a"
            full_name = "A"
            [[servers]]
            name = "a"
            full_name = "B"
            "#,
        );
        assert!(duplicate.validate().is_err());

        let mut config = AppConfig::default();
        config.name_encoding = "klingon".to_string();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.correlation_window_ms = -1;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.servers.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn relative_paths_follow_config_file() {
        let mut config = AppConfig::default();
        config.log_dir = Some("logs".to_string());
        config.resolve_paths(Some(Path::new("/etc/warlog")));
        assert_eq!(config.data_dir, "/etc/warlog/./data");
        assert_eq!(config.log_dir.as_deref(), Some("/etc/warlog/logs"));
    }
}
