use std::sync::Arc;

use anyhow::{anyhow, Result};
use tracing::debug;

use warlog_application::{AppState, Metrics};
use warlog_domain::ports::HealthCheckService;
use warlog_domain::services::{LineClassifier, NameDecoder};
use warlog_domain::EventRepository;
use warlog_infrastructure::{AppConfig, DefaultHealthService, SqliteRepository};

pub struct AppContext {
    pub state: AppState,
}

impl AppContext {
    /// Opens the server's store, creates the schema and checks it answers.
    pub async fn new(config: &AppConfig, server: &str) -> Result<Self> {
        let runtime_config = config.to_runtime_config(server)?;
        let db_config = config.to_db_config(server)?;

        let repo = Arc::new(SqliteRepository::open(&db_config)?);
        repo.ensure_schema().await?;
        let health = DefaultHealthService::new(repo.clone());
        if !health.check_database().await? {
            return Err(anyhow!("database {} is not available", db_config.database_path));
        }
        debug!(
            database = %db_config.database_path,
            dictionary = %db_config.dictionary_path,
            "storage ready"
        );

        let decoder = NameDecoder::for_label(&runtime_config.name_encoding)
            .ok_or_else(|| anyhow!("unknown name_encoding '{}'", runtime_config.name_encoding))?;

        let state = AppState {
            config: runtime_config,
            player_repo: repo.clone(),
            dimension_repo: repo.clone(),
            event_repo: repo,
            classifier: Arc::new(LineClassifier::new()?),
            decoder,
            metrics: Arc::new(Metrics::default()),
        };

        Ok(Self { state })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_in(dir: &std::path::Path) -> AppConfig {
        AppConfig {
            data_dir: dir.to_string_lossy().to_string(),
            ..AppConfig::default()
        }
    }

    #[tokio::test]
    async fn opens_store_for_configured_server() {
        let dir = std::env::temp_dir().join(format!("warlog-context-{}", std::process::id()));
        let config = config_in(&dir);
        let context = AppContext::new(&config, "main").await.expect("context");
        assert_eq!(context.state.config.server.name, "main");
        assert!(dir.join("srv_main.db").exists());
        assert!(dir.join("dictionary.db").exists());
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn unknown_server_is_rejected() {
        let dir = std::env::temp_dir().join(format!("warlog-context-bad-{}", std::process::id()));
        let err = AppContext::new(&config_in(&dir), "other")
            .await
            .err()
            .expect("unknown server");
        assert!(err.to_string().contains("unknown server 'other'"));
    }
}
