use std::path::Path;

use anyhow::{anyhow, Result};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use warlog_application::commands::{ingest_log_file, localize_dimension};
use warlog_domain::DimensionKind;
use warlog_infrastructure::{generate_daily_report, parse_day, AppConfig};

use crate::context::AppContext;

/// Stderr output plus a daily-rotated file when `log_dir` is configured.
/// The returned guard flushes the file writer on drop.
pub fn init_tracing(config: &AppConfig) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let stderr = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    let (file, guard) = match &config.log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let appender = tracing_appender::rolling::daily(dir, &config.log_file_prefix);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr)
        .with(file)
        .try_init()
        .map_err(|err| anyhow!("failed to install tracing subscriber: {}", err))?;
    Ok(guard)
}

pub async fn run_parse(config: &AppConfig, server: &str, log_file: &Path) -> Result<()> {
    let context = AppContext::new(config, server).await?;
    let state = context.state;
    ingest_log_file(&state, log_file).await?;
    info!("{}", state.metrics.render_summary());
    Ok(())
}

pub async fn run_report(config: &AppConfig, server: &str, day: &str, json: bool) -> Result<()> {
    let day = parse_day(day)?;
    let context = AppContext::new(config, server).await?;
    let state = context.state;
    let generated = generate_daily_report(&state, day).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&generated.report)?);
    }
    info!(
        "report for {} written to {}",
        day.format("%d.%m.%Y"),
        generated.path.display()
    );
    Ok(())
}

/// Dictionaries are shared across servers, so any configured server opens them.
pub async fn run_localize(config: &AppConfig, kind: &str, name: &str, localized: &str) -> Result<()> {
    let kind = DimensionKind::try_from(kind).map_err(|err| anyhow!(err))?;
    let server = config
        .servers
        .first()
        .map(|server| server.name.clone())
        .ok_or_else(|| anyhow!("no server configured"))?;
    let context = AppContext::new(config, &server).await?;
    localize_dimension(&context.state, kind, name, localized).await?;
    info!("{} '{}' localized", kind.as_str(), name.trim());
    Ok(())
}
