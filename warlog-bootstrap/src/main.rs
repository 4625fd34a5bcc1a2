use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{error, info, warn};

use warlog_bootstrap::lifecycle::{init_tracing, run_localize, run_parse, run_report};
use warlog_infrastructure::{AppConfig, ConfigOrigin};

#[derive(Parser, Debug)]
#[command(name = "warlog")]
#[command(about = "DayZ admin log kill and damage tracker", long_about = None)]
struct Args {
    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Ingest an admin log into the server's database
    Parse { log_file: PathBuf, server: String },
    /// Write the daily kill report (DAY is DD.MM.YYYY or YYYY-MM-DD)
    Report {
        day: String,
        server: String,
        /// Also print the report as JSON on stdout
        #[arg(long)]
        json: bool,
    },
    /// Set the report name of a weapon or body part
    Localize {
        #[arg(value_parser = ["weapon", "body-part"])]
        kind: String,
        name: String,
        localized: String,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();
    let (config, origin) = AppConfig::load(args.config.as_deref()).await?;
    let _guard = init_tracing(&config)?;
    match &origin {
        ConfigOrigin::File(path) => info!("config loaded from {}", path.display()),
        ConfigOrigin::Defaults(path) => warn!("{} not found, using defaults", path.display()),
    }

    let result = match args.command {
        Command::Parse { log_file, server } => run_parse(&config, &server, &log_file).await,
        Command::Report { day, server, json } => run_report(&config, &server, &day, json).await,
        Command::Localize {
            kind,
            name,
            localized,
        } => run_localize(&config, &kind, &name, &localized).await,
    };
    if let Err(err) = &result {
        error!("{:#}", err);
    }
    result
}
