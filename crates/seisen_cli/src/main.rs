//! Desktop host for the Seisen core.
//!
//! # Responsibility
//! - Print the core version and the note selected at startup.
//! - With `watch`, keep delivering the current note as a desktop
//!   notification every configured interval until Ctrl-C.
//!
//! # Invariants
//! - Unknown arguments are rejected before any storage is touched.
//! - `--config` replaces the `SEISEN_*` environment as the config source;
//!   explicit flags override either.

mod notifier;

use clap::{Parser, Subcommand};
use log::info;
use notifier::DesktopNotifier;
use seisen_core::{
    init_logging_for, spawn_session, ConfigError, DefaultRandomSource, FileNoteStore,
    NotificationScheduler, SeisenConfig, SessionController, SessionOptions,
};
use std::path::PathBuf;
use std::process::ExitCode;

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

const SESSION_QUEUE_CAPACITY: usize = 16;

#[derive(Parser, Debug)]
#[command(author, version, about = "🧘 seisen - Sensei notes on your desktop")]
struct Cli {
    /// JSON config file; defaults come from `SEISEN_*` variables otherwise.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Folder holding the category note files.
    #[arg(long, global = true)]
    notes_dir: Option<PathBuf>,
    /// Absolute folder for rolling log files; logging stays off without it.
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Command {
    /// Deliver the current note as a desktop notification every interval.
    Watch {
        /// Seconds between notifications.
        #[arg(short, long, value_parser = clap::value_parser!(u64).range(1..))]
        interval: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("seisen error={err}");
            ExitCode::FAILURE
        }
    }
}

fn resolve_config(cli: &Cli) -> std::result::Result<SeisenConfig, ConfigError> {
    let mut config = match &cli.config {
        Some(path) => SeisenConfig::load(path)?,
        None => SeisenConfig::from_env()?,
    };
    if let Some(dir) = &cli.notes_dir {
        config.notes_dir = dir.clone();
    }
    if let Some(Command::Watch {
        interval: Some(secs),
    }) = &cli.command
    {
        config.notification_interval_secs = *secs;
    }
    config.validate()?;
    Ok(config)
}

async fn run(cli: Cli) -> Result<()> {
    let config = resolve_config(&cli)?;
    if let Some(log_dir) = &cli.log_dir {
        init_logging_for(&config, log_dir)?;
    }

    println!("seisen_core ping={}", seisen_core::ping());
    println!("seisen_core version={}", seisen_core::core_version());
    println!("seisen notes_dir={}", config.notes_dir.display());

    let controller = SessionController::new(
        FileNoteStore::new(&config.notes_dir),
        DefaultRandomSource::from_entropy(),
        SessionOptions::from(&config),
    );
    let session = spawn_session(controller, SESSION_QUEUE_CAPACITY);
    let state = session.initialize().await?;
    println!(
        "seisen category={} note={}",
        state.active_category.display_name(),
        state.current_note
    );

    if let Some(Command::Watch { .. }) = cli.command {
        let mut scheduler = NotificationScheduler::start(
            config.notification_interval(),
            config.notification_title.clone(),
            session.clone(),
            DesktopNotifier::new("seisen"),
        )?;
        println!(
            "seisen watching interval_secs={} (Ctrl-C to stop)",
            config.notification_interval_secs
        );
        tokio::signal::ctrl_c().await?;
        scheduler.stop();
        info!("event=cli_watch module=cli status=stopped reason=ctrl_c");
    }

    session.shutdown().await?;
    Ok(())
}
