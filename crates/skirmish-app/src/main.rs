//! skirmish: run an arena battle headlessly and log it.
//!
//! Usage:
//!   skirmish [--config <path>] [--seed <n>]
//!
//! Set `RUST_LOG=debug` for per-event output.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::info;

use skirmish_app::core::commands::ControlSignal;
use skirmish_app::game_loop::spawn_game_loop;
use skirmish_app::settings::Settings;
use skirmish_app::sink::LogSink;

fn main() -> Result<()> {
    init_tracing()?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_usage();
        return Ok(());
    }

    let mut settings = match parse_config(&args) {
        Some(path) => Settings::load(&path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => Settings::default(),
    };
    if let Some(seed) = parse_seed(&args)? {
        settings.seed = Some(seed);
    }

    info!(
        fighters = settings.simulation.fighter_count,
        avatars = settings.avatars,
        seed = ?settings.seed,
        "Starting skirmish"
    );

    let handle = spawn_game_loop(&settings, LogSink::new(settings.log_every_frames))?;
    handle.send(ControlSignal::Start)?;
    let reason = handle.join()?;

    match reason {
        Some(reason) => info!(?reason, "Skirmish over"),
        None => info!("Game loop exited before the run finished"),
    }
    Ok(())
}

fn init_tracing() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init()
        .map_err(|err| anyhow::anyhow!(err))
}

fn print_usage() {
    eprintln!(
        "Usage: skirmish [--config <path>] [--seed <n>]

Options:
  --config <path>  TOML settings file (defaults are used when omitted)
  --seed <n>       RNG seed; overrides the settings file"
    );
}

fn parse_config(args: &[String]) -> Option<PathBuf> {
    for i in 0..args.len() {
        if args[i] == "--config" && i + 1 < args.len() {
            return Some(PathBuf::from(&args[i + 1]));
        }
    }
    None
}

fn parse_seed(args: &[String]) -> Result<Option<u64>> {
    for i in 0..args.len() {
        if args[i] == "--seed" && i + 1 < args.len() {
            let seed = args[i + 1]
                .parse::<u64>()
                .with_context(|| format!("--seed expects an unsigned integer, got {}", args[i + 1]))?;
            return Ok(Some(seed));
        }
    }
    Ok(None)
}
