//! taskscreen - a 3D TODO board on a virtual screen, driven headless
//!
//! Main executable: loads configuration, assembles the board, and replays a
//! pointer script (the built-in demo unless one is given).

mod config;
mod script;
mod session;

use anyhow::Result;
use config::BoardConfig;
use script::ScriptPlayer;
use session::SessionOptions;
use std::{env, path::PathBuf};
use taskscreen_board::Board;
use tracing::info;

#[derive(Debug, Default)]
struct CliOptions {
    config: Option<PathBuf>,
    script: Option<PathBuf>,
    event_log: Option<PathBuf>,
    max_ticks: Option<u64>,
    viewport: Option<(u32, u32)>,
    write_config: Option<PathBuf>,
    help: bool,
}

impl CliOptions {
    fn parse(mut args: impl Iterator<Item = String>) -> Result<Self> {
        let mut options = Self::default();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" => options.config = Some(next_value(&mut args, "--config")?.into()),
                "--script" => options.script = Some(next_value(&mut args, "--script")?.into()),
                "--event-log" => {
                    options.event_log = Some(next_value(&mut args, "--event-log")?.into())
                }
                "--max-ticks" => {
                    options.max_ticks = Some(next_value(&mut args, "--max-ticks")?.parse()?)
                }
                "--viewport" => {
                    options.viewport = Some(parse_viewport(&next_value(&mut args, "--viewport")?)?)
                }
                "--write-config" => {
                    options.write_config = Some(next_value(&mut args, "--write-config")?.into())
                }
                "--help" | "-h" => options.help = true,
                other => anyhow::bail!("unknown argument: {other}"),
            }
        }
        Ok(options)
    }
}

fn next_value(args: &mut impl Iterator<Item = String>, flag: &str) -> Result<String> {
    args.next()
        .ok_or_else(|| anyhow::anyhow!("{flag} requires a value"))
}

fn parse_viewport(value: &str) -> Result<(u32, u32)> {
    let (width, height) = value
        .split_once('x')
        .ok_or_else(|| anyhow::anyhow!("--viewport expects WIDTHxHEIGHT, got {value}"))?;
    Ok((width.parse()?, height.parse()?))
}

fn print_usage() {
    println!("taskscreen - a 3D TODO board driven by scripted pointer sessions");
    println!();
    println!("Usage: taskscreen [options]");
    println!("  --config PATH        board configuration (TOML)");
    println!("  --script PATH        pointer script (JSON); defaults to the built-in demo");
    println!("  --event-log PATH     write interaction events as JSONL");
    println!("  --max-ticks N        hard cap on session length (default 3600)");
    println!("  --viewport WxH       viewport size in pixels");
    println!("  --write-config PATH  write the default configuration and exit");
    println!("  --help               show this help");
}

fn main() -> Result<()> {
    // Initialize tracing with INFO level by default (can be overridden via RUST_LOG env var)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Starting taskscreen v{}", env!("CARGO_PKG_VERSION"));

    let cli = CliOptions::parse(env::args().skip(1))?;
    if cli.help {
        print_usage();
        return Ok(());
    }

    if let Some(path) = cli.write_config {
        BoardConfig::default().save_to_path(&path)?;
        info!("Wrote default configuration to {}", path.display());
        return Ok(());
    }

    let mut config = match &cli.config {
        Some(path) => BoardConfig::load_from_path(path),
        None => BoardConfig::load(),
    };
    if let Some((width, height)) = cli.viewport {
        config.viewport_width = width;
        config.viewport_height = height;
    }

    let mut board = Board::new(config.to_params())?;
    let mut player = match &cli.script {
        Some(path) => ScriptPlayer::from_path(path)?,
        None => ScriptPlayer::demo()?,
    };

    let options = SessionOptions {
        max_ticks: cli.max_ticks.unwrap_or(3600),
        event_log: cli.event_log,
    };
    let summary = session::run(&mut board, &mut player, &options)?;
    info!(
        "Session complete: {} ticks, {} events, {} tasks remaining",
        summary.ticks_run, summary.events, summary.tasks_remaining
    );
    Ok(())
}
