// src/main.rs
// This is the main entry point for the Bingo game.

use std::io;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use bingo::config::{BingoConfig, DEFAULT_CONFIG_PATH};
use bingo::logging;
use bingo::store::{JsonStore, MemoryStore};
use bingo::terminal::Shell;

#[derive(Parser)]
#[command(name = env!("CARGO_BIN_NAME"))]
#[command(about = "Two-player console Bingo")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Args {
    /// Configuration file
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: String,

    /// Directory holding Account.json and Game.json, overrides the config file
    #[arg(long)]
    data_dir: Option<String>,

    /// Keep accounts and games in memory only
    #[arg(long)]
    memory: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let mut config = BingoConfig::load_or_default(&args.config);
    if let Some(data_dir) = args.data_dir {
        config.data_dir = data_dir;
    }
    if let Err(e) = logging::init(&config) {
        eprintln!("Could not open log file {}: {e}", config.log_path().display());
    }
    info!("Bingo starting with {config:?}");

    let input = io::stdin().lock();
    let output = io::stdout();
    let result = if args.memory {
        Shell::new(input, output, MemoryStore::new()).run()
    } else {
        JsonStore::open(&config.data_dir).and_then(|store| Shell::new(input, output, store).run())
    };

    match result {
        Ok(()) => {
            info!("Session ended");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Session aborted: {e}");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
