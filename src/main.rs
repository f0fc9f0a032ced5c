// SPDX-License-Identifier: GPL-3.0-or-later
// src/main.rs
//
// Application entry point.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tokio::io::BufReader;

use collage::app::{AppState, CollageModel};
use collage::config::{AppConfig, FlagStore};
use collage::constant::{MAX_GRID_SIZE, MIN_GRID_SIZE};

/// Command-line arguments.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about)]
pub struct Args {
    /// Command script to run; reads commands from stdin when omitted.
    pub script: Option<PathBuf>,

    /// Initial grid size (cells per side).
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(i64::from(MIN_GRID_SIZE)..=i64::from(MAX_GRID_SIZE)))]
    pub grid: Option<u32>,

    /// Initial cell size in pixels.
    #[arg(short, long)]
    pub cell_size: Option<u32>,

    /// Export destination (file or directory).
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Open the collage with the system viewer after export.
    #[arg(long)]
    pub open: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = AppConfig::load();

    let model = CollageModel::new(
        args.grid.unwrap_or(config.default_grid_size),
        args.cell_size.unwrap_or(config.default_cell_size),
    )?;

    let mut state = AppState::new(model, config, FlagStore::open_default());
    state.output = args.output;
    state.open_after_export |= args.open;

    let mut stdout = std::io::stdout().lock();
    match args.script {
        Some(path) => {
            let file = tokio::fs::File::open(&path)
                .await
                .with_context(|| format!("Failed to open script {}", path.display()))?;
            state.run(BufReader::new(file), &mut stdout).await
        }
        None => state.run(BufReader::new(tokio::io::stdin()), &mut stdout).await,
    }
}
