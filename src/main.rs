//! Holotree headless runner.
//!
//! Runs the collect-and-deposit game without a window, feeding it gamepad
//! input from a JSON script, the built-in autopilot, or nothing at all, and
//! optionally writes a JSON report of where the run ended up.
//!
//! # Running
//!
//! ```sh
//! cargo run --release -- --autopilot --report run.json
//! cargo run --release -- --input script.json --frames 600
//! cargo run --release -- --write-default-config config.ini
//! ```

use clap::Parser;
use holotree::game::Game;
use holotree::resources::gameconfig::GameConfig;
use holotree::resources::input::{Autopilot, NoGamepad, ScriptedGamepad};
use log::{info, warn};
use std::path::PathBuf;

/// Headless holographic tree game
#[derive(Parser)]
#[command(version, about = "Collect, deposit, grow the tree. Headless.")]
struct Cli {
    /// INI configuration file.
    #[arg(long, value_name = "PATH", default_value = "./config.ini")]
    config: PathBuf,

    /// Maximum number of frames to simulate (overrides the config).
    #[arg(long)]
    frames: Option<u64>,

    /// Simulated frames per second (overrides the config).
    #[arg(long)]
    fps: Option<u32>,

    /// Random seed (overrides the config).
    #[arg(long)]
    seed: Option<u64>,

    /// JSON gamepad script to replay.
    #[arg(long, value_name = "PATH", conflicts_with = "autopilot")]
    input: Option<PathBuf>,

    /// Let the autopilot play.
    #[arg(long)]
    autopilot: bool,

    /// Write a JSON report of the final state to this path.
    #[arg(long, value_name = "PATH")]
    report: Option<PathBuf>,

    /// Write the default configuration to this path and exit.
    #[arg(long, value_name = "PATH")]
    write_default_config: Option<PathBuf>,
}

fn run(cli: Cli) -> Result<(), String> {
    if let Some(path) = cli.write_default_config {
        GameConfig::with_path(&path).save_to_file()?;
        println!("Default config written to {}", path.display());
        return Ok(());
    }

    let mut config = GameConfig::with_path(&cli.config);
    if cli.config.exists() {
        config.load_from_file()?;
    } else {
        warn!("Config file {:?} not found, using defaults", cli.config);
    }
    if let Some(fps) = cli.fps {
        config.fps = fps.max(1);
    }
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    let max_frames = cli.frames.unwrap_or(config.max_frames);

    let mut game = if let Some(path) = &cli.input {
        let script = ScriptedGamepad::load(path)?;
        info!("Replaying {} keyframes from {:?}", script.len(), path);
        Game::new(config, script)
    } else if cli.autopilot {
        let pilot = Autopilot::new(config.gamepad_slot, config.trigger_button, config.pickup_range);
        Game::new(config, pilot)
    } else {
        Game::new(config, NoGamepad)
    };

    let frames = game.run(max_frames);
    let report = game.report();
    info!(
        "Ran {} frames ({:.1}s): {:?}, progress {:.2}/{:.2}, game over: {}",
        frames,
        report.elapsed,
        report.phase,
        report.progress,
        report.clip_time,
        report.game_over
    );

    if let Some(path) = cli.report {
        let json = serde_json::to_string_pretty(&report)
            .map_err(|e| format!("Failed to serialize report: {}", e))?;
        std::fs::write(&path, json)
            .map_err(|e| format!("Failed to write report {:?}: {}", path, e))?;
        info!("Report written to {:?}", path);
    }
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
