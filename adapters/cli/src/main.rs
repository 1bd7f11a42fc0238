#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays a Maze Sprint session headlessly.
//!
//! The binary simulates the loading bar, picks an avatar and lets an
//! autopilot steer the player through the generated maze by feeding
//! synthetic keyboard or drag input into the input mapper.

mod autopilot;
mod config;
mod driver;
mod observers;

use std::{path::PathBuf, process::ExitCode, time::Duration};

use anyhow::{ensure, Result};
use clap::{Parser, ValueEnum};
use maze_sprint_core::{Character, VICTORY_BANNER};
use maze_sprint_session::query;
use maze_sprint_system_input::DeviceClass;
use serde::Deserialize;
use tracing::error;
use tracing_subscriber::EnvFilter;

use crate::{
    config::CliConfig,
    driver::{RunOptions, RunReport},
};

/// Highest frame rate whose frame still lasts at least a nanosecond.
const MAX_TICK_HZ: u32 = 1_000_000_000;

/// Headless Maze Sprint runner.
#[derive(Debug, Parser)]
#[command(name = "maze-sprint", version, about)]
struct Args {
    /// Maze width in cells; rounded up to an odd value of at least five.
    #[arg(long)]
    width: Option<u32>,
    /// Maze height in cells; rounded up to an odd value of at least five.
    #[arg(long)]
    height: Option<u32>,
    /// Seed for maze generation, pickup placement and the loading simulation.
    #[arg(long)]
    seed: Option<u64>,
    /// TOML file providing session settings.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Input device the autopilot emulates.
    #[arg(long, value_enum)]
    device: Option<DeviceArg>,
    /// Avatar picked on the selection screen.
    #[arg(long)]
    character: Option<Character>,
    /// Gather every pickup before heading to the core.
    #[arg(long)]
    collect: bool,
    /// Print the played maze alongside the final stats.
    #[arg(long)]
    print_maze: bool,
    /// Disable effect cues.
    #[arg(long)]
    mute: bool,
    /// Simulated frames per second.
    #[arg(long, default_value_t = 60)]
    tick_hz: u32,
    /// Simulated seconds after which the run is abandoned.
    #[arg(long, default_value_t = 600)]
    max_seconds: u64,
}

/// Input device selectable from the command line or the config file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
enum DeviceArg {
    Keyboard,
    Touch,
}

impl From<DeviceArg> for DeviceClass {
    fn from(device: DeviceArg) -> Self {
        match device {
            DeviceArg::Keyboard => DeviceClass::Keyboard,
            DeviceArg::Touch => DeviceClass::Touch,
        }
    }
}

/// Entry point for the Maze Sprint command-line interface.
fn main() -> ExitCode {
    init_tracing();

    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            let message = format!("{error:#}");
            error!(error = %message, "run failed");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

fn run(args: Args) -> Result<()> {
    ensure!(args.tick_hz > 0, "--tick-hz must be positive");

    let file = match &args.config {
        Some(path) => CliConfig::load(path)?,
        None => CliConfig::default(),
    };
    let options = resolve_options(&args, file);
    ensure!(
        !options.frame.is_zero(),
        "--tick-hz must be at most {MAX_TICK_HZ}"
    );

    let report = driver::run(&options)?;
    if args.print_maze {
        println!("{}", query::maze(&report.session));
    }
    print_report(&report);
    Ok(())
}

fn resolve_options(args: &Args, file: CliConfig) -> RunOptions {
    let mut session = file.session;
    if let Some(width) = args.width {
        session.maze_width = width;
    }
    if let Some(height) = args.height {
        session.maze_height = height;
    }
    if let Some(seed) = args.seed {
        session.seed = seed;
    }

    RunOptions {
        session,
        device: args
            .device
            .or(file.device)
            .map(DeviceClass::from)
            .unwrap_or_default(),
        character: args.character.or(file.character).unwrap_or(Character::Robot),
        collect: args.collect,
        mute: args.mute,
        frame: Duration::from_secs(1) / args.tick_hz,
        time_limit: Duration::from_secs(args.max_seconds),
    }
}

fn print_report(report: &RunReport) {
    let stats = report.stats;
    println!("{VICTORY_BANNER}");
    println!("time:  {:.1}s", stats.elapsed.as_secs_f32());
    println!("score: {}", stats.score);
    println!("moves: {}", stats.moves);
    println!(
        "items: {}/{}",
        stats.collectibles_collected, stats.total_collectibles
    );
    println!(
        "bonus: time {} + items {} + moves {}",
        report.breakdown.time_bonus, report.breakdown.collectible_bonus, report.breakdown.move_bonus
    );
}
