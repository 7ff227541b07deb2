//! Headless skill action runner
//!
//! Loads a woodcutting configuration, plays its scenario for a number of ticks
//! and writes the action journal as JSONL.

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use skill_core::config::DEFAULT_CONFIG_PATH;
use skill_core::{ActionLogger, SimConfig, Simulation};

/// Command line arguments for the runner
#[derive(Parser, Debug)]
#[command(name = "skill_sim")]
#[command(about = "Run a scripted skill scenario and record the action journal")]
struct Args {
    /// Random seed; defaults to the configured seed
    #[arg(long)]
    seed: Option<u64>,

    /// Number of ticks to simulate; defaults to the configured count
    #[arg(long)]
    ticks: Option<u64>,

    /// Configuration file
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Where to write the JSONL journal
    #[arg(long, default_value = "output/journal.jsonl")]
    events_out: PathBuf,
}

fn main() -> ExitCode {
    // RUST_LOG overrides the default level
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let config = match SimConfig::load(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: could not load {}: {}", args.config.display(), e);
            return ExitCode::FAILURE;
        }
    };
    let seed = args.seed.unwrap_or(config.simulation.seed);
    let ticks = args.ticks.unwrap_or(config.simulation.default_ticks);

    if let Some(dir) = args.events_out.parent().filter(|d| !d.as_os_str().is_empty()) {
        if let Err(e) = std::fs::create_dir_all(dir) {
            eprintln!("Error: could not create {}: {}", dir.display(), e);
            return ExitCode::FAILURE;
        }
    }
    let logger = match ActionLogger::create(&args.events_out) {
        Ok(logger) => logger,
        Err(e) => {
            eprintln!("Error: could not open {}: {}", args.events_out.display(), e);
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(seed, ticks, config = %args.config.display(), "starting run");

    let mut sim = Simulation::from_config(&config, seed).with_logger(logger);
    sim.run(ticks);

    if let Err(e) = sim.flush_logger() {
        eprintln!("Error: could not write {}: {}", args.events_out.display(), e);
        return ExitCode::FAILURE;
    }

    let (records, rewards, restores) = sim
        .logger()
        .map(|logger| {
            (
                logger.total(),
                logger.written("rewarded"),
                logger.written("mutation_fired"),
            )
        })
        .unwrap_or_default();

    println!("Simulation complete. Ran {} ticks (seed {}).", ticks, seed);
    println!(
        "{} journal records, {} rewards, {} objects restored, {} actions still running.",
        records,
        rewards,
        restores,
        sim.scheduler().active_count()
    );
    println!("Journal written to {}", args.events_out.display());
    ExitCode::SUCCESS
}
