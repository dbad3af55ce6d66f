//! # Canopy
//!
//! Runs a plant community simulation from the command line.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

use anyhow::{Context, Result};
use canopy_engine::{EngineConfig, RunReport, CONFIG_FILE};
use canopy_sim::Environment;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "canopy")]
#[command(version)]
#[command(about = "Plant community simulation: growth, shading, rain and competition")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a simulation
    Run {
        /// Configuration file (TOML); defaults apply when absent
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Number of ticks, overriding the config
        #[arg(short, long)]
        ticks: Option<u64>,

        /// Random seed, overriding the config
        #[arg(long)]
        seed: Option<u64>,

        /// Write the JSON report here instead of stdout
        #[arg(short, long)]
        report: Option<PathBuf>,
    },

    /// Write a default configuration file
    Init {
        /// Output path
        #[arg(short, long, default_value = CONFIG_FILE)]
        output: PathBuf,
    },
}

/// Main entry point.
fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive("canopy=info".parse()?))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            ticks,
            seed,
            report,
        } => run_simulation(config, ticks, seed, report),
        Commands::Init { output } => EngineConfig::default()
            .save_to(&output)
            .with_context(|| format!("writing {}", output.display())),
    }
}

fn run_simulation(
    config_path: Option<PathBuf>,
    ticks: Option<u64>,
    seed: Option<u64>,
    report_path: Option<PathBuf>,
) -> Result<()> {
    info!("Canopy {} starting", env!("CARGO_PKG_VERSION"));

    let mut config = match config_path {
        Some(path) => EngineConfig::try_load_from(&path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => EngineConfig::load(),
    };
    if let Some(ticks) = ticks {
        config.run.ticks = ticks;
    }
    if seed.is_some() {
        config.sim.seed = seed;
    }
    if report_path.is_some() {
        config.run.report_path = report_path;
    }
    config.validate();

    let mut env =
        Environment::new(config.sim.clone()).context("building the initial environment")?;
    let summary = canopy_engine::run(&mut env, &config.run);

    RunReport::new(&env, summary)
        .write(config.run.report_path.as_deref())
        .context("writing the run report")?;

    info!("Canopy finished");
    Ok(())
}
