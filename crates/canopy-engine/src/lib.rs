//! # Canopy Engine
//!
//! Command-line driver for the Canopy plant community simulation.
//!
//! This crate ties the simulation to the outside world:
//! - TOML configuration with lenient and strict loading
//! - The paced tick loop with periodic community logging
//! - The JSON run report

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod config;
pub mod report;
pub mod runner;

pub use config::{ConfigError, EngineConfig, RunConfig, CONFIG_FILE};
pub use report::RunReport;
pub use runner::{run, RunSummary, StopReason};
