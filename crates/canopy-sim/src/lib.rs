//! # Canopy Sim
//!
//! Plant community simulation on a rectangular plot.
//!
//! This crate provides the simulation core:
//! - Species table and the plant growth model
//! - Light, water and nutrient fields
//! - Day clock and rain process
//! - Canopy shading with an occlusion mask
//! - The environment step and cull
//! - Statistics and serializable snapshots

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod clock;
pub mod config;
pub mod environment;
pub mod field;
pub mod plant;
pub mod shading;
pub mod snapshot;
pub mod species;
pub mod stats;
pub mod weather;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::clock::*;
    pub use crate::config::*;
    pub use crate::environment::*;
    pub use crate::field::*;
    pub use crate::plant::*;
    pub use crate::shading::*;
    pub use crate::snapshot::*;
    pub use crate::species::*;
    pub use crate::stats::*;
    pub use crate::weather::*;
}

pub use prelude::*;
