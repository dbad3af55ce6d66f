//! Error types for Canopy.

use thiserror::Error;

use crate::ids::SpeciesId;

/// Top-level error type for Canopy operations.
#[derive(Debug, Error)]
pub enum CanopyError {
    /// Simulation construction errors
    #[error("Simulation error: {0}")]
    Sim(#[from] SimError),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while building a simulation.
///
/// A running simulation never fails; every variant here describes a
/// malformed configuration rejected before the first step.
#[derive(Debug, Error)]
pub enum SimError {
    /// Plot has a zero dimension
    #[error("Invalid plot dimensions {width}x{height}: both must be at least 1")]
    InvalidDimensions {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
    },

    /// Species id not present in the species table
    #[error("Unknown species id {0}")]
    UnknownSpecies(SpeciesId),

    /// Explicit plant placement outside the plot
    #[error("Plant position ({x}, {y}) lies outside the {width}x{height} plot")]
    PlantOutOfBounds {
        /// X coordinate
        x: f64,
        /// Y coordinate
        y: f64,
        /// Plot width
        width: u32,
        /// Plot height
        height: u32,
    },

    /// A configuration value is out of its accepted range
    #[error("Invalid value for `{name}`: {reason}")]
    InvalidParameter {
        /// Parameter name
        name: String,
        /// Why it was rejected
        reason: String,
    },

    /// No species to draw plants from
    #[error("Species table is empty")]
    EmptySpeciesTable,
}

impl SimError {
    /// Shorthand for [`SimError::InvalidParameter`].
    pub fn invalid(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for Canopy operations.
pub type CanopyResult<T> = Result<T, CanopyError>;

/// Result type alias for simulation construction.
pub type SimResult<T> = Result<T, SimError>;
