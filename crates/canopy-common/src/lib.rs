//! # Canopy Common
//!
//! Common types, utilities, and shared abstractions for Canopy.
//!
//! This crate provides foundational types used across all Canopy crates:
//! - Plot geometry (plot size, cell rectangles)
//! - ID types (PlantId, SpeciesId)
//! - Common error types
//! - Prelude for convenient imports

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod coords;
pub mod error;
pub mod ids;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::coords::*;
    pub use crate::error::*;
    pub use crate::ids::*;
}

pub use prelude::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_around_point_is_clipped_to_plot() {
        let plot = PlotSize::new(100, 80);
        let rect = CellRect::around(5.0, 78.0, 10.0, plot);

        assert_eq!(rect, CellRect::new(0, 15, 68, 80));
        assert_eq!(rect.area(), 15 * 12);
    }

    #[test]
    fn test_plant_ids_are_ordered() {
        assert!(PlantId::new(1) < PlantId::new(2));
        assert_eq!(PlantId::new(7).raw(), 7);
    }

    #[test]
    fn test_error_wraps_sim_error() {
        let err: CanopyError = SimError::InvalidDimensions {
            width: 0,
            height: 10,
        }
        .into();
        assert!(err.to_string().contains("0x10"));
    }
}
