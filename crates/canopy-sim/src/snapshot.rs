//! Serializable snapshot of an environment.

use canopy_common::{PlantId, PlotSize};
use serde::{Deserialize, Serialize};

use crate::environment::Environment;
use crate::field::ScalarField;
use crate::plant::{Plant, ResourceSample};

/// Summary of one resource field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldSummary {
    /// Smallest cell value
    pub min: f64,
    /// Largest cell value
    pub max: f64,
    /// Mean over the plot
    pub mean: f64,
    /// Upper bound of the field
    pub ceiling: f64,
}

impl FieldSummary {
    /// Summarize a field.
    #[must_use]
    pub fn of(field: &ScalarField) -> Self {
        Self {
            min: field.min(),
            max: field.max(),
            mean: field.overall_mean(),
            ceiling: field.ceiling(),
        }
    }
}

/// What a renderer needs to draw one plant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlantView {
    /// Plant id
    pub id: PlantId,
    /// Species tag
    pub species: String,
    /// Display color
    pub color: String,
    /// Position
    pub x: f64,
    /// Position
    pub y: f64,
    /// Canopy radius
    pub radius: f64,
    /// Height
    pub height: f64,
    /// Health in [0, 100]
    pub health: u8,
    /// Resources at the last step
    pub resources: ResourceSample,
}

impl From<&Plant> for PlantView {
    fn from(plant: &Plant) -> Self {
        Self {
            id: plant.id(),
            species: plant.species_name().to_string(),
            color: plant.color().to_string(),
            x: plant.x(),
            y: plant.y(),
            radius: plant.radius(),
            height: plant.height(),
            health: plant.health(),
            resources: plant.resources(),
        }
    }
}

/// Point-in-time view of an environment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentSnapshot {
    /// Plot dimensions
    pub plot: PlotSize,
    /// Steps completed
    pub step: u64,
    /// Current hour
    pub hour: u8,
    /// Days passed
    pub day: u32,
    /// Rain flag
    pub raining: bool,
    /// Plants removed so far
    pub dead_count: u64,
    /// Light field summary
    pub light: FieldSummary,
    /// Water field summary
    pub water: FieldSummary,
    /// Nutrient field summary
    pub nutrients: FieldSummary,
    /// Plants ordered by id
    pub plants: Vec<PlantView>,
}

impl EnvironmentSnapshot {
    /// Capture the current state.
    #[must_use]
    pub fn capture(env: &Environment) -> Self {
        Self {
            plot: env.plot(),
            step: env.steps(),
            hour: env.hour(),
            day: env.day(),
            raining: env.is_raining(),
            dead_count: env.dead_count(),
            light: FieldSummary::of(env.light()),
            water: FieldSummary::of(env.water()),
            nutrients: FieldSummary::of(env.nutrients()),
            plants: env.plants().iter().map(PlantView::from).collect(),
        }
    }
}

impl Environment {
    /// Capture a snapshot.
    #[must_use]
    pub fn snapshot(&self) -> EnvironmentSnapshot {
        EnvironmentSnapshot::capture(self)
    }
}
