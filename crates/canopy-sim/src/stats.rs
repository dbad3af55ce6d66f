//! Community statistics.

use canopy_common::SpeciesId;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::environment::Environment;
use crate::species::LightPreference;

/// Number of health histogram bins (0-19, 20-39, ..., 80-100).
pub const HEALTH_BINS: usize = 5;

/// Population summary of one species.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesSummary {
    /// Species id
    pub id: SpeciesId,
    /// Species tag
    pub name: String,
    /// Preferred light regime
    pub light: LightPreference,
    /// Plants present
    pub count: usize,
    /// Mean health of those plants, zero when absent
    pub average_health: f64,
}

/// Aggregate view of the community at one moment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommunityStats {
    /// Steps completed
    pub step: u64,
    /// Current hour
    pub hour: u8,
    /// Daylight flag
    pub is_day: bool,
    /// Rain flag
    pub raining: bool,
    /// Plants present
    pub plant_count: usize,
    /// Plants removed so far
    pub dead_count: u64,
    /// Mean health over all plants, zero when empty
    pub average_health: f64,
    /// Plant counts by health band
    pub health_histogram: [usize; HEALTH_BINS],
    /// One entry per species in table order
    pub species: Vec<SpeciesSummary>,
}

impl CommunityStats {
    /// Collect statistics from an environment.
    #[must_use]
    pub fn collect(env: &Environment) -> Self {
        let plants = env.plants();
        let mut histogram = [0; HEALTH_BINS];
        for plant in plants {
            histogram[health_bin(plant.health())] += 1;
        }

        let species = env
            .species()
            .iter()
            .map(|params| {
                let healths: Vec<u8> = plants
                    .iter()
                    .filter(|p| p.species_id() == params.id)
                    .map(|p| p.health())
                    .collect();
                SpeciesSummary {
                    id: params.id,
                    name: params.name.clone(),
                    light: params.light_preference,
                    count: healths.len(),
                    average_health: mean(healths.iter().copied()),
                }
            })
            .collect();

        Self {
            step: env.steps(),
            hour: env.hour(),
            is_day: env.is_day(),
            raining: env.is_raining(),
            plant_count: plants.len(),
            dead_count: env.dead_count(),
            average_health: mean(plants.iter().map(|p| p.health())),
            health_histogram: histogram,
            species,
        }
    }

    /// Whether every plant is gone.
    #[must_use]
    pub fn is_extinct(&self) -> bool {
        self.plant_count == 0
    }
}

fn health_bin(health: u8) -> usize {
    (usize::from(health) / 20).min(HEALTH_BINS - 1)
}

fn mean(values: impl Iterator<Item = u8>) -> f64 {
    let (sum, count) = values.fold((0u64, 0u64), |(s, c), v| (s + u64::from(v), c + 1));
    if count == 0 {
        0.0
    } else {
        sum as f64 / count as f64
    }
}

impl fmt::Display for CommunityStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Step {} ({:02}:00, {}{})",
            self.step,
            self.hour,
            if self.is_day { "day" } else { "night" },
            if self.raining { ", raining" } else { "" }
        )?;
        writeln!(
            f,
            "Plants: {} alive, {} dead, avg health {:.1}",
            self.plant_count, self.dead_count, self.average_health
        )?;
        for summary in &self.species {
            writeln!(
                f,
                "  {:<8} {:<5} {:>4}  avg health {:.1}",
                summary.name,
                summary.light.display_name(),
                summary.count,
                summary.average_health
            )?;
        }
        write!(f, "Health histogram: {:?}", self.health_histogram)
    }
}
