//! Plant record and growth model.
//!
//! A plant is one concrete record parameterised by its species. Each step the
//! environment hands it a [`ResourceSample`]; [`Plant::grow`] turns that into
//! radius, height and health changes:
//! - the scarcest resource sets the growth factor
//! - a light-preference penalty may scale it down
//! - size approaches the species cap exponentially
//! - health falls under stress, rises when thriving

use canopy_common::{PlantId, SpeciesId};
use glam::DVec2;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::species::{LightPreference, SpeciesParams};

/// Resource level at which a resource stops limiting growth.
pub const RESOURCE_SATURATION: f64 = 100.0;
/// Sun-loving plants are penalised below this light level.
pub const SUN_LIGHT_THRESHOLD: f64 = 70.0;
/// Growth multiplier for sun-loving plants in low light.
pub const SUN_PENALTY: f64 = 0.8;
/// Shade-loving plants are penalised above this light level.
pub const SHADE_LIGHT_THRESHOLD: f64 = 80.0;
/// Growth multiplier for shade-loving plants in bright light.
pub const SHADE_PENALTY: f64 = 0.9;
/// Growth factors below this cost health.
pub const STRESS_THRESHOLD: f64 = 0.5;
/// Growth factors above this restore health.
pub const THRIVE_THRESHOLD: f64 = 0.6;
/// Health lost per stressed step.
pub const STRESS_DAMAGE: u8 = 2;
/// Health regained per thriving step.
pub const THRIVE_RECOVERY: u8 = 1;
/// Health of a new plant, and the cap.
pub const MAX_HEALTH: u8 = 100;

/// Resources available to a plant for one step.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ResourceSample {
    /// Mean light over the plant's footprint.
    pub light: f64,
    /// Mean water over the plant's footprint.
    pub water: f64,
    /// Mean nutrients over the plant's footprint.
    pub nutrients: f64,
}

impl ResourceSample {
    /// No resources at all.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    /// Create a new sample.
    #[must_use]
    pub const fn new(light: f64, water: f64, nutrients: f64) -> Self {
        Self {
            light,
            water,
            nutrients,
        }
    }

    /// Scarcest resource as a fraction of saturation, in [0, 1].
    #[must_use]
    pub fn limiting_fraction(&self) -> f64 {
        normalize(self.light)
            .min(normalize(self.water))
            .min(normalize(self.nutrients))
    }
}

fn normalize(value: f64) -> f64 {
    value.min(RESOURCE_SATURATION) / RESOURCE_SATURATION
}

/// A single plant in the community.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Plant {
    /// Unique id within the environment.
    id: PlantId,
    /// Stem position in plot space.
    position: DVec2,
    /// Canopy radius.
    radius: f64,
    /// Height.
    height: f64,
    /// Health in [0, 100].
    health: u8,
    /// Species parameters.
    species: SpeciesParams,
    /// Resources supplied at the last growth call.
    resources: ResourceSample,
}

impl Plant {
    /// Create a healthy plant.
    ///
    /// `radius` and `height` are clamped into `[0, species max]`.
    #[must_use]
    pub fn new(
        id: PlantId,
        position: DVec2,
        species: SpeciesParams,
        radius: f64,
        height: f64,
    ) -> Self {
        Self {
            id,
            position,
            radius: radius.max(0.0).min(species.max_radius),
            height: height.max(0.0).min(species.max_height),
            health: MAX_HEALTH,
            species,
            resources: ResourceSample::ZERO,
        }
    }

    /// Unique id.
    #[must_use]
    pub fn id(&self) -> PlantId {
        self.id
    }

    /// Stem position.
    #[must_use]
    pub fn position(&self) -> DVec2 {
        self.position
    }

    /// X coordinate.
    #[must_use]
    pub fn x(&self) -> f64 {
        self.position.x
    }

    /// Y coordinate.
    #[must_use]
    pub fn y(&self) -> f64 {
        self.position.y
    }

    /// Canopy radius.
    #[must_use]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Height.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Health in [0, 100].
    #[must_use]
    pub fn health(&self) -> u8 {
        self.health
    }

    /// Whether the plant still has health left.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Species parameters.
    #[must_use]
    pub fn species(&self) -> &SpeciesParams {
        &self.species
    }

    /// Species id.
    #[must_use]
    pub fn species_id(&self) -> SpeciesId {
        self.species.id
    }

    /// Species tag.
    #[must_use]
    pub fn species_name(&self) -> &str {
        &self.species.name
    }

    /// Display color.
    #[must_use]
    pub fn color(&self) -> &str {
        &self.species.color
    }

    /// Resources supplied at the last growth call.
    #[must_use]
    pub fn resources(&self) -> ResourceSample {
        self.resources
    }

    /// Growth factor the plant would derive from `resources`, in [0, 1].
    #[must_use]
    pub fn growth_factor(&self, resources: &ResourceSample) -> f64 {
        let factor = resources.limiting_fraction();
        match self.species.light_preference {
            LightPreference::Sun if resources.light < SUN_LIGHT_THRESHOLD => factor * SUN_PENALTY,
            LightPreference::Shade if resources.light > SHADE_LIGHT_THRESHOLD => {
                factor * SHADE_PENALTY
            },
            _ => factor,
        }
    }

    /// Advance one step with the given resources.
    ///
    /// The sample is always recorded. A plant at zero health does not grow and
    /// its health does not change.
    pub fn grow(&mut self, resources: ResourceSample) {
        self.resources = resources;
        if !self.is_alive() {
            return;
        }

        let factor = self.growth_factor(&resources);
        let rate = self.species.growth_rate * factor;

        self.radius = approach(self.radius, self.species.max_radius, rate);
        self.height = approach(self.height, self.species.max_height, rate);

        // Factors in [STRESS_THRESHOLD, THRIVE_THRESHOLD] leave health alone.
        if factor < STRESS_THRESHOLD {
            self.health = self.health.saturating_sub(STRESS_DAMAGE);
        } else if factor > THRIVE_THRESHOLD {
            self.health = (self.health + THRIVE_RECOVERY).min(MAX_HEALTH);
        }
    }
}

/// Close `rate` of the gap to `cap`, never passing it and never shrinking.
fn approach(current: f64, cap: f64, rate: f64) -> f64 {
    (current + rate * (cap - current).max(0.0)).min(cap)
}

impl fmt::Display for Plant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let percent = |value: f64| (value as i64).min(100);
        writeln!(f, "Species: {}", self.species.name)?;
        writeln!(f, "Radius: {:.1}/{}", self.radius, self.species.max_radius)?;
        writeln!(f, "Height: {:.1}/{}", self.height, self.species.max_height)?;
        writeln!(f, "Health: {}%", self.health)?;
        write!(
            f,
            "Resources: Light={}%, Water={}%, Nutrients={}%",
            percent(self.resources.light),
            percent(self.resources.water),
            percent(self.resources.nutrients)
        )
    }
}

/// Placement request for building an environment with explicit plants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    /// Species to plant.
    pub species: SpeciesId,
    /// Stem position.
    pub x: f64,
    /// Stem position.
    pub y: f64,
    /// Initial radius; drawn from the configured range when absent.
    pub radius: Option<f64>,
    /// Initial height; drawn from the configured range when absent.
    pub height: Option<f64>,
}

impl Placement {
    /// Place a plant with random initial size.
    #[must_use]
    pub const fn new(species: SpeciesId, x: f64, y: f64) -> Self {
        Self {
            species,
            x,
            y,
            radius: None,
            height: None,
        }
    }

    /// Fix the initial size.
    #[must_use]
    pub const fn with_size(mut self, radius: f64, height: f64) -> Self {
        self.radius = Some(radius);
        self.height = Some(height);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::species::{species_ids, SpeciesTable};

    fn plant_of(species: SpeciesId) -> Plant {
        let table = SpeciesTable::with_defaults();
        let params = table.get(species).expect("species").clone();
        Plant::new(PlantId::new(0), DVec2::new(50.0, 50.0), params, 10.0, 3.0)
    }

    fn starve(plant: &mut Plant, steps: usize) {
        for _ in 0..steps {
            plant.grow(ResourceSample::ZERO);
        }
    }

    #[test]
    fn test_new_plant_is_healthy() {
        let plant = plant_of(species_ids::TREE);
        assert_eq!(plant.health(), MAX_HEALTH);
        assert!(plant.is_alive());
        assert_eq!(plant.species_name(), "Tree");
        assert_eq!(plant.color(), "#228B22");
    }

    #[test]
    fn test_initial_size_clamped_to_species_cap() {
        let table = SpeciesTable::with_defaults();
        let flower = table.get(species_ids::FLOWER).expect("flower").clone();
        let plant = Plant::new(PlantId::new(1), DVec2::ZERO, flower, 40.0, 9.0);
        assert!((plant.radius() - 25.0).abs() < 1e-12);
        assert!((plant.height() - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_nan_size_does_not_panic() {
        let table = SpeciesTable::with_defaults();
        let fern = table.get(species_ids::FERN).expect("fern").clone();
        let plant = Plant::new(PlantId::new(2), DVec2::ZERO, fern.clone(), f64::NAN, -3.0);
        assert_eq!(plant.radius(), 0.0);
        assert_eq!(plant.height(), 0.0);

        let ghost = SpeciesParams {
            max_radius: f64::NAN,
            ..fern
        };
        let plant = Plant::new(PlantId::new(3), DVec2::ZERO, ghost, 10.0, 2.0);
        assert_eq!(plant.radius(), 10.0);
    }

    #[test]
    fn test_growth_factor_is_scarcest_resource() {
        let plant = plant_of(species_ids::TREE);
        let sample = ResourceSample::new(100.0, 150.0, 40.0);
        assert!((plant.growth_factor(&sample) - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_resources_saturate_at_one_hundred() {
        let sample = ResourceSample::new(180.0, 200.0, 120.0);
        assert!((sample.limiting_fraction() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_sun_plant_penalised_in_low_light() {
        let plant = plant_of(species_ids::TREE);
        let sample = ResourceSample::new(60.0, 100.0, 100.0);
        assert!((plant.growth_factor(&sample) - 0.48).abs() < 1e-12);
    }

    #[test]
    fn test_shade_plant_penalised_in_bright_light() {
        let plant = plant_of(species_ids::FERN);
        let sample = ResourceSample::new(90.0, 100.0, 100.0);
        assert!((plant.growth_factor(&sample) - 0.81).abs() < 1e-12);
    }

    #[test]
    fn test_shade_plant_not_rewarded_in_low_light() {
        let plant = plant_of(species_ids::SHRUB);
        let sample = ResourceSample::new(30.0, 100.0, 100.0);
        assert!((plant.growth_factor(&sample) - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_growth_approaches_cap() {
        let mut plant = plant_of(species_ids::TREE);
        let full = ResourceSample::new(100.0, 100.0, 100.0);

        plant.grow(full);
        // radius: 10 + 0.04 * (60 - 10)
        assert!((plant.radius() - 12.0).abs() < 1e-9);
        // height: 3 + 0.04 * (30 - 3)
        assert!((plant.height() - 4.08).abs() < 1e-9);

        for _ in 0..2000 {
            plant.grow(full);
        }
        assert!(plant.radius() <= 60.0);
        assert!(plant.height() <= 30.0);
        assert!(plant.radius() > 59.9);
    }

    #[test]
    fn test_growth_never_shrinks() {
        let mut plant = plant_of(species_ids::FLOWER);
        let mut last = (plant.radius(), plant.height());
        for light in [100.0, 20.0, 0.0, 85.0, 55.0] {
            plant.grow(ResourceSample::new(light, 70.0, 90.0));
            assert!(plant.radius() >= last.0);
            assert!(plant.height() >= last.1);
            last = (plant.radius(), plant.height());
        }
    }

    #[test]
    fn test_stress_costs_health() {
        let mut plant = plant_of(species_ids::TREE);
        plant.grow(ResourceSample::new(100.0, 40.0, 100.0));
        assert_eq!(plant.health(), 98);
    }

    #[test]
    fn test_recovery_capped_at_max() {
        let mut plant = plant_of(species_ids::TREE);
        starve(&mut plant, 1);
        assert_eq!(plant.health(), 98);

        let full = ResourceSample::new(100.0, 100.0, 100.0);
        plant.grow(full);
        assert_eq!(plant.health(), 99);
        plant.grow(full);
        plant.grow(full);
        assert_eq!(plant.health(), MAX_HEALTH);
    }

    #[test]
    fn test_dead_zone_lower_bound() {
        let mut plant = plant_of(species_ids::TREE);
        starve(&mut plant, 3);
        assert_eq!(plant.health(), 94);

        let sample = ResourceSample::new(100.0, 50.0, 100.0);
        assert_eq!(plant.growth_factor(&sample), 0.5);
        plant.grow(sample);
        assert_eq!(plant.health(), 94);
    }

    #[test]
    fn test_dead_zone_upper_bound() {
        let mut plant = plant_of(species_ids::TREE);
        starve(&mut plant, 3);

        let sample = ResourceSample::new(100.0, 100.0, 60.0);
        assert_eq!(plant.growth_factor(&sample), 0.6);
        plant.grow(sample);
        assert_eq!(plant.health(), 94);

        // Just above the dead zone heals
        plant.grow(ResourceSample::new(100.0, 100.0, 61.0));
        assert_eq!(plant.health(), 95);
    }

    #[test]
    fn test_health_saturates_at_zero() {
        let mut plant = plant_of(species_ids::FERN);
        starve(&mut plant, 49);
        assert_eq!(plant.health(), 2);
        starve(&mut plant, 1);
        assert_eq!(plant.health(), 0);
        starve(&mut plant, 3);
        assert_eq!(plant.health(), 0);
        assert!(!plant.is_alive());
    }

    #[test]
    fn test_terminal_plant_does_not_grow() {
        let mut plant = plant_of(species_ids::SHRUB);
        starve(&mut plant, 50);
        assert!(!plant.is_alive());

        let before = (plant.radius(), plant.height());
        let full = ResourceSample::new(100.0, 100.0, 100.0);
        plant.grow(full);

        assert_eq!((plant.radius(), plant.height()), before);
        assert_eq!(plant.health(), 0);
        // The snapshot is still recorded
        assert_eq!(plant.resources(), full);
    }

    #[test]
    fn test_display_summary() {
        let mut plant = plant_of(species_ids::TREE);
        plant.grow(ResourceSample::new(92.6, 150.0, 99.9));
        let text = plant.to_string();

        assert!(text.starts_with("Species: Tree\n"));
        assert!(text.contains("Radius: 11.9/60"));
        assert!(text.contains("Health: 100%"));
        assert!(text.contains("Light=92%, Water=100%, Nutrients=99%"));
    }

    #[test]
    fn test_placement_builder() {
        let placement = Placement::new(species_ids::FERN, 10.0, 20.0).with_size(7.0, 2.0);
        assert_eq!(placement.radius, Some(7.0));
        assert_eq!(placement.height, Some(2.0));
    }
}
