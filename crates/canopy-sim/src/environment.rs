//! The plot: resource fields, plants, clock and weather.
//!
//! [`Environment::step`] advances everything by one hour in a fixed order:
//! 1. clock and daylight reset the light field
//! 2. weather may start or stop rain (rain adds a water pulse)
//! 3. water drains and nutrients replenish
//! 4. canopies shade the light field, tallest first
//! 5. plants sample, deplete and grow, in ascending id order
//!
//! Dead plants stay in place until [`Environment::cull`] removes them.

use canopy_common::{CellRect, PlantId, PlotSize, SimError, SimResult};
use glam::DVec2;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use crate::clock::DayClock;
use crate::config::SimConfig;
use crate::field::{ScalarField, LIGHT_CEILING, SOIL_CAPACITY};
use crate::plant::{Placement, Plant, ResourceSample};
use crate::shading::{apply_canopy_shading, OcclusionMask};
use crate::species::{SpeciesParams, SpeciesTable};
use crate::weather::Weather;

/// Outcome of one [`Environment::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickReport {
    /// Steps completed so far, including this one.
    pub step: u64,
    /// Hour after the step.
    pub hour: u8,
    /// Whether it is raining after the step.
    pub raining: bool,
    /// Plants removed by the cull.
    pub removed: usize,
    /// Plants still alive.
    pub alive: usize,
}

/// A plant community on a rectangular plot.
#[derive(Debug, Clone)]
pub struct Environment {
    plot: PlotSize,
    config: SimConfig,
    species: SpeciesTable,
    /// Ordered by id.
    plants: Vec<Plant>,
    next_id: PlantId,
    light: ScalarField,
    water: ScalarField,
    nutrients: ScalarField,
    clock: DayClock,
    weather: Weather,
    rng: fastrand::Rng,
    mask: OcclusionMask,
    dead_count: u64,
    steps: u64,
    seed: u64,
}

impl Environment {
    /// Build an environment with `config.plant_count` plants of random
    /// species at random positions.
    ///
    /// Positions are whole numbers kept `margin` away from the plot edges,
    /// the margin being clamped to half of each dimension.
    pub fn new(config: SimConfig) -> SimResult<Self> {
        let mut env = Self::empty(config)?;
        let (margin_x, margin_y) = env.config.effective_margin();
        let (width, height) = (env.plot.width, env.plot.height);

        for _ in 0..env.config.plant_count {
            let params = env.species.choose(&mut env.rng)?.clone();
            let x = env.rng.u32(margin_x..=width - margin_x);
            let y = env.rng.u32(margin_y..=height - margin_y);
            env.spawn(params, DVec2::new(f64::from(x), f64::from(y)), None, None);
        }

        info!(
            width,
            height,
            plants = env.plants.len(),
            seed = env.seed,
            "Environment created"
        );
        Ok(env)
    }

    /// Build an environment with explicitly placed plants.
    ///
    /// `config.plant_count` is ignored.
    pub fn with_plants(config: SimConfig, placements: &[Placement]) -> SimResult<Self> {
        let mut env = Self::empty(config)?;

        for placement in placements {
            let params = env.species.require(placement.species)?.clone();
            if !env.plot.contains(placement.x, placement.y) {
                return Err(SimError::PlantOutOfBounds {
                    x: placement.x,
                    y: placement.y,
                    width: env.plot.width,
                    height: env.plot.height,
                });
            }
            check_size("placement.radius", placement.radius)?;
            check_size("placement.height", placement.height)?;
            env.spawn(
                params,
                DVec2::new(placement.x, placement.y),
                placement.radius,
                placement.height,
            );
        }

        info!(
            width = env.plot.width,
            height = env.plot.height,
            plants = env.plants.len(),
            seed = env.seed,
            "Environment created with explicit placements"
        );
        Ok(env)
    }

    /// Default configuration on a `width` x `height` plot with `count` random
    /// plants and a fixed seed.
    pub fn with_seed(width: u32, height: u32, count: usize, seed: u64) -> SimResult<Self> {
        Self::new(SimConfig {
            plant_count: count,
            seed: Some(seed),
            ..SimConfig::with_plot(width, height)
        })
    }

    fn empty(config: SimConfig) -> SimResult<Self> {
        config.validate()?;

        let plot = config.plot();
        let seed = config.seed.unwrap_or_else(|| fastrand::u64(..));
        let species = config.species_table();

        Ok(Self {
            plot,
            species,
            plants: Vec::new(),
            next_id: PlantId::new(0),
            light: ScalarField::new(plot, LIGHT_CEILING, LIGHT_CEILING),
            water: ScalarField::new(plot, config.initial_water, SOIL_CAPACITY),
            nutrients: ScalarField::new(plot, config.initial_nutrients, SOIL_CAPACITY),
            clock: DayClock::new(config.start_hour, config.daylight),
            weather: Weather::new(config.weather),
            rng: fastrand::Rng::with_seed(seed),
            mask: OcclusionMask::new(plot),
            dead_count: 0,
            steps: 0,
            seed,
            config,
        })
    }

    /// Create a plant, drawing any missing size from the configured ranges.
    fn spawn(
        &mut self,
        params: SpeciesParams,
        position: DVec2,
        radius: Option<f64>,
        height: Option<f64>,
    ) {
        let radius = radius.unwrap_or_else(|| uniform(&mut self.rng, self.config.initial_radius));
        let height = height.unwrap_or_else(|| uniform(&mut self.rng, self.config.initial_height));

        let id = self.next_id;
        self.next_id = id.next();
        trace!(%id, species = %params.name, x = position.x, y = position.y, "Plant spawned");
        self.plants
            .push(Plant::new(id, position, params, radius, height));
    }

    /// Advance the simulation by one hour.
    ///
    /// Plants whose health reaches zero remain until [`cull`](Self::cull).
    pub fn step(&mut self) {
        let step = self.steps + 1;

        if let Some(event) = self.clock.advance() {
            trace!(?event, "Clock");
        }
        self.light.fill(self.clock.light_level());

        if let Some(pulse) = self.weather.update(step, &mut self.rng) {
            self.water.offset(pulse);
        }

        self.water.offset(-self.config.water_drift);
        self.nutrients.offset(self.config.nutrient_drift);

        let shaded =
            apply_canopy_shading(&mut self.light, &self.plants, &self.config.shade, &mut self.mask);

        let scale = self.config.consumption_scale;
        for plant in &mut self.plants {
            let sample = forage(
                plant,
                &self.light,
                &mut self.water,
                &mut self.nutrients,
                scale,
            );
            plant.grow(sample);
        }

        self.steps = step;
        debug!(
            step,
            hour = self.clock.hour(),
            raining = self.weather.is_raining(),
            shaded,
            "Step complete"
        );
    }

    /// Remove plants with no health left. Returns how many were removed.
    pub fn cull(&mut self) -> usize {
        let before = self.plants.len();
        self.plants.retain(|plant| {
            if plant.is_alive() {
                true
            } else {
                debug!(id = %plant.id(), species = plant.species_name(), "Plant died");
                false
            }
        });
        let removed = before - self.plants.len();
        self.dead_count += removed as u64;
        removed
    }

    /// Step, then cull.
    pub fn tick(&mut self) -> TickReport {
        self.step();
        let removed = self.cull();
        TickReport {
            step: self.steps,
            hour: self.clock.hour(),
            raining: self.weather.is_raining(),
            removed,
            alive: self.plants.len(),
        }
    }

    /// Run `ticks` ticks. Returns the total number of plants removed.
    pub fn run(&mut self, ticks: u64) -> usize {
        (0..ticks).map(|_| self.tick().removed).sum()
    }

    /// Plot width.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.plot.width
    }

    /// Plot height.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.plot.height
    }

    /// Plot dimensions.
    #[must_use]
    pub fn plot(&self) -> PlotSize {
        self.plot
    }

    /// Plants ordered by id.
    #[must_use]
    pub fn plants(&self) -> &[Plant] {
        &self.plants
    }

    /// Plant by id, if still present.
    #[must_use]
    pub fn plant(&self, id: PlantId) -> Option<&Plant> {
        self.plants
            .binary_search_by_key(&id, Plant::id)
            .ok()
            .map(|idx| &self.plants[idx])
    }

    /// Plants removed so far.
    #[must_use]
    pub fn dead_count(&self) -> u64 {
        self.dead_count
    }

    /// Current hour, 0-23.
    #[must_use]
    pub fn hour(&self) -> u8 {
        self.clock.hour()
    }

    /// Number of midnights passed.
    #[must_use]
    pub fn day(&self) -> u32 {
        self.clock.day_count()
    }

    /// Whether the current hour is in daylight.
    #[must_use]
    pub fn is_day(&self) -> bool {
        self.clock.is_day()
    }

    /// Whether it is raining.
    #[must_use]
    pub fn is_raining(&self) -> bool {
        self.weather.is_raining()
    }

    /// Light field after the last step's shading.
    #[must_use]
    pub fn light(&self) -> &ScalarField {
        &self.light
    }

    /// Water field.
    #[must_use]
    pub fn water(&self) -> &ScalarField {
        &self.water
    }

    /// Nutrient field.
    #[must_use]
    pub fn nutrients(&self) -> &ScalarField {
        &self.nutrients
    }

    /// Steps completed.
    #[must_use]
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Species table.
    #[must_use]
    pub fn species(&self) -> &SpeciesTable {
        &self.species
    }

    /// Configuration the environment was built from.
    #[must_use]
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Seed of the random source.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Number of showers so far.
    #[must_use]
    pub fn shower_count(&self) -> u32 {
        self.weather.shower_count()
    }
}

fn check_size(name: &str, size: Option<f64>) -> SimResult<()> {
    match size {
        Some(value) if !(value.is_finite() && value >= 0.0) => Err(SimError::invalid(
            name,
            format!("{value} is not a finite non-negative size"),
        )),
        _ => Ok(()),
    }
}

/// Mean resources under the plant's footprint box, then deplete water and
/// nutrients there by the species retention.
fn forage(
    plant: &Plant,
    light: &ScalarField,
    water: &mut ScalarField,
    nutrients: &mut ScalarField,
    consumption_scale: f64,
) -> ResourceSample {
    let rect = CellRect::around(plant.x(), plant.y(), plant.radius(), light.plot());
    let (Some(l), Some(w), Some(n)) = (light.mean(rect), water.mean(rect), nutrients.mean(rect))
    else {
        return ResourceSample::ZERO;
    };

    let retention = plant.species().retention(consumption_scale);
    water.scale(rect, retention);
    nutrients.scale(rect, retention);
    ResourceSample::new(l, w, n)
}

fn uniform(rng: &mut fastrand::Rng, (min, max): (f64, f64)) -> f64 {
    min + rng.f64() * (max - min)
}
