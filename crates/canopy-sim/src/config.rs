//! Simulation parameters.

use canopy_common::{PlotSize, SimError, SimResult};
use serde::{Deserialize, Serialize};

use crate::clock::DaylightSchedule;
use crate::field::{LIGHT_CEILING, SOIL_CAPACITY};
use crate::shading::ShadeFactors;
use crate::species::{SpeciesParams, SpeciesTable};
use crate::weather::WeatherConfig;

/// Everything needed to build an [`Environment`](crate::Environment).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Plot width in cells.
    pub width: u32,
    /// Plot height in cells.
    pub height: u32,
    /// Plants placed at random on construction.
    pub plant_count: usize,
    /// Random seed; drawn from entropy when absent.
    pub seed: Option<u64>,
    /// Distance kept between random plants and the plot edge.
    pub margin: u32,
    /// Initial water in every cell.
    pub initial_water: f64,
    /// Initial nutrients in every cell.
    pub initial_nutrients: f64,
    /// Range of initial radius, `[min, max)`.
    pub initial_radius: (f64, f64),
    /// Range of initial height, `[min, max)`.
    pub initial_height: (f64, f64),
    /// Hour the clock starts at.
    pub start_hour: u8,
    /// Daylight cycle.
    pub daylight: DaylightSchedule,
    /// Rain process.
    pub weather: WeatherConfig,
    /// Water lost by every cell each step.
    pub water_drift: f64,
    /// Nutrients gained by every cell each step.
    pub nutrient_drift: f64,
    /// Scales species aggressiveness into per-step consumption.
    pub consumption_scale: f64,
    /// Canopy light multipliers.
    pub shade: ShadeFactors,
    /// Species table; the four presets when empty.
    pub species: Vec<SpeciesParams>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            width: 700,
            height: 500,
            plant_count: 20,
            seed: None,
            margin: 50,
            initial_water: 150.0,
            initial_nutrients: 150.0,
            initial_radius: (5.0, 15.0),
            initial_height: (1.0, 5.0),
            start_hour: 0,
            daylight: DaylightSchedule::default(),
            weather: WeatherConfig::default(),
            water_drift: 0.5,
            nutrient_drift: 0.8,
            consumption_scale: 0.03,
            shade: ShadeFactors::default(),
            species: Vec::new(),
        }
    }
}

impl SimConfig {
    /// Config for a plot of the given size, otherwise default.
    #[must_use]
    pub fn with_plot(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Plot dimensions.
    #[must_use]
    pub fn plot(&self) -> PlotSize {
        PlotSize::new(self.width, self.height)
    }

    /// Edge margin for random placement, clamped to half of each dimension.
    #[must_use]
    pub fn effective_margin(&self) -> (u32, u32) {
        (
            self.margin.min(self.width / 2),
            self.margin.min(self.height / 2),
        )
    }

    /// Species table described by this config.
    #[must_use]
    pub fn species_table(&self) -> SpeciesTable {
        if self.species.is_empty() {
            SpeciesTable::with_defaults()
        } else {
            SpeciesTable::from_entries(self.species.iter().cloned())
        }
    }

    /// Check every parameter.
    pub fn validate(&self) -> SimResult<()> {
        if self.plot().is_degenerate() {
            return Err(SimError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        check_range("initial_radius", self.initial_radius)?;
        check_range("initial_height", self.initial_height)?;
        check_level("initial_water", self.initial_water, SOIL_CAPACITY)?;
        check_level("initial_nutrients", self.initial_nutrients, SOIL_CAPACITY)?;

        let daylight = &self.daylight;
        if daylight.day_start > daylight.day_end || daylight.day_end >= 24 {
            return Err(SimError::invalid(
                "daylight",
                format!(
                    "hours {}..={} are not within one day",
                    daylight.day_start, daylight.day_end
                ),
            ));
        }
        check_level("daylight.day_light", daylight.day_light, LIGHT_CEILING)?;
        check_level("daylight.night_light", daylight.night_light, LIGHT_CEILING)?;
        if !(self.consumption_scale.is_finite() && self.consumption_scale >= 0.0) {
            return Err(SimError::invalid(
                "consumption_scale",
                format!("{} is not a finite non-negative scale", self.consumption_scale),
            ));
        }
        if !self.water_drift.is_finite() || !self.nutrient_drift.is_finite() {
            return Err(SimError::invalid("drift", "must be finite"));
        }
        if !self.shade.is_valid() {
            return Err(SimError::invalid(
                "shade",
                "factors must lie in [0, 1] and the threshold must be finite",
            ));
        }

        self.weather.validate()?;
        self.species_table().validate(self.consumption_scale)
    }
}

fn check_range(name: &str, (min, max): (f64, f64)) -> SimResult<()> {
    if !((0.0..=max).contains(&min) && max.is_finite()) {
        return Err(SimError::invalid(
            name,
            format!("[{min}, {max}) is not a valid range"),
        ));
    }
    Ok(())
}

fn check_level(name: &str, value: f64, ceiling: f64) -> SimResult<()> {
    if !(0.0..=ceiling).contains(&value) {
        return Err(SimError::invalid(
            name,
            format!("{value} is outside [0, {ceiling}]"),
        ));
    }
    Ok(())
}
