//! Species parameter table.
//!
//! Species are pure data: every plant is the same record, parameterised by a
//! [`SpeciesParams`] entry looked up from a [`SpeciesTable`] at creation.
//! The default table holds the four presets:
//! - Tree: slow, tall, sun-loving
//! - Shrub: medium, shade-tolerant
//! - Flower: fast, small, aggressive, sun-loving
//! - Fern: medium, shade-tolerant, frugal

use ahash::AHashMap;
use canopy_common::{SimError, SimResult, SpeciesId};
use serde::{Deserialize, Serialize};

/// Light regime a species is adapted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LightPreference {
    /// Penalised when light drops below the sun threshold.
    #[default]
    Sun,
    /// Mildly penalised when light exceeds the shade threshold.
    Shade,
}

impl LightPreference {
    /// Get the display name of this preference.
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Sun => "sun",
            Self::Shade => "shade",
        }
    }
}

/// Well-known species IDs of the default table.
pub mod species_ids {
    use super::SpeciesId;

    /// Tree.
    pub const TREE: SpeciesId = SpeciesId::new(1);
    /// Shrub.
    pub const SHRUB: SpeciesId = SpeciesId::new(2);
    /// Flower.
    pub const FLOWER: SpeciesId = SpeciesId::new(3);
    /// Fern.
    pub const FERN: SpeciesId = SpeciesId::new(4);
}

/// Immutable parameters shared by every plant of one species.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesParams {
    /// Unique identifier.
    pub id: SpeciesId,
    /// Display name (the species tag).
    pub name: String,
    /// Fraction of the remaining gap to the size cap closed per step at full
    /// resources.
    pub growth_rate: f64,
    /// Resource consumption intensity.
    pub aggressiveness: f64,
    /// Preferred light regime.
    pub light_preference: LightPreference,
    /// Canopy radius cap.
    pub max_radius: f64,
    /// Height cap.
    pub max_height: f64,
    /// Display color as `#RRGGBB`.
    pub color: String,
}

impl SpeciesParams {
    /// Create a new species builder.
    #[must_use]
    pub fn builder(id: SpeciesId, name: &str) -> SpeciesParamsBuilder {
        SpeciesParamsBuilder::new(id, name)
    }

    /// Fraction of water and nutrients left in a cell after this species
    /// forages it once, given the environment's consumption scale.
    #[must_use]
    pub fn retention(&self, consumption_scale: f64) -> f64 {
        1.0 - self.aggressiveness * consumption_scale
    }

    /// Check the parameters against their accepted ranges.
    pub fn validate(&self, consumption_scale: f64) -> SimResult<()> {
        let field = |name: &str| format!("species.{}.{name}", self.name);

        if !(self.growth_rate > 0.0 && self.growth_rate <= 1.0) {
            return Err(SimError::invalid(
                field("growth_rate"),
                format!("{} is outside (0, 1]", self.growth_rate),
            ));
        }
        let retention = self.retention(consumption_scale);
        if !(self.aggressiveness >= 0.0 && (0.0..=1.0).contains(&retention)) {
            return Err(SimError::invalid(
                field("aggressiveness"),
                format!(
                    "{} would drive consumption below zero",
                    self.aggressiveness
                ),
            ));
        }
        if !is_positive(self.max_radius) {
            return Err(SimError::invalid(
                field("max_radius"),
                "must be positive and finite",
            ));
        }
        if !is_positive(self.max_height) {
            return Err(SimError::invalid(
                field("max_height"),
                "must be positive and finite",
            ));
        }
        Ok(())
    }
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

/// Builder for species parameters.
#[derive(Debug)]
pub struct SpeciesParamsBuilder {
    params: SpeciesParams,
}

impl SpeciesParamsBuilder {
    /// Create a new builder with the generic plant defaults.
    #[must_use]
    pub fn new(id: SpeciesId, name: &str) -> Self {
        Self {
            params: SpeciesParams {
                id,
                name: name.to_string(),
                growth_rate: 0.05,
                aggressiveness: 0.5,
                light_preference: LightPreference::Sun,
                max_radius: 50.0,
                max_height: 20.0,
                color: "#32CD32".to_string(),
            },
        }
    }

    /// Set the growth rate.
    #[must_use]
    pub fn growth_rate(mut self, rate: f64) -> Self {
        self.params.growth_rate = rate;
        self
    }

    /// Set the consumption intensity.
    #[must_use]
    pub fn aggressiveness(mut self, aggressiveness: f64) -> Self {
        self.params.aggressiveness = aggressiveness;
        self
    }

    /// Set the light preference.
    #[must_use]
    pub fn light(mut self, preference: LightPreference) -> Self {
        self.params.light_preference = preference;
        self
    }

    /// Set size caps (radius, height).
    #[must_use]
    pub fn max_size(mut self, radius: f64, height: f64) -> Self {
        self.params.max_radius = radius;
        self.params.max_height = height;
        self
    }

    /// Set display color.
    #[must_use]
    pub fn color(mut self, color: &str) -> Self {
        self.params.color = color.to_string();
        self
    }

    /// Build the species parameters.
    #[must_use]
    pub fn build(self) -> SpeciesParams {
        self.params
    }
}

/// Registry of species parameters.
///
/// Entries keep their registration order so that random species selection is
/// reproducible for a given seed.
#[derive(Debug, Clone, Default)]
pub struct SpeciesTable {
    /// Species in registration order.
    entries: Vec<SpeciesParams>,
    /// Position of each id in `entries`.
    index: AHashMap<SpeciesId, usize>,
}

impl SpeciesTable {
    /// Create a new empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a table with the four default presets.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut table = Self::new();
        table.register_defaults();
        table
    }

    /// Create a table from a list of entries; later duplicates replace
    /// earlier ones.
    #[must_use]
    pub fn from_entries(entries: impl IntoIterator<Item = SpeciesParams>) -> Self {
        let mut table = Self::new();
        for params in entries {
            table.register(params);
        }
        table
    }

    /// Register the default presets.
    pub fn register_defaults(&mut self) {
        self.register(
            SpeciesParams::builder(species_ids::TREE, "Tree")
                .growth_rate(0.04)
                .aggressiveness(0.6)
                .light(LightPreference::Sun)
                .max_size(60.0, 30.0)
                .color("#228B22")
                .build(),
        );

        self.register(
            SpeciesParams::builder(species_ids::SHRUB, "Shrub")
                .growth_rate(0.08)
                .aggressiveness(0.5)
                .light(LightPreference::Shade)
                .max_size(40.0, 10.0)
                .color("#32CD32")
                .build(),
        );

        self.register(
            SpeciesParams::builder(species_ids::FLOWER, "Flower")
                .growth_rate(0.12)
                .aggressiveness(0.7)
                .light(LightPreference::Sun)
                .max_size(25.0, 5.0)
                .color("#FF69B4")
                .build(),
        );

        self.register(
            SpeciesParams::builder(species_ids::FERN, "Fern")
                .growth_rate(0.09)
                .aggressiveness(0.4)
                .light(LightPreference::Shade)
                .max_size(35.0, 8.0)
                .color("#20B2AA")
                .build(),
        );
    }

    /// Register a species, replacing any entry with the same id.
    pub fn register(&mut self, params: SpeciesParams) {
        if let Some(&slot) = self.index.get(&params.id) {
            self.entries[slot] = params;
        } else {
            self.index.insert(params.id, self.entries.len());
            self.entries.push(params);
        }
    }

    /// Get species parameters by ID.
    #[must_use]
    pub fn get(&self, id: SpeciesId) -> Option<&SpeciesParams> {
        self.index.get(&id).map(|&slot| &self.entries[slot])
    }

    /// Get species parameters by ID, failing on unknown ids.
    pub fn require(&self, id: SpeciesId) -> SimResult<&SpeciesParams> {
        self.get(id).ok_or(SimError::UnknownSpecies(id))
    }

    /// Find a species by display name.
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<&SpeciesParams> {
        self.entries.iter().find(|p| p.name == name)
    }

    /// Number of registered species.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over species in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &SpeciesParams> {
        self.entries.iter()
    }

    /// Pick a species uniformly at random.
    pub fn choose(&self, rng: &mut fastrand::Rng) -> SimResult<&SpeciesParams> {
        if self.entries.is_empty() {
            return Err(SimError::EmptySpeciesTable);
        }
        Ok(&self.entries[rng.usize(..self.entries.len())])
    }

    /// Validate every entry.
    pub fn validate(&self, consumption_scale: f64) -> SimResult<()> {
        if self.entries.is_empty() {
            return Err(SimError::EmptySpeciesTable);
        }
        self.entries
            .iter()
            .try_for_each(|params| params.validate(consumption_scale))
    }
}
