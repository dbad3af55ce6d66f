//! Canopy shading of the light field.
//!
//! Plants are processed tallest first. Each plant dims the light on the cells
//! under its canopy disk, but only cells no taller plant has already shaded.
//! The occlusion mask records which cells have been claimed this step.

use canopy_common::{CellRect, PlotSize};
use serde::{Deserialize, Serialize};

use crate::field::ScalarField;
use crate::plant::Plant;

/// Light multipliers applied under a canopy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShadeFactors {
    /// Plants taller than this cast the dense shade.
    pub canopy_height_threshold: f64,
    /// Light multiplier under a tall canopy.
    pub tall_factor: f64,
    /// Light multiplier under a short canopy.
    pub short_factor: f64,
}

impl Default for ShadeFactors {
    fn default() -> Self {
        Self {
            canopy_height_threshold: 10.0,
            tall_factor: 0.7,
            short_factor: 0.9,
        }
    }
}

impl ShadeFactors {
    /// Light multiplier for a plant of `height`.
    #[must_use]
    pub fn factor_for(&self, height: f64) -> f64 {
        if height > self.canopy_height_threshold {
            self.tall_factor
        } else {
            self.short_factor
        }
    }

    /// Whether both factors lie in `[0, 1]` and the threshold is finite.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        (0.0..=1.0).contains(&self.tall_factor)
            && (0.0..=1.0).contains(&self.short_factor)
            && self.canopy_height_threshold.is_finite()
    }
}

/// Per-cell flag marking cells already shaded this step.
#[derive(Debug, Clone)]
pub struct OcclusionMask {
    plot: PlotSize,
    claimed: Vec<bool>,
}

impl OcclusionMask {
    /// Create an empty mask.
    #[must_use]
    pub fn new(plot: PlotSize) -> Self {
        Self {
            plot,
            claimed: vec![false; plot.cell_count()],
        }
    }

    /// Unclaim every cell.
    pub fn clear(&mut self) {
        self.claimed.fill(false);
    }

    /// Claim a cell. Returns `true` if it was unclaimed.
    pub fn claim(&mut self, x: usize, y: usize) -> bool {
        let idx = self.plot.index(x, y);
        !std::mem::replace(&mut self.claimed[idx], true)
    }

    /// Whether a cell is claimed.
    #[must_use]
    pub fn is_claimed(&self, x: usize, y: usize) -> bool {
        self.claimed[self.plot.index(x, y)]
    }

    /// Number of claimed cells.
    #[must_use]
    pub fn claimed_count(&self) -> usize {
        self.claimed.iter().filter(|&&c| c).count()
    }
}

/// Dim `light` under every canopy. Returns the number of cells shaded.
///
/// The mask is cleared first. `plants` may be in any order.
pub fn apply_canopy_shading(
    light: &mut ScalarField,
    plants: &[Plant],
    factors: &ShadeFactors,
    mask: &mut OcclusionMask,
) -> usize {
    mask.clear();

    let mut order: Vec<&Plant> = plants.iter().collect();
    order.sort_by(|a, b| {
        b.height()
            .total_cmp(&a.height())
            .then_with(|| a.id().cmp(&b.id()))
    });

    let plot = light.plot();
    let mut shaded = 0;
    for plant in order {
        let radius = plant.radius();
        let factor = factors.factor_for(plant.height());
        let scan = CellRect::around(plant.x(), plant.y(), radius * 2.0, plot);

        for (x, y) in scan.cells() {
            let dx = x as f64 - plant.x();
            let dy = y as f64 - plant.y();
            if dx.hypot(dy) <= radius && mask.claim(x, y) {
                light.scale_cell(x, y, factor);
                shaded += 1;
            }
        }
    }
    shaded
}
