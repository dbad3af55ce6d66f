//! Scalar resource fields over the plot grid.

use canopy_common::{CellRect, PlotSize};
use serde::{Deserialize, Serialize};

/// Upper bound of the water and nutrient fields.
pub const SOIL_CAPACITY: f64 = 200.0;
/// Upper bound of the light field before shading.
pub const LIGHT_CEILING: f64 = 100.0;

/// One value per plot cell, kept within `[0, ceiling]` by every mutator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalarField {
    plot: PlotSize,
    ceiling: f64,
    data: Vec<f64>,
}

impl ScalarField {
    /// Create a field with every cell set to `initial`, clamped.
    #[must_use]
    pub fn new(plot: PlotSize, initial: f64, ceiling: f64) -> Self {
        Self {
            plot,
            ceiling,
            data: vec![initial.clamp(0.0, ceiling); plot.cell_count()],
        }
    }

    /// Plot the field covers.
    #[must_use]
    pub fn plot(&self) -> PlotSize {
        self.plot
    }

    /// Upper clamp bound.
    #[must_use]
    pub fn ceiling(&self) -> f64 {
        self.ceiling
    }

    /// Raw values in row-major order.
    #[must_use]
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Value at a cell, or `None` off the plot.
    #[must_use]
    pub fn get(&self, x: usize, y: usize) -> Option<f64> {
        if x >= self.plot.width as usize || y >= self.plot.height as usize {
            return None;
        }
        Some(self.data[self.plot.index(x, y)])
    }

    /// Set a cell, clamped. Off-plot cells are ignored.
    pub fn set(&mut self, x: usize, y: usize, value: f64) {
        if x < self.plot.width as usize && y < self.plot.height as usize {
            let idx = self.plot.index(x, y);
            self.data[idx] = value.clamp(0.0, self.ceiling);
        }
    }

    /// Set every cell to `value`, clamped.
    pub fn fill(&mut self, value: f64) {
        self.data.fill(value.clamp(0.0, self.ceiling));
    }

    /// Add `delta` to every cell, clamped.
    pub fn offset(&mut self, delta: f64) {
        let ceiling = self.ceiling;
        for value in &mut self.data {
            *value = (*value + delta).clamp(0.0, ceiling);
        }
    }

    /// Multiply one cell by `factor`, clamped.
    pub fn scale_cell(&mut self, x: usize, y: usize, factor: f64) {
        let idx = self.plot.index(x, y);
        self.data[idx] = (self.data[idx] * factor).clamp(0.0, self.ceiling);
    }

    /// Multiply every cell in `rect` by `factor`, clamped.
    pub fn scale(&mut self, rect: CellRect, factor: f64) {
        for y in rect.y_min..rect.y_max {
            let row = self.plot.index(0, y);
            for value in &mut self.data[row + rect.x_min..row + rect.x_max] {
                *value = (*value * factor).clamp(0.0, self.ceiling);
            }
        }
    }

    /// Mean over `rect`, or `None` when it holds no cells.
    #[must_use]
    pub fn mean(&self, rect: CellRect) -> Option<f64> {
        if rect.is_empty() {
            return None;
        }
        let mut sum = 0.0;
        for y in rect.y_min..rect.y_max {
            let row = self.plot.index(0, y);
            sum += self.data[row + rect.x_min..row + rect.x_max]
                .iter()
                .sum::<f64>();
        }
        Some(sum / rect.area() as f64)
    }

    /// Smallest value, zero for an empty field.
    #[must_use]
    pub fn min(&self) -> f64 {
        self.data.iter().copied().reduce(f64::min).unwrap_or(0.0)
    }

    /// Largest value, zero for an empty field.
    #[must_use]
    pub fn max(&self) -> f64 {
        self.data.iter().copied().reduce(f64::max).unwrap_or(0.0)
    }

    /// Mean over the whole plot, zero for an empty field.
    #[must_use]
    pub fn overall_mean(&self) -> f64 {
        self.mean(self.plot.full_rect()).unwrap_or(0.0)
    }

    /// Whether every cell lies in `[0, ceiling]`.
    #[must_use]
    pub fn all_within_bounds(&self) -> bool {
        self.data
            .iter()
            .all(|&value| (0.0..=self.ceiling).contains(&value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plot() -> PlotSize {
        PlotSize::new(8, 6)
    }

    #[test]
    fn test_new_clamps_initial_value() {
        let field = ScalarField::new(plot(), 250.0, SOIL_CAPACITY);
        assert_eq!(field.data().len(), 48);
        assert_eq!(field.max(), SOIL_CAPACITY);
    }

    #[test]
    fn test_offset_clamps_both_ends() {
        let mut field = ScalarField::new(plot(), 199.5, SOIL_CAPACITY);
        field.offset(0.8);
        assert_eq!(field.min(), SOIL_CAPACITY);

        field.fill(0.3);
        field.offset(-0.5);
        assert_eq!(field.max(), 0.0);
        assert!(field.all_within_bounds());
    }

    #[test]
    fn test_get_and_set() {
        let mut field = ScalarField::new(plot(), 10.0, LIGHT_CEILING);
        field.set(3, 2, 42.0);
        assert_eq!(field.get(3, 2), Some(42.0));
        assert_eq!(field.get(8, 0), None);

        field.set(20, 20, 1.0);
        field.set(1, 1, 500.0);
        assert_eq!(field.get(1, 1), Some(LIGHT_CEILING));
    }

    #[test]
    fn test_scale_only_touches_rect() {
        let mut field = ScalarField::new(plot(), 100.0, SOIL_CAPACITY);
        let rect = CellRect::new(2, 4, 1, 3);
        field.scale(rect, 0.5);

        assert_eq!(field.get(2, 1), Some(50.0));
        assert_eq!(field.get(3, 2), Some(50.0));
        assert_eq!(field.get(4, 2), Some(100.0));
        assert_eq!(field.get(2, 3), Some(100.0));
    }

    #[test]
    fn test_mean_over_rect() {
        let mut field = ScalarField::new(plot(), 0.0, SOIL_CAPACITY);
        field.set(0, 0, 40.0);
        field.set(1, 0, 20.0);

        let rect = CellRect::new(0, 2, 0, 2);
        assert_eq!(field.mean(rect), Some(15.0));
        assert_eq!(field.mean(CellRect::new(3, 3, 0, 2)), None);
    }

    #[test]
    fn test_scale_cell() {
        let mut field = ScalarField::new(plot(), 100.0, LIGHT_CEILING);
        field.scale_cell(5, 5, 0.7);
        assert!((field.get(5, 5).unwrap_or_default() - 70.0).abs() < 1e-9);
    }
}
