//! Plot geometry: plot size and axis-aligned cell rectangles.
//!
//! The plot is a grid of unit cells. Cell `(x, y)` covers plot space
//! `[x, x + 1) × [y, y + 1)` and is stored at index `y * width + x`.

use serde::{Deserialize, Serialize};

/// Dimensions of the plot in whole cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlotSize {
    /// Number of columns
    pub width: u32,
    /// Number of rows
    pub height: u32,
}

impl PlotSize {
    /// Creates a new plot size.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Total number of cells.
    #[must_use]
    pub const fn cell_count(self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Whether either dimension is zero.
    #[must_use]
    pub const fn is_degenerate(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Whether a point in plot space lies on the plot (edges included).
    #[must_use]
    pub fn contains(self, x: f64, y: f64) -> bool {
        (0.0..=f64::from(self.width)).contains(&x) && (0.0..=f64::from(self.height)).contains(&y)
    }

    /// Converts a cell coordinate to a linear index.
    #[must_use]
    pub const fn index(self, x: usize, y: usize) -> usize {
        y * self.width as usize + x
    }

    /// The rectangle covering the whole plot.
    #[must_use]
    pub const fn full_rect(self) -> CellRect {
        CellRect::new(0, self.width as usize, 0, self.height as usize)
    }
}

/// Half-open cell rectangle `[x_min, x_max) × [y_min, y_max)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellRect {
    /// First column
    pub x_min: usize,
    /// One past the last column
    pub x_max: usize,
    /// First row
    pub y_min: usize,
    /// One past the last row
    pub y_max: usize,
}

impl CellRect {
    /// Creates a rectangle from its bounds.
    #[must_use]
    pub const fn new(x_min: usize, x_max: usize, y_min: usize, y_max: usize) -> Self {
        Self {
            x_min,
            x_max,
            y_min,
            y_max,
        }
    }

    /// Square box of half-width `half_extent` around `(cx, cy)`, clipped to
    /// the plot.
    ///
    /// Bounds are truncated toward zero before clipping, so a box of
    /// half-width 10 around `x = 20.7` spans columns `10..30`. The result is
    /// empty rather than inverted when the box misses the plot.
    #[must_use]
    pub fn around(cx: f64, cy: f64, half_extent: f64, plot: PlotSize) -> Self {
        let (x_min, x_max) = clip_span(cx - half_extent, cx + half_extent, plot.width);
        let (y_min, y_max) = clip_span(cy - half_extent, cy + half_extent, plot.height);
        Self::new(x_min, x_max, y_min, y_max)
    }

    /// Whether the rectangle holds no cells.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.x_min >= self.x_max || self.y_min >= self.y_max
    }

    /// Number of cells covered.
    #[must_use]
    pub const fn area(&self) -> usize {
        if self.is_empty() {
            0
        } else {
            (self.x_max - self.x_min) * (self.y_max - self.y_min)
        }
    }

    /// Iterates over every cell, row by row.
    pub fn cells(self) -> impl Iterator<Item = (usize, usize)> {
        (self.y_min..self.y_max).flat_map(move |y| (self.x_min..self.x_max).map(move |x| (x, y)))
    }
}

/// Truncates `[lo, hi)` to integers and clips it to `[0, limit)`.
fn clip_span(lo: f64, hi: f64, limit: u32) -> (usize, usize) {
    let limit = i64::from(limit);
    let lo = (lo as i64).clamp(0, limit);
    let hi = (hi as i64).clamp(lo, limit);
    (lo as usize, hi as usize)
}
