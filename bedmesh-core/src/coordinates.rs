//! Mesh index ↔ bed coordinate mapping
//!
//! Each axis gets a table of physical positions, one per mesh line plus one
//! past the last line. A probe point landing exactly on the final line can
//! round into the next (nonexistent) cell, and the extra entry keeps that
//! lookup in bounds.
//!
//! Positions are computed as `min + spacing * i` in `f64` and narrowed to
//! `f32` on store, so the last line of a wide bed doesn't accumulate
//! rounding error from repeated addition.
//!
//! ```rust
//! use bedmesh_core::coordinates::CoordinateTable;
//!
//! let xs = CoordinateTable::<3>::new(0.0, 50.0);
//! assert_eq!(xs.len(), 4);
//! assert_eq!(xs.location(3), Some(150.0));
//! assert_eq!(xs.cell_index(76.0), 1);
//! ```

use crate::config::MeshGeometry;

/// Positions of `N` mesh lines along one axis, plus the one-past-the-end line
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateTable<const N: usize> {
    lines: [f32; N],
    past_end: f32,
    min: f32,
    spacing: f32,
}

impl<const N: usize> CoordinateTable<N> {
    /// Build the table for lines starting at `min`, `spacing` apart
    pub fn new(min: f32, spacing: f32) -> Self {
        let mut lines = [0.0; N];
        for (i, line) in lines.iter_mut().enumerate() {
            *line = Self::affine(min, spacing, i);
        }

        Self {
            lines,
            past_end: Self::affine(min, spacing, N),
            min,
            spacing,
        }
    }

    fn affine(min: f32, spacing: f32, index: usize) -> f32 {
        (f64::from(min) + f64::from(spacing) * index as f64) as f32
    }

    /// Number of entries, always `N + 1`
    pub const fn len(&self) -> usize {
        N + 1
    }

    /// Never true; the past-the-end entry always exists
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Physical position of line `index`, for `index` in `0..=N`
    pub fn location(&self, index: usize) -> Option<f32> {
        match index.cmp(&N) {
            core::cmp::Ordering::Less => Some(self.lines[index]),
            core::cmp::Ordering::Equal => Some(self.past_end),
            core::cmp::Ordering::Greater => None,
        }
    }

    /// All `N + 1` positions in increasing index order
    pub fn iter(&self) -> impl Iterator<Item = f32> + '_ {
        self.lines.iter().copied().chain(core::iter::once(self.past_end))
    }

    /// Index of the cell containing `position`
    ///
    /// A mesh of `N` lines has `N - 1` cells. Positions before the first
    /// line land in cell 0 and positions past the last line in the final
    /// cell, so the result is always usable for interpolation.
    pub fn cell_index(&self, position: f32) -> usize {
        let last_cell = N.saturating_sub(2);
        if self.spacing == 0.0 {
            return 0;
        }

        let cell = libm::floorf((position - self.min) / self.spacing);
        if cell.is_nan() || cell <= 0.0 {
            0
        } else if cell >= last_cell as f32 {
            last_cell
        } else {
            cell as usize
        }
    }
}

/// Coordinate tables for both axes of an `NX` × `NY` mesh
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateMap<const NX: usize, const NY: usize> {
    /// X positions of the mesh columns
    pub x: CoordinateTable<NX>,
    /// Y positions of the mesh rows
    pub y: CoordinateTable<NY>,
}

impl<const NX: usize, const NY: usize> CoordinateMap<NX, NY> {
    /// Build both tables from a resolved geometry
    pub fn new(geometry: &MeshGeometry) -> Self {
        Self {
            x: CoordinateTable::new(geometry.min_x, geometry.x_dist),
            y: CoordinateTable::new(geometry.min_y, geometry.y_dist),
        }
    }

    /// Cell `(x, y)` containing the physical position
    pub fn cell_index(&self, x: f32, y: f32) -> (usize, usize) {
        (self.x.cell_index(x), self.y.cell_index(y))
    }
}
