//! In-memory correction mesh
//!
//! `z_values[x][y]` holds the Z correction (mm) at mesh line intersection
//! `(x, y)`. A cell is either a finite correction or NaN, meaning nothing is
//! known there and the compensation logic must not interpolate across it.
//!
//! The mesh has two resting states:
//! - **reset**: every cell `0.0`, compensation is a no-op everywhere
//! - **invalidated**: every cell NaN, waiting for a probe run or slot load

use crate::config::MeshGeometry;
use crate::constants::{storage::GRID_CELL_BYTES, LAST_SPECIFIED_Z_RESET_MM};
use crate::coordinates::CoordinateMap;

/// Raw grid of corrections, indexed `[x][y]`
pub type Grid<const NX: usize, const NY: usize> = [[f32; NY]; NX];

/// Correction mesh plus the scalars its consumer caches between moves
#[derive(Debug, Clone)]
pub struct MeshStore<const NX: usize, const NY: usize> {
    z_values: Grid<NX, NY>,
    coordinates: CoordinateMap<NX, NY>,

    /// Last Z the planner compensated for; reset far below the bed so the
    /// first move always recomputes the fade factor
    pub last_specified_z: f32,

    /// Fade multiplier for `last_specified_z`, cached by the planner
    pub fade_scaling_factor_for_current_height: f32,
}

impl<const NX: usize, const NY: usize> MeshStore<NX, NY> {
    /// Bytes one grid occupies in storage
    pub const BYTE_SIZE: usize = NX * NY * GRID_CELL_BYTES;

    /// Build the coordinate tables and start from a flat mesh
    pub fn new(geometry: &MeshGeometry) -> Self {
        let mut mesh = Self {
            z_values: [[0.0; NY]; NX],
            coordinates: CoordinateMap::new(geometry),
            last_specified_z: LAST_SPECIFIED_Z_RESET_MM,
            fade_scaling_factor_for_current_height: 0.0,
        };
        mesh.reset();
        mesh
    }

    /// Flatten the mesh and clear the planner's cached scalars
    pub fn reset(&mut self) {
        self.fill(0.0);
        self.last_specified_z = LAST_SPECIFIED_Z_RESET_MM;
        self.fade_scaling_factor_for_current_height = 0.0;
    }

    /// Mark every cell unknown
    pub fn invalidate(&mut self) {
        self.fill(f32::NAN);
    }

    fn fill(&mut self, z: f32) {
        for column in self.z_values.iter_mut() {
            column.fill(z);
        }
    }

    /// Correction at `(x, y)`, `None` outside the grid
    pub fn z(&self, x: usize, y: usize) -> Option<f32> {
        self.z_values.get(x)?.get(y).copied()
    }

    /// Store a correction; returns false if `(x, y)` is outside the grid
    pub fn set_z(&mut self, x: usize, y: usize, z: f32) -> bool {
        match self.z_values.get_mut(x).and_then(|column| column.get_mut(y)) {
            Some(cell) => {
                *cell = z;
                true
            }
            None => false,
        }
    }

    /// Whole grid
    pub fn values(&self) -> &Grid<NX, NY> {
        &self.z_values
    }

    /// Replace the grid wholesale
    pub fn set_values(&mut self, values: Grid<NX, NY>) {
        self.z_values = values;
    }

    /// Coordinate tables for both axes
    pub fn coordinates(&self) -> &CoordinateMap<NX, NY> {
        &self.coordinates
    }

    /// True when every cell is exactly zero
    pub fn is_flat(&self) -> bool {
        self.z_values.iter().flatten().all(|&z| z == 0.0)
    }

    /// Number of cells holding a usable correction
    pub fn valid_cell_count(&self) -> usize {
        self.z_values.iter().flatten().filter(|z| !z.is_nan()).count()
    }
}
