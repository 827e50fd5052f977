//! Shared fixtures for integration tests
//!
//! Provides:
//! - A small 3×3 printer whose EEPROM region holds exactly four meshes
//! - Realistic probed meshes (a warped bed with a few unreachable points)
//! - Bit-exact grid comparison

#![allow(dead_code)]

use bedmesh_core::{BedLeveling, Grid, MemEeprom, MeshConfig};

/// EEPROM size of the test printer
pub const EEPROM_SIZE: usize = 512;

/// Record address on the test EEPROM: last byte 511, minus the 40-byte record
pub const STATE_ADDRESS: u32 = 471;

/// Bytes per 3×3 grid
pub const GRID_BYTES: u32 = 36;

/// Region start leaving room for exactly `FOUR_SLOTS` meshes
pub const FOUR_SLOT_START: i32 = (STATE_ADDRESS - 4 * GRID_BYTES) as i32;

/// Slot count the default test printer holds
pub const FOUR_SLOTS: u32 = 4;

/// 3×3 test printer
pub type TestPrinter = BedLeveling<MemEeprom<EEPROM_SIZE>, 3, 3>;

/// 100 × 100 mm bed, 50 mm cells, origin at (0, 0)
pub fn test_config() -> MeshConfig {
    MeshConfig::new(0.0, 0.0, 100.0, 100.0).with_region_start(FOUR_SLOT_START)
}

/// Fresh printer with erased EEPROM
pub fn printer() -> TestPrinter {
    BedLeveling::new(MemEeprom::new(), test_config())
}

/// Printer for a different build sharing `eeprom`
pub fn reboot_with<const NX: usize, const NY: usize>(
    eeprom: MemEeprom<EEPROM_SIZE>,
    config: MeshConfig,
) -> BedLeveling<MemEeprom<EEPROM_SIZE>, NX, NY> {
    BedLeveling::new(eeprom, config)
}

/// Bowl-shaped bed with a raised corner, as a probe run would produce
pub fn warped_bed<const NX: usize, const NY: usize>(seed: u32) -> Grid<NX, NY> {
    let mut grid = [[0.0f32; NY]; NX];
    let cx = (NX as f32 - 1.0) / 2.0;
    let cy = (NY as f32 - 1.0) / 2.0;

    for (x, column) in grid.iter_mut().enumerate() {
        for (y, z) in column.iter_mut().enumerate() {
            let dx = x as f32 - cx;
            let dy = y as f32 - cy;
            let noise = ((seed.wrapping_mul(31).wrapping_add((x * 7 + y * 13) as u32) % 17) as f32 - 8.0) * 0.0007;
            *z = 0.015 * (dx * dx + dy * dy) - 0.04 + noise;
        }
    }
    grid[NX - 1][NY - 1] += 0.12;
    grid
}

/// Same as `warped_bed` but with the probe unable to reach one corner
pub fn partially_probed<const NX: usize, const NY: usize>(seed: u32) -> Grid<NX, NY> {
    let mut grid = warped_bed::<NX, NY>(seed);
    grid[0][NY - 1] = f32::NAN;
    grid
}

/// Bit-for-bit grid equality (NaN-aware)
pub fn assert_grid_bits_eq<const NX: usize, const NY: usize>(a: &Grid<NX, NY>, b: &Grid<NX, NY>) {
    for (x, (col_a, col_b)) in a.iter().zip(b.iter()).enumerate() {
        for (y, (za, zb)) in col_a.iter().zip(col_b.iter()).enumerate() {
            assert_eq!(za.to_bits(), zb.to_bits(), "cell ({}, {}) differs: {} vs {}", x, y, za, zb);
        }
    }
}
