//! Persisted leveling state record
//!
//! ## Layout
//!
//! The record is a fixed 40-byte little-endian block stored just below the
//! last byte of the EEPROM:
//!
//! ```text
//! offset  size  field
//!      0     1  active (0 = off, anything else = on)
//!      1     1  n_x
//!      2     1  n_y
//!      3     1  reserved (0)
//!      4     4  z_offset            f32
//!      8     4  mesh_x_min          f32
//!     12     4  mesh_y_min          f32
//!     16     4  mesh_x_max          f32
//!     20     4  mesh_y_max          f32
//!     24     4  mesh_x_dist         f32
//!     28     4  mesh_y_dist         f32
//!     32     4  fade_height         f32
//!     36     4  fade_height_multiplier  f32
//! ```
//!
//! `fade_height_multiplier` must equal `1.0 / fade_height`. Records saved by
//! firmware that predates the multiplier carry garbage there, which
//! `load_state` detects and repairs once.

use crate::config::MeshGeometry;

/// Size of the encoded record in bytes
pub const RECORD_SIZE: usize = 40;

/// Leveling state as persisted
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LevelingState {
    /// Whether mesh compensation is applied to moves
    pub active: bool,
    /// Global Z offset added on top of the mesh (mm)
    pub z_offset: f32,
    /// Grid geometry the record was saved with
    pub geometry: MeshGeometry,
    /// Height at which correction has faded out (mm)
    pub fade_height: f32,
    /// Cached `1.0 / fade_height`
    pub fade_height_multiplier: f32,
}

impl LevelingState {
    /// Inactive record describing the running build
    pub fn for_build(geometry: MeshGeometry, fade_height: f32) -> Self {
        Self {
            active: false,
            z_offset: 0.0,
            geometry,
            fade_height,
            fade_height_multiplier: 1.0 / fade_height,
        }
    }

    /// Change the fade height, keeping the multiplier in step
    pub fn set_fade_height(&mut self, fade_height: f32) {
        self.fade_height = fade_height;
        self.refresh_fade_multiplier();
    }

    /// True when the multiplier no longer matches the fade height
    ///
    /// A fade height that is not finite (an erased record) has no usable
    /// reciprocal, so there is nothing to repair.
    pub fn fade_multiplier_is_stale(&self) -> bool {
        self.fade_height.is_finite() && self.fade_height_multiplier != 1.0 / self.fade_height
    }

    /// Recompute the multiplier from the fade height
    pub fn refresh_fade_multiplier(&mut self) {
        self.fade_height_multiplier = 1.0 / self.fade_height;
    }

    /// Encode into the on-EEPROM layout
    pub fn to_bytes(&self) -> [u8; RECORD_SIZE] {
        let mut bytes = [0u8; RECORD_SIZE];
        bytes[0] = u8::from(self.active);
        bytes[1] = self.geometry.n_x;
        bytes[2] = self.geometry.n_y;

        let floats = [
            self.z_offset,
            self.geometry.min_x,
            self.geometry.min_y,
            self.geometry.max_x,
            self.geometry.max_y,
            self.geometry.x_dist,
            self.geometry.y_dist,
            self.fade_height,
            self.fade_height_multiplier,
        ];
        for (chunk, value) in bytes[4..].chunks_exact_mut(4).zip(floats) {
            chunk.copy_from_slice(&value.to_le_bytes());
        }
        bytes
    }

    /// Decode from the on-EEPROM layout
    ///
    /// Never fails: any byte pattern is a record, possibly a nonsensical
    /// one. Judging it is the integrity check's job.
    pub fn from_bytes(bytes: &[u8; RECORD_SIZE]) -> Self {
        let mut floats = [0.0f32; 9];
        for (value, chunk) in floats.iter_mut().zip(bytes[4..].chunks_exact(4)) {
            let mut raw = [0u8; 4];
            raw.copy_from_slice(chunk);
            *value = f32::from_le_bytes(raw);
        }

        let [z_offset, min_x, min_y, max_x, max_y, x_dist, y_dist, fade_height, fade_height_multiplier] =
            floats;

        Self {
            active: bytes[0] != 0,
            z_offset,
            geometry: MeshGeometry {
                n_x: bytes[1],
                n_y: bytes[2],
                min_x,
                min_y,
                max_x,
                max_y,
                x_dist,
                y_dist,
            },
            fade_height,
            fade_height_multiplier,
        }
    }
}
