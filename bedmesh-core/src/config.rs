//! Build configuration for the leveling mesh
//!
//! A firmware build fixes its mesh point counts through the const generic
//! parameters on [`BedLeveling`](crate::BedLeveling); everything else it
//! compiles in lives in [`MeshConfig`]. [`MeshGeometry`] is the resolved
//! combination of the two, and is what the state record carries and what
//! the integrity check compares against.

use crate::constants::{
    geometry::{mesh_spacing, MESH_MAX_X_MM, MESH_MAX_Y_MM, MESH_MIN_X_MM, MESH_MIN_Y_MM},
    DEFAULT_FADE_HEIGHT_MM, DEFAULT_MESH_REGION_START,
};

/// Compiled-in leveling configuration
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MeshConfig {
    /// Lowest probed X coordinate (mm)
    pub min_x: f32,
    /// Lowest probed Y coordinate (mm)
    pub min_y: f32,
    /// Highest probed X coordinate (mm)
    pub max_x: f32,
    /// Highest probed Y coordinate (mm)
    pub max_y: f32,
    /// Height at which correction has faded out (mm)
    pub fade_height: f32,
    /// First EEPROM byte available to mesh slots; zero or negative disables
    /// mesh storage entirely
    pub region_start: i32,
}

impl Default for MeshConfig {
    fn default() -> Self {
        Self {
            min_x: MESH_MIN_X_MM,
            min_y: MESH_MIN_Y_MM,
            max_x: MESH_MAX_X_MM,
            max_y: MESH_MAX_Y_MM,
            fade_height: DEFAULT_FADE_HEIGHT_MM,
            region_start: DEFAULT_MESH_REGION_START,
        }
    }
}

impl MeshConfig {
    /// Create a configuration covering `[min_x, max_x] × [min_y, max_y]`
    ///
    /// Fade height and region start take their build defaults.
    pub fn new(min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
            ..Self::default()
        }
    }

    /// Override the fade height (mm)
    pub fn with_fade_height(mut self, fade_height: f32) -> Self {
        self.fade_height = fade_height;
        self
    }

    /// Override the first byte of the mesh region
    pub fn with_region_start(mut self, region_start: i32) -> Self {
        self.region_start = region_start;
        self
    }

    /// Resolve the full geometry for an `NX` × `NY` mesh
    ///
    /// Point counts are persisted as single bytes, so a build with more
    /// than 255 points on either axis is rejected at compile time:
    ///
    /// ```compile_fail
    /// use bedmesh_core::MeshConfig;
    ///
    /// let _ = MeshConfig::default().geometry::<256, 3>();
    /// ```
    pub fn geometry<const NX: usize, const NY: usize>(&self) -> MeshGeometry {
        #[allow(clippy::let_unit_value)]
        let () = PointCounts::<NX, NY>::FIT_IN_RECORD;

        MeshGeometry {
            n_x: NX as u8,
            n_y: NY as u8,
            min_x: self.min_x,
            min_y: self.min_y,
            max_x: self.max_x,
            max_y: self.max_y,
            x_dist: mesh_spacing(self.min_x, self.max_x, NX),
            y_dist: mesh_spacing(self.min_y, self.max_y, NY),
        }
    }
}

/// Compile-time bound on the mesh point counts
struct PointCounts<const NX: usize, const NY: usize>;

impl<const NX: usize, const NY: usize> PointCounts<NX, NY> {
    /// Evaluated once per instantiated build; fails the build when a count
    /// would be truncated in the state record
    const FIT_IN_RECORD: () = assert!(
        NX <= u8::MAX as usize && NY <= u8::MAX as usize,
        "mesh point counts must fit in one byte"
    );
}

/// Grid geometry as it is persisted and checked
///
/// Point counts are stored as bytes; [`MeshConfig::geometry`] refuses to
/// build for more than 255 points per axis.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MeshGeometry {
    /// Mesh points along X
    pub n_x: u8,
    /// Mesh points along Y
    pub n_y: u8,
    /// Lowest mesh X (mm)
    pub min_x: f32,
    /// Lowest mesh Y (mm)
    pub min_y: f32,
    /// Highest mesh X (mm)
    pub max_x: f32,
    /// Highest mesh Y (mm)
    pub max_y: f32,
    /// X distance between mesh lines (mm)
    pub x_dist: f32,
    /// Y distance between mesh lines (mm)
    pub y_dist: f32,
}
