//! Constants for Bedmesh Core
//!
//! This module provides the compiled-in values a firmware build bakes into
//! both its code and its persisted records. Everything that ends up in the
//! EEPROM layout or in the integrity check is defined here.
//!
//! ## Organization
//!
//! Constants are grouped by domain:
//! - **Geometry**: Default bed extents, mesh point counts, fade height
//! - **Storage**: EEPROM size, mesh region start, reserved slot values
//!
//! ## Usage Guidelines
//!
//! 1. Always use these constants instead of magic numbers
//! 2. Changing any geometry constant invalidates previously saved meshes;
//!    the integrity check will report the mismatching fields on next boot
//! 3. Use descriptive names that include units

/// Default bed geometry and leveling parameters.
pub mod geometry;

/// EEPROM sizing and mesh slot addressing constants.
pub mod storage;

// Re-export commonly used constants for convenience
pub use geometry::{
    DEFAULT_MESH_POINTS_X, DEFAULT_MESH_POINTS_Y,
    MESH_MIN_X_MM, MESH_MIN_Y_MM, MESH_MAX_X_MM, MESH_MAX_Y_MM,
    DEFAULT_FADE_HEIGHT_MM, LAST_SPECIFIED_Z_RESET_MM,
};

pub use storage::{
    DEFAULT_EEPROM_SIZE, DEFAULT_MESH_REGION_START, NO_MESH_SLOT, ERASED_BYTE,
};
