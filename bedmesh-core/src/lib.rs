//! Mesh persistence and integrity for unified bed leveling
//!
//! Keeps the calibrated Z-correction mesh of a 3D printer, saves and
//! restores it from numbered EEPROM slots, and checks that what was saved
//! still matches the firmware that is loading it.
//!
//! Designed for the printer's main controller:
//! - No heap allocation; mesh dimensions are const generics
//! - Works on any byte-addressable EEPROM through the [`Eeprom`] trait
//! - Every operation is synchronous and bounded
//!
//! ```no_run
//! use bedmesh_core::{DefaultBedLeveling, MemEeprom, MeshConfig, NO_MESH_SLOT};
//!
//! let mut ubl = DefaultBedLeveling::new(MemEeprom::new(), MeshConfig::default());
//!
//! // Restore settings at boot
//! let report = ubl.load_state().unwrap();
//! if !report.is_healthy() {
//!     // Saved geometry differs from this build
//! }
//! ubl.load_mesh(NO_MESH_SLOT).unwrap();
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

#[macro_use]
mod macros;

pub mod config;
pub mod constants;
pub mod coordinates;
pub mod display;
pub mod errors;
pub mod leveling;
pub mod mesh;
pub mod sanity;
pub mod state;
pub mod storage;

// Public API
pub use config::{MeshConfig, MeshGeometry};
pub use constants::NO_MESH_SLOT;
pub use errors::{LevelingError, LevelingResult, StorageError, StorageResult};
pub use leveling::{BedLeveling, DefaultBedLeveling, MeshLoad};
pub use mesh::{Grid, MeshStore};
pub use sanity::{GeometryField, SanityReport};
pub use state::{LevelingState, RECORD_SIZE};
pub use storage::{Eeprom, MemEeprom, MeshStorage, SlotLayout, SlotLocation};

#[cfg(feature = "std")]
pub use storage::FileEeprom;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_exists() {
        assert!(!VERSION.is_empty());
    }
}
