//! Error Types for Mesh Persistence
//!
//! ## Design Philosophy
//!
//! The leveling core runs inside a firmware command loop, so errors follow
//! the same rules as everything else on the hot path:
//!
//! 1. **No Heap Allocation**: Payloads are plain scalars. An error can be
//!    logged over defmt or serial without formatting into a buffer first.
//!
//! 2. **Copy Semantics**: Errors are `Copy` and cheap to return through
//!    several layers.
//!
//! 3. **Recoverable**: Nothing here is fatal. Every failing operation leaves
//!    the in-memory mesh as it was, and the firmware keeps running.
//!
//! ## Error Categories
//!
//! ### Storage exhaustion
//! - `RegionNotConfigured`: the build reserved no EEPROM for meshes
//! - `SlotOutOfRange`: the requested slot does not fit in the region
//!
//! ### Device failures
//! - `Storage`: the byte store rejected a read or write
//!
//! Geometry mismatches in a loaded record are *not* errors; they are
//! collected in a [`SanityReport`](crate::sanity::SanityReport) and the
//! caller decides what to do with them.
//!
//! ## Error Handling Strategy
//!
//! ```rust
//! use bedmesh_core::{BedLeveling, LevelingError, MeshConfig, MemEeprom};
//!
//! let mut ubl: BedLeveling<MemEeprom<4096>, 3, 3> =
//!     BedLeveling::new(MemEeprom::new(), MeshConfig::new(0.0, 0.0, 100.0, 100.0));
//!
//! match ubl.store_mesh(99) {
//!     Ok(location) => {
//!         // Saved - tell the user where
//!         let _ = location.address;
//!     }
//!     Err(LevelingError::SlotOutOfRange { capacity, .. }) => {
//!         // Ask for a slot below `capacity`
//!         let _ = capacity;
//!     }
//!     Err(_) => {
//!         // Region missing or device failure - nothing was written
//!     }
//! }
//! ```

use thiserror_no_std::Error;

/// Result type for leveling persistence operations
pub type LevelingResult<T> = Result<T, LevelingError>;

/// Result type for raw byte store operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Failures reported by a byte-addressable store
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageError {
    /// Access would fall outside the device
    #[error("Access of {len} bytes at {address:#06x} exceeds capacity {capacity}")]
    OutOfBounds {
        /// First byte of the attempted access
        address: u32,
        /// Number of bytes requested
        len: usize,
        /// Device size in bytes
        capacity: u32,
    },

    /// The device failed to return data
    #[error("Storage read failed")]
    ReadFailed,

    /// The device failed to accept data
    #[error("Storage write failed")]
    WriteFailed,
}

/// Errors from mesh slot and state record persistence
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelingError {
    /// The build has no mesh region (start offset is zero or negative)
    #[error("No mesh region configured (start offset {start})")]
    RegionNotConfigured {
        /// Configured region start offset
        start: i32,
    },

    /// Slot index outside `[0, capacity)`
    #[error("Mesh slot {slot} unavailable: {capacity} slots fit in {region_size} bytes")]
    SlotOutOfRange {
        /// Slot that was requested
        slot: i32,
        /// Number of slots the region holds
        capacity: u32,
        /// Bytes between the region start and the state record
        region_size: u32,
    },

    /// Underlying store failure
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

#[cfg(feature = "defmt")]
impl defmt::Format for StorageError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::OutOfBounds { address, len, capacity } =>
                defmt::write!(fmt, "{} bytes at {=u32:#x} exceed capacity {}", len, *address, capacity),
            Self::ReadFailed =>
                defmt::write!(fmt, "Storage read failed"),
            Self::WriteFailed =>
                defmt::write!(fmt, "Storage write failed"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for LevelingError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::RegionNotConfigured { start } =>
                defmt::write!(fmt, "No mesh region (start {})", start),
            Self::SlotOutOfRange { slot, capacity, region_size } =>
                defmt::write!(fmt, "Slot {} unavailable: {} slots in {} bytes", slot, capacity, region_size),
            Self::Storage(err) =>
                defmt::write!(fmt, "Storage: {}", err),
        }
    }
}
