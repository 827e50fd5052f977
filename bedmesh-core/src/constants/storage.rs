//! EEPROM Sizing and Slot Addressing
//!
//! The leveling data shares one EEPROM with the rest of the firmware
//! settings. The state record sits at the very top of the device, mesh
//! slots grow downward from just below it, and nothing of ours is ever
//! written below the configured region start.
//!
//! ```text
//! 0x0000 ┌──────────────────────────────┐
//!        │ other firmware settings      │
//! start  ├──────────────────────────────┤  DEFAULT_MESH_REGION_START
//!        │ (unused remainder)           │
//!        │ slot N-1                     │
//!        │ ...                          │
//!        │ slot 1                       │
//!        │ slot 0                       │
//! state  ├──────────────────────────────┤  E2END - RECORD_SIZE
//!        │ leveling state record        │
//! E2END  └──────────────────────────────┘  last addressable byte
//! ```

/// Total EEPROM size of the default build (bytes).
///
/// 4 KiB matches the ATmega2560 on-chip EEPROM.
pub const DEFAULT_EEPROM_SIZE: usize = 4096;

/// Default first byte of the mesh region.
///
/// Everything below is owned by the general settings block.
pub const DEFAULT_MESH_REGION_START: i32 = 0x0400;

/// Reserved slot number meaning "no mesh has ever been saved".
pub const NO_MESH_SLOT: i32 = -1;

/// Value of every byte in freshly erased storage.
pub const ERASED_BYTE: u8 = 0xFF;

/// Size in bytes of one persisted grid value.
pub const GRID_CELL_BYTES: usize = core::mem::size_of::<f32>();
