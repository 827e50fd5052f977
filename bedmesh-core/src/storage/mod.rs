//! Byte-addressable persistent storage
//!
//! ## Overview
//!
//! Leveling data lives in the same EEPROM as the rest of the firmware
//! settings. This module provides:
//!
//! - [`Eeprom`]: the device interface (byte reads and writes, no erase)
//! - [`MemEeprom`]: RAM-backed device for tests and for boards that emulate
//!   EEPROM in a flash page managed elsewhere
//! - [`FileEeprom`]: host image file, for simulators (`std` only)
//! - [`SlotLayout`]: every address calculation the leveling code needs
//! - [`MeshStorage`]: typed slot and record access on top of a device
//!
//! ## Device Characteristics
//!
//! - Byte granularity: any address, any length within capacity
//! - Erased bytes read as `0xFF`
//! - Writes are blocking and complete before returning
//! - Single owner; the caller serialises access

mod layout;
mod memory;
mod slots;

#[cfg(feature = "std")]
mod file;

pub use layout::{SlotLayout, SlotLocation};
pub use memory::MemEeprom;
pub use slots::MeshStorage;

#[cfg(feature = "std")]
pub use file::FileEeprom;

use crate::errors::{StorageError, StorageResult};

/// EEPROM device interface
///
/// Implementations must reject any access that extends past
/// [`capacity`](Eeprom::capacity) without touching the device.
pub trait Eeprom {
    /// Read `buf.len()` bytes starting at `address`
    fn read(&mut self, address: u32, buf: &mut [u8]) -> StorageResult<()>;

    /// Write `data` starting at `address`
    fn write(&mut self, address: u32, data: &[u8]) -> StorageResult<()>;

    /// Device size in bytes
    fn capacity(&self) -> u32;

    /// Last addressable byte
    fn end(&self) -> u32 {
        self.capacity().saturating_sub(1)
    }
}

/// Validate an access and return its byte range
pub(crate) fn checked_range(address: u32, len: usize, capacity: u32) -> StorageResult<core::ops::Range<usize>> {
    let start = address as usize;
    match start.checked_add(len) {
        Some(end) if end <= capacity as usize => Ok(start..end),
        _ => Err(StorageError::OutOfBounds {
            address,
            len,
            capacity,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_checks() {
        assert_eq!(checked_range(0, 16, 16), Ok(0..16));
        assert_eq!(checked_range(15, 1, 16), Ok(15..16));
        assert!(checked_range(15, 2, 16).is_err());
        assert!(checked_range(u32::MAX, 1, 16).is_err());
    }
}
