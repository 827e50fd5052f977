//! RAM-backed EEPROM

use super::{checked_range, Eeprom};
use crate::constants::ERASED_BYTE;
use crate::errors::StorageResult;

/// In-memory EEPROM of `N` bytes
///
/// Starts fully erased. Counts writes so callers can confirm that a
/// rejected operation never reached the device.
///
/// ```
/// use bedmesh_core::storage::{Eeprom, MemEeprom};
///
/// let mut eeprom = MemEeprom::<64>::new();
/// eeprom.write(0x10, &[1, 2, 3]).unwrap();
///
/// let mut buf = [0u8; 4];
/// eeprom.read(0x10, &mut buf).unwrap();
/// assert_eq!(buf, [1, 2, 3, 0xFF]);
/// assert_eq!(eeprom.write_count(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct MemEeprom<const N: usize> {
    bytes: [u8; N],
    writes: u32,
}

impl<const N: usize> MemEeprom<N> {
    /// Create an erased device
    pub const fn new() -> Self {
        Self {
            bytes: [ERASED_BYTE; N],
            writes: 0,
        }
    }

    /// Raw contents (for test verification)
    pub fn contents(&self) -> &[u8] {
        &self.bytes
    }

    /// Number of successful writes since creation
    pub fn write_count(&self) -> u32 {
        self.writes
    }

    /// Return every byte to the erased state
    pub fn erase(&mut self) {
        self.bytes.fill(ERASED_BYTE);
    }
}

impl<const N: usize> Default for MemEeprom<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> Eeprom for MemEeprom<N> {
    fn read(&mut self, address: u32, buf: &mut [u8]) -> StorageResult<()> {
        let range = checked_range(address, buf.len(), self.capacity())?;
        buf.copy_from_slice(&self.bytes[range]);
        Ok(())
    }

    fn write(&mut self, address: u32, data: &[u8]) -> StorageResult<()> {
        let range = checked_range(address, data.len(), self.capacity())?;
        self.bytes[range].copy_from_slice(data);
        self.writes += 1;
        Ok(())
    }

    fn capacity(&self) -> u32 {
        N as u32
    }
}
