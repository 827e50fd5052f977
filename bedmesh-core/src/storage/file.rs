//! File-backed EEPROM image
//!
//! Lets a simulator or host tool keep leveling data across runs. The image
//! is a flat byte file the size of the emulated device.

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

use super::{checked_range, Eeprom};
use crate::constants::ERASED_BYTE;
use crate::errors::{StorageError, StorageResult};

/// EEPROM image stored in a host file
///
/// ## Example
///
/// ```rust,no_run
/// use bedmesh_core::storage::{Eeprom, FileEeprom};
///
/// let mut eeprom = FileEeprom::open("printer.eeprom", 4096)?;
/// eeprom.write(0x0ff0, &[0x01])?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct FileEeprom {
    file: File,
    capacity: u32,
}

impl FileEeprom {
    /// Open or create an image of `capacity` bytes
    ///
    /// A new or short file is extended with erased bytes; existing contents
    /// are kept.
    pub fn open<P: AsRef<Path>>(path: P, capacity: u32) -> std::io::Result<Self> {
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)?;

        let current = file.metadata()?.len();
        if current < u64::from(capacity) {
            file.seek(SeekFrom::Start(current))?;
            let padding = vec![ERASED_BYTE; (u64::from(capacity) - current) as usize];
            file.write_all(&padding)?;
            file.flush()?;
        }

        Ok(Self { file, capacity })
    }
}

impl Eeprom for FileEeprom {
    fn read(&mut self, address: u32, buf: &mut [u8]) -> StorageResult<()> {
        checked_range(address, buf.len(), self.capacity)?;

        self.file
            .seek(SeekFrom::Start(u64::from(address)))
            .and_then(|_| self.file.read_exact(buf))
            .map_err(|err| {
                log_error!("EEPROM image read at {:#x} failed: {}", address, err);
                StorageError::ReadFailed
            })
    }

    fn write(&mut self, address: u32, data: &[u8]) -> StorageResult<()> {
        checked_range(address, data.len(), self.capacity)?;

        self.file
            .seek(SeekFrom::Start(u64::from(address)))
            .and_then(|_| self.file.write_all(data))
            .and_then(|_| self.file.flush())
            .map_err(|err| {
                log_error!("EEPROM image write at {:#x} failed: {}", address, err);
                StorageError::WriteFailed
            })
    }

    fn capacity(&self) -> u32 {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn new_image_is_erased() {
        let temp = NamedTempFile::new().unwrap();
        let mut eeprom = FileEeprom::open(temp.path(), 128).unwrap();

        let mut buf = [0u8; 128];
        eeprom.read(0, &mut buf).unwrap();
        assert!(buf.iter().all(|&b| b == ERASED_BYTE));
        assert_eq!(std::fs::metadata(temp.path()).unwrap().len(), 128);
    }

    #[test]
    fn contents_survive_reopen() {
        let temp = NamedTempFile::new().unwrap();
        {
            let mut eeprom = FileEeprom::open(temp.path(), 64).unwrap();
            eeprom.write(60, &[1, 2, 3, 4]).unwrap();
        }

        let mut eeprom = FileEeprom::open(temp.path(), 64).unwrap();
        let mut buf = [0u8; 4];
        eeprom.read(60, &mut buf).unwrap();
        assert_eq!(buf, [1, 2, 3, 4]);
        assert!(eeprom.write(61, &[0; 4]).is_err());
    }
}
