//! Typed access to mesh slots and the state record

use super::{Eeprom, SlotLayout, SlotLocation};
use crate::errors::{LevelingResult, StorageResult};
use crate::mesh::{Grid, MeshStore};
use crate::state::{LevelingState, RECORD_SIZE};

/// Transfer buffer size; a multiple of the cell size
const STAGING_BYTES: usize = 64;

/// Slot allocator over an EEPROM device for `NX` × `NY` grids
#[derive(Debug)]
pub struct MeshStorage<S, const NX: usize, const NY: usize> {
    device: S,
    layout: SlotLayout,
}

impl<S: Eeprom, const NX: usize, const NY: usize> MeshStorage<S, NX, NY> {
    /// Lay out the leveling region of `device`
    pub fn new(device: S, region_start: i32) -> Self {
        let layout = SlotLayout::new(
            device.end(),
            RECORD_SIZE as u32,
            MeshStore::<NX, NY>::BYTE_SIZE as u32,
            region_start,
        );
        Self { device, layout }
    }

    /// Address map in use
    pub fn layout(&self) -> &SlotLayout {
        &self.layout
    }

    /// Underlying device
    pub fn device(&self) -> &S {
        &self.device
    }

    /// Underlying device, mutable
    pub fn device_mut(&mut self) -> &mut S {
        &mut self.device
    }

    /// Read the state record
    pub fn read_record(&mut self) -> StorageResult<LevelingState> {
        let mut bytes = [0u8; RECORD_SIZE];
        self.device.read(self.layout.state_address(), &mut bytes)?;
        Ok(LevelingState::from_bytes(&bytes))
    }

    /// Write the state record
    pub fn write_record(&mut self, state: &LevelingState) -> StorageResult<()> {
        self.device.write(self.layout.state_address(), &state.to_bytes())
    }

    /// Read one grid from `slot`
    ///
    /// The grid is assembled off to the side, so a failed read leaves the
    /// caller's mesh alone.
    pub fn read_slot(&mut self, slot: i32) -> LevelingResult<(Grid<NX, NY>, SlotLocation)> {
        let location = self.layout.locate(slot)?;

        let mut grid = [[0.0f32; NY]; NX];
        let mut cells = grid.iter_mut().flatten();
        let mut staging = [0u8; STAGING_BYTES];
        let total = MeshStore::<NX, NY>::BYTE_SIZE;
        let mut offset = 0;

        while offset < total {
            let len = STAGING_BYTES.min(total - offset);
            self.device.read(location.address + offset as u32, &mut staging[..len])?;

            for (chunk, cell) in staging[..len].chunks_exact(4).zip(&mut cells) {
                let mut raw = [0u8; 4];
                raw.copy_from_slice(chunk);
                *cell = f32::from_le_bytes(raw);
            }
            offset += len;
        }

        Ok((grid, location))
    }

    /// Write one grid to `slot`
    pub fn write_slot(&mut self, slot: i32, grid: &Grid<NX, NY>) -> LevelingResult<SlotLocation> {
        let location = self.layout.locate(slot)?;

        let mut staging = [0u8; STAGING_BYTES];
        let mut filled = 0;
        let mut cursor = location.address;

        for z in grid.iter().flatten() {
            staging[filled..filled + 4].copy_from_slice(&z.to_le_bytes());
            filled += 4;

            if filled == STAGING_BYTES {
                self.device.write(cursor, &staging)?;
                cursor += filled as u32;
                filled = 0;
            }
        }
        if filled > 0 {
            self.device.write(cursor, &staging[..filled])?;
        }

        Ok(location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::LevelingError;
    use crate::storage::MemEeprom;

    #[test]
    fn record_round_trip() {
        let mut storage = MeshStorage::<_, 3, 3>::new(MemEeprom::<512>::new(), 64);
        let mut state = LevelingState::for_build(
            crate::MeshConfig::new(0.0, 0.0, 100.0, 100.0).geometry::<3, 3>(),
            10.0,
        );
        state.active = true;
        state.z_offset = 0.3;

        storage.write_record(&state).unwrap();
        assert_eq!(storage.read_record().unwrap(), state);

        let start = storage.layout().state_address() as usize;
        assert_eq!(&storage.device().contents()[start..start + RECORD_SIZE], &state.to_bytes());
    }

    #[test]
    fn grid_larger_than_staging_buffer() {
        // 6x5 grid = 120 bytes, two staging passes
        let mut storage = MeshStorage::<_, 6, 5>::new(MemEeprom::<1024>::new(), 16);
        let mut grid = [[0.0f32; 5]; 6];
        for (x, column) in grid.iter_mut().enumerate() {
            for (y, z) in column.iter_mut().enumerate() {
                *z = x as f32 * 0.1 - y as f32 * 0.01;
            }
        }
        grid[2][3] = f32::NAN;

        let written = storage.write_slot(2, &grid).unwrap();
        let (read, location) = storage.read_slot(2).unwrap();
        assert_eq!(written, location);
        assert_eq!(location.address, storage.layout().state_address() - 3 * 120);
        for (a, b) in grid.iter().flatten().zip(read.iter().flatten()) {
            assert_eq!(a.to_bits(), b.to_bits());
        }
        assert_eq!(storage.device().write_count(), 2);
    }

    #[test]
    fn rejected_slot_never_touches_device() {
        let mut storage = MeshStorage::<_, 3, 3>::new(MemEeprom::<256>::new(), 64);
        let capacity = storage.layout().capacity();
        let result = storage.write_slot(capacity as i32, &[[1.0; 3]; 3]);
        assert!(matches!(result, Err(LevelingError::SlotOutOfRange { .. })));
        assert_eq!(storage.device().write_count(), 0);
    }
}
