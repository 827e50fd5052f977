//! Slot addressing
//!
//! All address arithmetic for the leveling region is done here and nowhere
//! else. Slots are numbered upward from the one adjacent to the state
//! record, so addresses decrease as the slot number grows:
//!
//! ```text
//! state_address = store_end - record_size
//! slot(n)       = state_address - (n + 1) * slot_size
//! capacity      = (state_address - region_start) / slot_size
//! ```
//!
//! Capacity is derived from the grid size, never configured, so a build
//! with a different mesh resolution recomputes how many slots fit.

use crate::errors::{LevelingError, LevelingResult};

/// Resolved position of a mesh slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SlotLocation {
    /// Slot number
    pub slot: u32,
    /// First byte of the slot
    pub address: u32,
}

/// Address map of the leveling region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotLayout {
    store_end: u32,
    record_size: u32,
    slot_size: u32,
    region_start: i32,
}

impl SlotLayout {
    /// Describe a region ending at `store_end` (the device's last byte)
    pub const fn new(store_end: u32, record_size: u32, slot_size: u32, region_start: i32) -> Self {
        Self {
            store_end,
            record_size,
            slot_size,
            region_start,
        }
    }

    /// Last addressable byte of the device
    pub const fn store_end(&self) -> u32 {
        self.store_end
    }

    /// Bytes per slot (one grid)
    pub const fn slot_size(&self) -> u32 {
        self.slot_size
    }

    /// Configured start of the mesh region
    pub const fn region_start(&self) -> i32 {
        self.region_start
    }

    /// Address of the state record
    pub const fn state_address(&self) -> u32 {
        self.store_end.saturating_sub(self.record_size)
    }

    /// Bytes between the region start and the state record
    pub fn region_size(&self) -> u32 {
        let size = i64::from(self.state_address()) - i64::from(self.region_start);
        size.clamp(0, i64::from(u32::MAX)) as u32
    }

    /// Number of whole slots that fit in the region
    pub fn capacity(&self) -> u32 {
        if self.slot_size == 0 {
            return 0;
        }
        self.region_size() / self.slot_size
    }

    /// Resolve `slot` to an address, refusing anything outside the region
    pub fn locate(&self, slot: i32) -> LevelingResult<SlotLocation> {
        if self.region_start <= 0 {
            return Err(LevelingError::RegionNotConfigured {
                start: self.region_start,
            });
        }

        let capacity = self.capacity();
        let slot = match u32::try_from(slot) {
            Ok(slot) if slot < capacity => slot,
            _ => {
                return Err(LevelingError::SlotOutOfRange {
                    slot,
                    capacity,
                    region_size: self.region_size(),
                })
            }
        };

        Ok(SlotLocation {
            slot,
            address: self.state_address() - (slot + 1) * self.slot_size,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // 4 KiB device, 40-byte record, 3x3 grid of f32
    fn layout(region_start: i32) -> SlotLayout {
        SlotLayout::new(4095, 40, 36, region_start)
    }

    #[test]
    fn record_sits_below_end() {
        let layout = layout(1024);
        assert_eq!(layout.store_end(), 4095);
        assert_eq!(layout.slot_size(), 36);
        assert_eq!(layout.region_start(), 1024);
        assert_eq!(layout.state_address(), 4055);
        assert_eq!(layout.region_size(), 3031);
        assert_eq!(layout.capacity(), 84);
    }

    #[test]
    fn slots_grow_downward() {
        let layout = layout(1024);
        assert_eq!(layout.locate(0).unwrap().address, 4055 - 36);
        assert_eq!(layout.locate(1).unwrap().address, 4055 - 72);

        let last = layout.locate(83).unwrap();
        assert!(last.address >= 1024);
        assert_eq!(last.address, 4055 - 84 * 36);
    }

    #[test]
    fn capacity_boundary() {
        // Exactly four slots between start and record
        let layout = layout(4055 - 4 * 36);
        assert_eq!(layout.capacity(), 4);
        assert!(layout.locate(3).is_ok());
        assert_eq!(
            layout.locate(4),
            Err(LevelingError::SlotOutOfRange { slot: 4, capacity: 4, region_size: 144 })
        );
        assert!(matches!(layout.locate(-1), Err(LevelingError::SlotOutOfRange { .. })));
    }

    #[test]
    fn unconfigured_region() {
        assert_eq!(layout(0).locate(0), Err(LevelingError::RegionNotConfigured { start: 0 }));
        assert_eq!(layout(-8).locate(0), Err(LevelingError::RegionNotConfigured { start: -8 }));
    }

    #[test]
    fn region_past_record_holds_nothing() {
        let layout = layout(4090);
        assert_eq!(layout.region_size(), 0);
        assert_eq!(layout.capacity(), 0);
    }

    proptest! {
        #[test]
        fn capacity_is_floor_of_region(start in 1i32..4055, slot_size in 1u32..512) {
            let layout = SlotLayout::new(4095, 40, slot_size, start);
            prop_assert_eq!(layout.capacity(), (4055 - start) as u32 / slot_size);
        }

        #[test]
        fn capacity_grows_with_region(start in 2i32..4055, slot_size in 1u32..512) {
            let smaller = SlotLayout::new(4095, 40, slot_size, start);
            let larger = SlotLayout::new(4095, 40, slot_size, start - 1);
            prop_assert!(larger.capacity() >= smaller.capacity());
        }

        #[test]
        fn located_slots_stay_in_region(start in 1i32..4055, slot_size in 1u32..512, slot in 0i32..4096) {
            let layout = SlotLayout::new(4095, 40, slot_size, start);
            if let Ok(location) = layout.locate(slot) {
                prop_assert!(i64::from(location.address) >= i64::from(start));
                prop_assert!(location.address + slot_size <= layout.state_address());
            }
        }
    }
}
