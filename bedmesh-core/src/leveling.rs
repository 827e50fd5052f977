//! Unified bed leveling context
//!
//! [`BedLeveling`] owns everything the leveling feature keeps between
//! commands: the persisted state record, the in-memory mesh and the EEPROM
//! slot allocator. The firmware creates one at startup and hands it to
//! whichever command or planner step needs it; there are no globals.
//!
//! ## Persistence
//!
//! ```text
//! store_state ─► record ─► [E2END - 40, E2END)
//! load_state  ◄─ record ◄─ ...  then sanity check + fade migration
//! store_mesh(n) ─► grid ─► slot n
//! load_mesh(n)  ◄─ grid ◄─ slot n   (n = -1: no mesh saved, go flat)
//! ```
//!
//! ## Concurrency
//!
//! Every operation runs to completion on the caller's thread. The firmware
//! processes one command at a time, so no locking is done here; a port that
//! handles commands concurrently must put the whole context behind a single
//! mutex, since overlapping slot writes corrupt neighbouring slots.

use crate::config::{MeshConfig, MeshGeometry};
use crate::constants::{
    DEFAULT_EEPROM_SIZE, DEFAULT_MESH_POINTS_X, DEFAULT_MESH_POINTS_Y, NO_MESH_SLOT,
};
use crate::errors::LevelingResult;
use crate::mesh::MeshStore;
use crate::sanity::SanityReport;
use crate::state::LevelingState;
use crate::storage::{Eeprom, MemEeprom, MeshStorage, SlotLayout, SlotLocation};

/// Outcome of [`BedLeveling::load_mesh`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshLoad {
    /// No mesh had been saved; the mesh was reset flat
    Flat,
    /// The mesh was read from this slot
    Slot(SlotLocation),
}

/// The stock build: a 10 × 10 mesh on a 4 KiB on-chip EEPROM image
pub type DefaultBedLeveling =
    BedLeveling<MemEeprom<DEFAULT_EEPROM_SIZE>, DEFAULT_MESH_POINTS_X, DEFAULT_MESH_POINTS_Y>;

/// Leveling state, mesh and storage for an `NX` × `NY` build
///
/// ```rust
/// use bedmesh_core::{BedLeveling, MemEeprom, MeshConfig, MeshLoad};
///
/// let config = MeshConfig::new(0.0, 0.0, 100.0, 100.0);
/// let mut ubl: BedLeveling<MemEeprom<4096>, 3, 3> = BedLeveling::new(MemEeprom::new(), config);
///
/// ubl.mesh.set_z(1, 1, 0.05);
/// let saved = ubl.store_mesh(0)?;
///
/// ubl.reset();
/// assert_eq!(ubl.load_mesh(0)?, MeshLoad::Slot(saved));
/// assert_eq!(ubl.mesh.z(1, 1), Some(0.05));
/// # Ok::<(), bedmesh_core::LevelingError>(())
/// ```
#[derive(Debug)]
pub struct BedLeveling<S, const NX: usize, const NY: usize> {
    /// Active flag, offset and geometry/fade parameters
    pub state: LevelingState,
    /// In-memory correction grid
    pub mesh: MeshStore<NX, NY>,
    geometry: MeshGeometry,
    storage: MeshStorage<S, NX, NY>,
}

impl<S: Eeprom, const NX: usize, const NY: usize> BedLeveling<S, NX, NY> {
    /// Build the context over `device` and start from a flat, inactive mesh
    pub fn new(device: S, config: MeshConfig) -> Self {
        let geometry = config.geometry::<NX, NY>();
        let mut leveling = Self {
            state: LevelingState::for_build(geometry, config.fade_height),
            mesh: MeshStore::new(&geometry),
            geometry,
            storage: MeshStorage::new(device, config.region_start),
        };
        leveling.reset();
        leveling
    }

    /// Deactivate leveling and flatten the mesh
    pub fn reset(&mut self) {
        self.state.active = false;
        self.state.z_offset = 0.0;
        self.mesh.reset();
    }

    /// Deactivate leveling and mark every cell unknown
    pub fn invalidate(&mut self) {
        self.state.active = false;
        self.state.z_offset = 0.0;
        self.mesh.invalidate();
    }

    /// Geometry of the running build
    pub fn geometry(&self) -> &MeshGeometry {
        &self.geometry
    }

    /// EEPROM address map
    pub fn slot_layout(&self) -> &SlotLayout {
        self.storage.layout()
    }

    /// Number of mesh slots the EEPROM region holds
    pub fn mesh_slots(&self) -> u32 {
        self.storage.layout().capacity()
    }

    /// Underlying EEPROM device
    pub fn device(&self) -> &S {
        self.storage.device()
    }

    /// Underlying EEPROM device, mutable
    pub fn device_mut(&mut self) -> &mut S {
        self.storage.device_mut()
    }

    /// Persist the state record
    pub fn store_state(&mut self) -> LevelingResult<()> {
        self.storage.write_record(&self.state)?;
        Ok(())
    }

    /// Load the state record and check it against the build
    ///
    /// Geometry mismatches are logged and returned in the report, but the
    /// loaded record is kept either way. A record whose fade multiplier is
    /// out of step with its fade height is repaired and written back.
    pub fn load_state(&mut self) -> LevelingResult<SanityReport> {
        self.state = self.storage.read_record()?;

        let report = self.sanity_check();
        if !report.is_healthy() {
            log_error!("load_state: sanity check failed with {} mismatches", report.count());
        }

        if self.state.fade_multiplier_is_stale() {
            log_warn!(
                "Fade multiplier {} does not match fade height {}, rewriting state",
                self.state.fade_height_multiplier,
                self.state.fade_height
            );
            self.state.refresh_fade_multiplier();
            self.store_state()?;
        }

        Ok(report)
    }

    /// Replace the mesh with the grid saved in `slot`
    ///
    /// `NO_MESH_SLOT` means nothing was ever saved: the mesh is reset flat.
    /// Any other invalid slot is an error and the mesh is left untouched.
    pub fn load_mesh(&mut self, slot: i32) -> LevelingResult<MeshLoad> {
        if slot == NO_MESH_SLOT {
            log_info!("No mesh saved in EEPROM. Zeroing mesh in memory.");
            self.reset();
            return Ok(MeshLoad::Flat);
        }

        let (grid, location) = self.storage.read_slot(slot).map_err(|err| {
            log_error!("EEPROM storage not available to load mesh: {}", err);
            err
        })?;
        self.mesh.set_values(grid);

        log_info!("Mesh loaded from slot {} at offset {:#x}", location.slot, location.address);
        Ok(MeshLoad::Slot(location))
    }

    /// Save the mesh to `slot`
    pub fn store_mesh(&mut self, slot: i32) -> LevelingResult<SlotLocation> {
        let location = match self.storage.write_slot(slot, self.mesh.values()) {
            Ok(location) => location,
            Err(err) => {
                let layout = self.storage.layout();
                log_error!(
                    "EEPROM storage not available to store mesh: {} (slot {}, {} slots of {} bytes, region {} bytes from {:#x}, end {:#x}, state {:#x})",
                    err,
                    slot,
                    layout.capacity(),
                    layout.slot_size(),
                    layout.region_size(),
                    layout.region_start(),
                    layout.store_end(),
                    layout.state_address()
                );
                return Err(err);
            }
        };

        log_info!("Mesh saved in slot {} at offset {:#x}", location.slot, location.address);
        Ok(location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{LevelingError, StorageError};
    use crate::storage::MemEeprom;

    type Ubl = BedLeveling<MemEeprom<1024>, 3, 3>;

    fn ubl() -> Ubl {
        BedLeveling::new(MemEeprom::new(), MeshConfig::new(0.0, 0.0, 100.0, 100.0).with_region_start(256))
    }

    #[test]
    fn starts_flat_and_inactive() {
        let ubl = ubl();
        assert!(!ubl.state.active);
        assert!(ubl.mesh.is_flat());
        assert_eq!(ubl.state.geometry, *ubl.geometry());
        assert_eq!(ubl.device().write_count(), 0);
    }

    #[test]
    fn default_build_geometry() {
        let ubl = DefaultBedLeveling::new(MemEeprom::new(), MeshConfig::default());
        assert_eq!(ubl.geometry().n_x as usize, DEFAULT_MESH_POINTS_X);
        assert_eq!(ubl.geometry().n_y as usize, DEFAULT_MESH_POINTS_Y);
        assert_eq!(ubl.device().capacity() as usize, DEFAULT_EEPROM_SIZE);
        assert_eq!(ubl.slot_layout().slot_size(), 400);
    }

    #[test]
    fn invalidate_clears_activation() {
        let mut ubl = ubl();
        ubl.state.active = true;
        ubl.state.z_offset = 0.4;
        ubl.invalidate();
        assert!(!ubl.state.active);
        assert_eq!(ubl.state.z_offset, 0.0);
        assert_eq!(ubl.mesh.valid_cell_count(), 0);
    }

    #[test]
    fn no_mesh_slot_goes_flat() {
        let mut ubl = ubl();
        ubl.invalidate();
        assert_eq!(ubl.load_mesh(NO_MESH_SLOT), Ok(MeshLoad::Flat));
        assert!(ubl.mesh.is_flat());
    }

    #[test]
    fn failed_load_keeps_mesh() {
        let mut ubl = ubl();
        ubl.mesh.set_z(0, 2, 0.75);
        let slots = ubl.mesh_slots() as i32;

        assert!(matches!(ubl.load_mesh(slots), Err(LevelingError::SlotOutOfRange { .. })));
        assert!(matches!(ubl.load_mesh(-2), Err(LevelingError::SlotOutOfRange { .. })));
        assert_eq!(ubl.mesh.z(0, 2), Some(0.75));
    }

    #[test]
    fn state_round_trip() {
        let mut ubl = ubl();
        ubl.state.active = true;
        ubl.state.z_offset = 0.12;
        ubl.store_state().unwrap();

        ubl.reset();
        let report = ubl.load_state().unwrap();
        assert!(report.is_healthy());
        assert!(ubl.state.active);
        assert_eq!(ubl.state.z_offset, 0.12);
        assert_eq!(ubl.device().write_count(), 1);
    }

    #[test]
    fn store_failure_propagates() {
        struct Broken;
        impl Eeprom for Broken {
            fn read(&mut self, _: u32, _: &mut [u8]) -> crate::errors::StorageResult<()> {
                Err(StorageError::ReadFailed)
            }
            fn write(&mut self, _: u32, _: &[u8]) -> crate::errors::StorageResult<()> {
                Err(StorageError::WriteFailed)
            }
            fn capacity(&self) -> u32 {
                1024
            }
        }

        let mut ubl: BedLeveling<Broken, 3, 3> =
            BedLeveling::new(Broken, MeshConfig::new(0.0, 0.0, 100.0, 100.0).with_region_start(256));
        ubl.mesh.set_z(1, 1, 0.5);

        assert_eq!(ubl.store_state(), Err(LevelingError::Storage(StorageError::WriteFailed)));
        assert_eq!(ubl.store_mesh(0), Err(LevelingError::Storage(StorageError::WriteFailed)));
        assert_eq!(ubl.load_mesh(0), Err(LevelingError::Storage(StorageError::ReadFailed)));
        assert_eq!(ubl.mesh.z(1, 1), Some(0.5));
    }
}
