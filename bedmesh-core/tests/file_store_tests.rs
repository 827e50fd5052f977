//! Tests for the file-backed EEPROM image

#[cfg(feature = "std")]
mod tests {
    use bedmesh_core::{BedLeveling, FileEeprom, MeshConfig, MeshLoad};
    use tempfile::NamedTempFile;

    type HostPrinter = BedLeveling<FileEeprom, 4, 4>;

    fn config() -> MeshConfig {
        MeshConfig::new(20.0, 20.0, 230.0, 230.0).with_region_start(0x200)
    }

    fn boot(path: &std::path::Path) -> HostPrinter {
        BedLeveling::new(FileEeprom::open(path, 2048).unwrap(), config())
    }

    #[test]
    fn test_mesh_survives_restart() {
        let image = NamedTempFile::new().unwrap();

        {
            let mut ubl = boot(image.path());
            ubl.mesh.set_z(0, 0, 0.021);
            ubl.mesh.set_z(3, 3, -0.047);
            ubl.mesh.set_z(2, 1, f32::NAN);
            ubl.state.active = true;
            ubl.store_state().unwrap();
            ubl.store_mesh(2).unwrap();
        }

        let mut ubl = boot(image.path());
        assert!(ubl.load_state().unwrap().is_healthy());
        assert!(ubl.state.active);

        match ubl.load_mesh(2).unwrap() {
            MeshLoad::Slot(location) => assert_eq!(location.slot, 2),
            MeshLoad::Flat => panic!("Expected slot load"),
        }
        assert_eq!(ubl.mesh.z(0, 0), Some(0.021));
        assert_eq!(ubl.mesh.z(3, 3), Some(-0.047));
        assert!(ubl.mesh.z(2, 1).unwrap().is_nan());
    }

    #[test]
    fn test_image_size_and_capacity() {
        let image = NamedTempFile::new().unwrap();
        let ubl = boot(image.path());

        assert_eq!(std::fs::metadata(image.path()).unwrap().len(), 2048);
        // (2047 - 40 - 512) / 64
        assert_eq!(ubl.mesh_slots(), 23);
    }
}
