//! Save and Restore Example
//!
//! This example walks a mesh through two simulated power cycles using an
//! EEPROM image file on the host, the same way a firmware build would use
//! its on-chip EEPROM.
//!
//! ## What You'll Learn
//!
//! - Booting against an erased EEPROM and reading the integrity report
//! - Saving a probed mesh to a numbered slot
//! - Persisting the activation flag and Z offset
//! - Restoring everything after a reboot and printing the topography report
//!
//! ## Running the Example
//!
//! ```bash
//! cargo run --example 01_save_restore
//! ```

use bedmesh_core::constants::DEFAULT_EEPROM_SIZE;
use bedmesh_core::{BedLeveling, FileEeprom, MeshConfig, MeshLoad};

/// Stock 10×10 build backed by an image file
type Printer = BedLeveling<FileEeprom, 10, 10>;

fn boot(path: &std::path::Path) -> Result<Printer, Box<dyn std::error::Error>> {
    let eeprom = FileEeprom::open(path, DEFAULT_EEPROM_SIZE as u32)?;
    Ok(BedLeveling::new(eeprom, MeshConfig::default()))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Bedmesh Save/Restore Example ===\n");

    let path = std::env::temp_dir().join("bedmesh_01_save_restore.eeprom");
    let _ = std::fs::remove_file(&path);

    // First boot: nothing has ever been saved
    println!("1. First boot on erased EEPROM");
    let mut ubl = boot(&path)?;
    let report = ubl.load_state()?;
    println!("   Integrity check: {} mismatching fields", report.count());
    for field in report.mismatches() {
        println!("   - {}", field.name());
    }
    println!("   {} mesh slots available", ubl.mesh_slots());

    // Simulated probe: a bed that dishes towards the middle
    println!("\n2. Probing and saving to slot 0");
    for x in 0..10 {
        for y in 0..10 {
            let dx = x as f32 - 4.5;
            let dy = y as f32 - 4.5;
            ubl.mesh.set_z(x, y, 0.002 * (dx * dx + dy * dy) - 0.08);
        }
    }
    // Probe could not reach the back-right corner
    ubl.mesh.set_z(9, 9, f32::NAN);

    let saved = ubl.store_mesh(0)?;
    println!("   Saved slot {} at offset {:#06x}", saved.slot, saved.address);

    ubl.state.active = true;
    ubl.state.z_offset = -0.05;
    ubl.store_state()?;
    println!("   State saved (leveling active, Z offset {:.2})", ubl.state.z_offset);
    drop(ubl);

    // Second boot: the same image comes back
    println!("\n3. Reboot and restore");
    let mut ubl = boot(&path)?;
    let report = ubl.load_state()?;
    println!(
        "   Integrity check: {}",
        if report.is_healthy() { "healthy" } else { "mismatch" }
    );

    match ubl.load_mesh(0)? {
        MeshLoad::Slot(location) => println!("   Mesh restored from slot {}", location.slot),
        MeshLoad::Flat => println!("   No mesh saved, running flat"),
    }
    println!(
        "   Leveling {}, {} of 100 points probed",
        if ubl.state.active { "active" } else { "inactive" },
        ubl.mesh.valid_cell_count()
    );

    let mut report = String::new();
    ubl.display_map(&mut report, 150.0, 150.0)?;
    print!("{}", report);

    let _ = std::fs::remove_file(&path);
    println!("=== Example Complete ===");
    Ok(())
}
