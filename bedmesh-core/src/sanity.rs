//! Integrity check for loaded state records
//!
//! A record saved by a build with a different mesh resolution or bed size
//! decodes without error but describes the wrong grid. The check compares
//! every geometry field of the record with the running build and confirms
//! that at least one slot fits in the mesh region.
//!
//! Mismatches are counted and logged one by one. Nothing is blocked: the
//! firmware keeps whatever it loaded and the caller decides whether a
//! nonzero count matters.

use heapless::Vec;

use crate::config::MeshGeometry;
use crate::leveling::BedLeveling;
use crate::storage::Eeprom;

/// Field of a state record that can disagree with the build
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GeometryField {
    /// Mesh points along X
    PointsX,
    /// Mesh points along Y
    PointsY,
    /// Lowest mesh X
    MinX,
    /// Lowest mesh Y
    MinY,
    /// Highest mesh X
    MaxX,
    /// Highest mesh Y
    MaxY,
    /// X line spacing
    DistX,
    /// Y line spacing
    DistY,
    /// Not even one mesh slot fits in the EEPROM region
    SlotCapacity,
}

impl GeometryField {
    /// Build constant the field is checked against
    pub const fn name(self) -> &'static str {
        match self {
            Self::PointsX => "MESH_NUM_X_POINTS",
            Self::PointsY => "MESH_NUM_Y_POINTS",
            Self::MinX => "MESH_MIN_X",
            Self::MinY => "MESH_MIN_Y",
            Self::MaxX => "MESH_MAX_X",
            Self::MaxY => "MESH_MAX_Y",
            Self::DistX => "MESH_X_DIST",
            Self::DistY => "MESH_Y_DIST",
            Self::SlotCapacity => "EEPROM mesh region",
        }
    }
}

/// Maximum number of distinct mismatches
pub const MAX_MISMATCHES: usize = 9;

/// Result of an integrity check
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SanityReport {
    mismatches: Vec<GeometryField, MAX_MISMATCHES>,
}

impl SanityReport {
    /// Number of mismatches; zero means healthy
    pub fn count(&self) -> usize {
        self.mismatches.len()
    }

    /// True when nothing disagreed
    pub fn is_healthy(&self) -> bool {
        self.mismatches.is_empty()
    }

    /// Mismatching fields in check order
    pub fn mismatches(&self) -> &[GeometryField] {
        &self.mismatches
    }

    /// Whether `field` disagreed
    pub fn contains(&self, field: GeometryField) -> bool {
        self.mismatches.contains(&field)
    }

    fn record(&mut self, field: GeometryField) {
        match field {
            GeometryField::SlotCapacity => {
                log_error!("No EEPROM storage available for a mesh of this size")
            }
            _ => log_error!("{} set wrong", field.name()),
        }
        // Each field is checked once, so this never overflows
        let _ = self.mismatches.push(field);
    }
}

/// Compare a record's geometry with the build's
///
/// Float fields are compared exactly; both sides come from the same
/// constants, so any difference means a different build.
pub fn check_geometry(record: &MeshGeometry, build: &MeshGeometry, slot_capacity: u32) -> SanityReport {
    let mut report = SanityReport::default();

    let checks = [
        (record.n_x == build.n_x, GeometryField::PointsX),
        (record.n_y == build.n_y, GeometryField::PointsY),
        (record.min_x == build.min_x, GeometryField::MinX),
        (record.min_y == build.min_y, GeometryField::MinY),
        (record.max_x == build.max_x, GeometryField::MaxX),
        (record.max_y == build.max_y, GeometryField::MaxY),
        (record.x_dist == build.x_dist, GeometryField::DistX),
        (record.y_dist == build.y_dist, GeometryField::DistY),
        (slot_capacity >= 1, GeometryField::SlotCapacity),
    ];

    for (matches, field) in checks {
        if !matches {
            report.record(field);
        }
    }

    report
}

impl<S: Eeprom, const NX: usize, const NY: usize> BedLeveling<S, NX, NY> {
    /// Check the current state record against the running build
    pub fn sanity_check(&self) -> SanityReport {
        check_geometry(&self.state.geometry, self.geometry(), self.mesh_slots())
    }
}
