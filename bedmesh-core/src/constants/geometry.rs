//! Bed Geometry Defaults
//!
//! Default mesh extents for a 300 × 300 mm bed probed with a 10 × 10 grid.
//! The point counts themselves are const generic parameters on the mesh
//! types; the values here are what the stock firmware build instantiates.

// ===== MESH POINT COUNTS =====

/// Default number of mesh points along X.
///
/// 10 points over 280 mm gives ~31 mm cells, small enough to follow the
/// sag of a typical aluminium bed plate.
pub const DEFAULT_MESH_POINTS_X: usize = 10;

/// Default number of mesh points along Y.
pub const DEFAULT_MESH_POINTS_Y: usize = 10;

// ===== MESH EXTENTS =====

/// Lowest X coordinate probed (mm).
///
/// Kept inside the bed edge so the probe never hangs off the plate.
pub const MESH_MIN_X_MM: f32 = 10.0;

/// Lowest Y coordinate probed (mm).
pub const MESH_MIN_Y_MM: f32 = 10.0;

/// Highest X coordinate probed (mm).
pub const MESH_MAX_X_MM: f32 = 290.0;

/// Highest Y coordinate probed (mm).
pub const MESH_MAX_Y_MM: f32 = 290.0;

// ===== FADE =====

/// Height above the bed (mm) at which mesh correction has faded to zero.
///
/// The persisted record stores the reciprocal of this value as well, so
/// the motion planner can multiply instead of divide on every move.
pub const DEFAULT_FADE_HEIGHT_MM: f32 = 10.0;

/// Value `last_specified_z` takes after a reset (mm).
///
/// Far below any reachable bed height, so the first real move always looks
/// like a Z change to the compensation logic.
pub const LAST_SPECIFIED_Z_RESET_MM: f32 = -999.9;

/// Per-cell spacing for `points` mesh lines spread over `[min, max]`.
///
/// A single line (or none) has no spacing.
pub fn mesh_spacing(min: f32, max: f32, points: usize) -> f32 {
    if points < 2 {
        return 0.0;
    }
    (max - min) / (points - 1) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_spacing() {
        let dist = mesh_spacing(MESH_MIN_X_MM, MESH_MAX_X_MM, DEFAULT_MESH_POINTS_X);
        assert!((dist - 280.0 / 9.0).abs() < 1e-4);
    }

    #[test]
    fn degenerate_spacing() {
        assert_eq!(mesh_spacing(0.0, 100.0, 1), 0.0);
        assert_eq!(mesh_spacing(0.0, 100.0, 0), 0.0);
        assert_eq!(mesh_spacing(0.0, 100.0, 3), 50.0);
    }
}
