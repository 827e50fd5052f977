//! Bed topography report
//!
//! Renders the mesh as a text table for the serial console. Row `NY - 1` is
//! printed first so the table reads like the bed seen from above, with the
//! origin at the bottom left:
//!
//! ```text
//! Bed Topography Report:
//!
//! (0,2)                   (2,2)
//! (0,100)                 (100,100)
//!   0.01250    -0.00500       .
//!
//!   0.00000     0.02000     0.01000
//!
//!   0.00000   [ 0.00000]    0.03125
//! (0,0)                   (100,0)
//! (0,0)                   (2,0)
//! ```
//!
//! Each cell is a fixed-width value with five decimals, or a dot for an
//! unknown cell. Values too large for the column give up decimals rather
//! than widen it. The cell under the nozzle is bracketed.

use core::fmt::{self, Write};

use heapless::String;

use crate::config::MeshGeometry;
use crate::leveling::BedLeveling;
use crate::mesh::MeshStore;
use crate::storage::Eeprom;

/// Width of a printed value
const VALUE_WIDTH: usize = 8;

/// Width of one table column: marker, value, marker, gap
const COLUMN_WIDTH: usize = VALUE_WIDTH + 4;

/// Decimals printed when the value fits
const VALUE_PRECISION: usize = 5;

/// Printed in place of an unknown (NaN) cell
const UNKNOWN_CELL: &str = "   .    ";

/// Printed when a value does not fit the column even without decimals
const OVERFLOW_CELL: &str = "  ****  ";

/// One formatted value
type Cell = String<16>;

/// Corner labels are staged here; two `f32`s never exceed it
type Label = String<96>;

fn label<A: fmt::Display, B: fmt::Display>(x: A, y: B) -> Result<Label, fmt::Error> {
    let mut text = Label::new();
    write!(text, "({},{})", x, y)?;
    Ok(text)
}

/// Format `z` right-aligned in `VALUE_WIDTH`, dropping decimals as needed
fn cell_text(z: f32) -> Cell {
    for precision in (0..=VALUE_PRECISION).rev() {
        let mut text = Cell::new();
        let written = write!(text, "{:>width$.prec$}", z, width = VALUE_WIDTH, prec = precision);
        if written.is_ok() && text.len() <= VALUE_WIDTH {
            return text;
        }
    }

    let mut text = Cell::new();
    let _ = text.push_str(OVERFLOW_CELL);
    text
}

/// One line holding a left and a right corner label, the right one lined
/// up with the last column
fn corner_line<W: Write>(out: &mut W, left: &str, right: &str, columns: usize) -> fmt::Result {
    let pad = (COLUMN_WIDTH * columns.saturating_sub(1)).max(left.len() + 1);
    writeln!(out, "{:<pad$}{}", left, right, pad = pad)
}

/// Render `mesh` with the cell under `nozzle` bracketed
///
/// `nozzle` is the current tool position in bed coordinates; it is shifted
/// by half a cell before the lookup, so the marked cell is the one whose
/// lower-left line is nearest.
pub fn render_map<W: Write, const NX: usize, const NY: usize>(
    out: &mut W,
    mesh: &MeshStore<NX, NY>,
    geometry: &MeshGeometry,
    nozzle: (f32, f32),
) -> fmt::Result {
    let (marked_x, marked_y) = mesh.coordinates().cell_index(
        nozzle.0 + geometry.x_dist / 2.0,
        nozzle.1 + geometry.y_dist / 2.0,
    );
    let last_x = NX.saturating_sub(1);
    let last_y = NY.saturating_sub(1);

    writeln!(out)?;
    writeln!(out, "Bed Topography Report:")?;
    writeln!(out)?;

    corner_line(out, &label(0, last_y)?, &label(last_x, last_y)?, NX)?;
    corner_line(out, &label(geometry.min_x, geometry.max_y)?, &label(geometry.max_x, geometry.max_y)?, NX)?;

    for y in (0..NY).rev() {
        for x in 0..NX {
            if x > 0 {
                out.write_str("  ")?;
            }

            let marked = x == marked_x && y == marked_y;
            out.write_char(if marked { '[' } else { ' ' })?;

            let z = mesh.z(x, y).unwrap_or(f32::NAN);
            if z.is_nan() {
                out.write_str(UNKNOWN_CELL)?;
            } else {
                out.write_str(&cell_text(z))?;
            }

            out.write_char(if marked { ']' } else { ' ' })?;
        }
        writeln!(out)?;

        // Keep the bottom row tight against the corner labels
        if y != 0 {
            writeln!(out)?;
        }
    }

    corner_line(out, &label(geometry.min_x, geometry.min_y)?, &label(geometry.max_x, geometry.min_y)?, NX)?;
    corner_line(out, &label(0, 0)?, &label(last_x, 0)?, NX)?;
    writeln!(out)
}

impl<S: Eeprom, const NX: usize, const NY: usize> BedLeveling<S, NX, NY> {
    /// Write the topography report for the current mesh
    ///
    /// Read-only; nothing in the context changes.
    pub fn display_map<W: Write>(&self, out: &mut W, nozzle_x: f32, nozzle_y: f32) -> fmt::Result {
        render_map(out, &self.mesh, self.geometry(), (nozzle_x, nozzle_y))
    }
}
