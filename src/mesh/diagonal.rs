//! Diagonal sweep deciding the cell centers the cross test leaves pending.
//!
//! A two-sample window rolls along each row of cells, sampling the corner
//! lattice at `x = 0, 2m, 4m, …` while the sample `y` alternates between
//! the row's upper and lower corner line each step; successive rows start
//! on opposite sides. Every cell center is the midpoint of the window's
//! two samples, so the carried sample gives each center one diagonal
//! interpolation test. The window state makes rows inherently sequential.

use crate::field::Field;

use super::bitgrid::BitGrid;
use super::cross::cell_center;
use super::occupancy::ZoneOccupancy;

/// Run the diagonal march over `level`.
///
/// Zones the cross pass kept are skipped; their centers are already
/// decided. An empty zone's center is re-kept (and the zone re-occupied)
/// when the diagonal error exceeds the threshold, and cleared only when
/// the zone's whole cross neighborhood is empty. A `level` outside the
/// declared range is a silent no-op.
pub(crate) fn run_diagonal_pass(
    level: usize,
    level_count: u32,
    field: &Field,
    threshold: f64,
    occupancy: &mut ZoneOccupancy,
    kept: &mut BitGrid,
) {
    if level >= level_count as usize {
        return;
    }
    let m = 1i32 << level;
    let zones = 1usize << (level_count as usize - 1 - level);

    for row in 0..zones {
        let (_, cy) = cell_center(m, row, 0);
        // Rows alternate their starting side: +m, then -m.
        let mut sign: i32 = if row % 2 == 0 { 1 } else { -1 };
        let mut prev = field.value(0, cy + sign * m);

        for col in 0..zones {
            sign = -sign;
            let (cx, _) = cell_center(m, row, col);
            let cur = field.value(cx + m, cy + sign * m);

            let (zx, zy) = (col as i32, row as i32);
            if occupancy.is_empty(level, zx, zy) {
                let err = (0.5 * (prev + cur) - field.value(cx, cy)).abs();
                if err > threshold {
                    kept.set(cx, cy);
                    occupancy.keep(level, zx, zy);
                } else if occupancy.cross_empty(level, zx, zy) {
                    kept.clear(cx, cy);
                }
            }
            prev = cur;
        }
    }
}
