//! Marching-cross error test for one refinement level.
//!
//! Each level-`k` cell interpolates its four edge midpoints ("pivots") from
//! the diagonal corner samples ("ring") and sums the absolute interpolation
//! errors. A cell only evaluates the edges it owns: every cell owns its
//! south and east edges, the first column additionally owns west, the first
//! row north. The partition makes every shared edge the responsibility of
//! exactly one cell, so two neighbors can never disagree about a shared
//! pivot's fate.

use crate::field::Field;

use super::arena::Direction;
use super::bitgrid::BitGrid;
use super::occupancy::ZoneOccupancy;

/// Position of a cell within its zone grid, by (row, column).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellClass {
    /// Row 0, column 0: owns the full ring.
    Origin,
    /// Column 0, row > 0: the north edge belongs to the previous row.
    LeftColumn,
    /// Row 0, column > 0: the west edge belongs to the previous column.
    TopRow,
    /// Interior: only the south and east edges are unclaimed.
    Interior,
}

impl CellClass {
    #[inline]
    pub fn classify(row: usize, col: usize) -> Self {
        match (row == 0, col == 0) {
            (true, true) => CellClass::Origin,
            (false, true) => CellClass::LeftColumn,
            (true, false) => CellClass::TopRow,
            (false, false) => CellClass::Interior,
        }
    }

    /// The edges (hence pivots) this cell evaluates and owns.
    #[inline]
    pub fn evaluated_edges(self) -> &'static [Direction] {
        use Direction::*;
        match self {
            CellClass::Origin => &[North, West, South, East],
            CellClass::LeftColumn => &[West, South, East],
            CellClass::TopRow => &[North, South, East],
            CellClass::Interior => &[South, East],
        }
    }

    /// Ring corners this cell owns, as unit offsets from the center.
    ///
    /// Corners are next-coarser lattice points; together with the pivots
    /// and center the owned sets tile the whole level lattice.
    #[inline]
    fn owned_corner_offsets(self) -> &'static [(i32, i32)] {
        match self {
            CellClass::Origin => &[(1, 1), (-1, 1), (1, -1), (-1, -1)],
            CellClass::LeftColumn => &[(1, 1), (-1, 1)],
            CellClass::TopRow => &[(1, 1), (1, -1)],
            CellClass::Interior => &[(1, 1)],
        }
    }
}

/// Center grid coordinate of cell `(row, col)` at stride `m`.
#[inline]
pub(crate) fn cell_center(m: i32, row: usize, col: usize) -> (i32, i32) {
    (m + col as i32 * 2 * m, m + row as i32 * 2 * m)
}

/// The two ring corners flanking the edge in `dir`, as unit offsets.
#[inline]
fn ring_pair(dir: Direction) -> ((i32, i32), (i32, i32)) {
    match dir {
        Direction::North => ((-1, -1), (1, -1)),
        Direction::East => ((1, -1), (1, 1)),
        Direction::South => ((-1, 1), (1, 1)),
        Direction::West => ((-1, -1), (-1, 1)),
    }
}

/// Interpolation error at the pivot on the cell's `dir` edge.
#[inline]
fn pivot_delta(field: &Field, cx: i32, cy: i32, m: i32, dir: Direction) -> f64 {
    let ((ax, ay), (bx, by)) = ring_pair(dir);
    let a = field.value(cx + ax * m, cy + ay * m);
    let b = field.value(cx + bx * m, cy + by * m);
    let (px, py) = dir.offset();
    let pivot = field.value(cx + px * m, cy + py * m);
    (0.5 * (a + b) - pivot).abs()
}

/// Summed interpolation error over the edges the cell owns.
///
/// The accumulator starts at zero for every cell.
pub(crate) fn evaluate_cell(field: &Field, level: usize, row: usize, col: usize) -> f64 {
    let m = 1i32 << level;
    let (cx, cy) = cell_center(m, row, col);
    let mut delta_sum = 0.0;
    for &dir in CellClass::classify(row, col).evaluated_edges() {
        delta_sum += pivot_delta(field, cx, cy, m, dir);
    }
    delta_sum
}

/// Run the marching-cross pass over every cell of `level`.
///
/// A failing cell keeps all its owned points and re-occupies its zone.
/// A passing cell may only clear when no finer zone beneath it survived;
/// it then drops its owned pivots but leaves the ring corners (which the
/// next-coarser level re-decides) and the center (which the diagonal march
/// decides) marked. An unsafe clear leaves both the buffer and the zone in
/// their prior state.
pub(crate) fn run_cross_pass(
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
        for col in 0..zones {
            let class = CellClass::classify(row, col);
            let (cx, cy) = cell_center(m, row, col);
            let delta_sum = evaluate_cell(field, level, row, col);

            let (zx, zy) = (col as i32, row as i32);
            if delta_sum > threshold {
                kept.set(cx, cy);
                for &dir in class.evaluated_edges() {
                    let (px, py) = dir.offset();
                    kept.set(cx + px * m, cy + py * m);
                }
                for &(ox, oy) in class.owned_corner_offsets() {
                    kept.set(cx + ox * m, cy + oy * m);
                }
                occupancy.keep(level, zx, zy);
            } else if occupancy.square_empty(level, zx, zy) {
                kept.set(cx, cy);
                for &dir in class.evaluated_edges() {
                    let (px, py) = dir.offset();
                    kept.clear(cx + px * m, cy + py * m);
                }
                for &(ox, oy) in class.owned_corner_offsets() {
                    kept.set(cx + ox * m, cy + oy * m);
                }
                occupancy.clear(level, zx, zy);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::{cell_center, evaluate_cell, run_cross_pass, CellClass};
    use crate::field::Field;
    use crate::mesh::bitgrid::BitGrid;
    use crate::mesh::occupancy::ZoneOccupancy;

    const LEVELS: u32 = 4;

    #[test]
    fn classification_follows_row_and_column() {
        assert_eq!(CellClass::classify(0, 0), CellClass::Origin);
        assert_eq!(CellClass::classify(3, 0), CellClass::LeftColumn);
        assert_eq!(CellClass::classify(0, 3), CellClass::TopRow);
        assert_eq!(CellClass::classify(2, 5), CellClass::Interior);
    }

    #[test]
    fn every_shared_pivot_is_evaluated_exactly_once() {
        for level in 0..LEVELS as usize {
            let m = 1i32 << level;
            let zones = 1usize << (LEVELS as usize - 1 - level);
            let mut seen = HashSet::new();
            let mut evaluations = 0usize;
            for row in 0..zones {
                for col in 0..zones {
                    let (cx, cy) = cell_center(m, row, col);
                    for &dir in CellClass::classify(row, col).evaluated_edges() {
                        let (px, py) = dir.offset();
                        let pivot = (cx + px * m, cy + py * m);
                        evaluations += 1;
                        assert!(
                            seen.insert(pivot),
                            "pivot {pivot:?} evaluated twice at level {level}"
                        );
                    }
                }
            }
            // 2·M·(M+1) edge midpoints exist at each level; all covered.
            assert_eq!(evaluations, 2 * zones * (zones + 1));
        }
    }

    #[test]
    fn owned_points_tile_the_level_lattice() {
        for level in 0..LEVELS as usize {
            let m = 1i32 << level;
            let zones = 1usize << (LEVELS as usize - 1 - level);
            let mut seen = HashSet::new();
            for row in 0..zones {
                for col in 0..zones {
                    let class = CellClass::classify(row, col);
                    let (cx, cy) = cell_center(m, row, col);
                    assert!(seen.insert((cx, cy)));
                    for &dir in class.evaluated_edges() {
                        let (px, py) = dir.offset();
                        assert!(seen.insert((cx + px * m, cy + py * m)));
                    }
                    for &(ox, oy) in class.owned_corner_offsets() {
                        assert!(seen.insert((cx + ox * m, cy + oy * m)));
                    }
                }
            }
            // Every multiple-of-m lattice point owned by exactly one cell.
            let lattice = 2 * zones + 1;
            assert_eq!(seen.len(), lattice * lattice);
        }
    }

    #[test]
    fn corner_impulse_fails_only_the_origin_cell() {
        let field = Field::impulse(LEVELS, 0, 0, 1.0);
        // Cell (0,0): north edge interpolates 0.5 against a 0.0 pivot and
        // west likewise, so the sum is 1.0.
        assert!((evaluate_cell(&field, 0, 0, 0) - 1.0).abs() < 1e-12);
        assert_eq!(evaluate_cell(&field, 0, 0, 1), 0.0);
        assert_eq!(evaluate_cell(&field, 0, 7, 7), 0.0);
    }

    #[test]
    fn quadratic_field_has_uniform_curvature_per_edge() {
        // f = x² + y² gives interpolation error m² on every edge.
        let field = Field::from_fn(LEVELS, |x, y| (x * x + y * y) as f64);
        assert!((evaluate_cell(&field, 0, 3, 3) - 2.0).abs() < 1e-9);
        assert!((evaluate_cell(&field, 1, 1, 1) - 8.0).abs() < 1e-9);
        assert!((evaluate_cell(&field, 0, 0, 0) - 4.0).abs() < 1e-9);
    }

    #[test]
    fn unsafe_clear_leaves_zone_and_buffer_untouched() {
        let field = Field::from_fn(2, |_, _| 0.0);
        let mut occupancy = ZoneOccupancy::fully_occupied(2);
        let mut kept = BitGrid::filled(5);

        // Level 1 has one cell over a still-occupied finer block: the flat
        // field wants to clear it, but the square predicate forbids it.
        run_cross_pass(1, 2, &field, 0.5, &mut occupancy, &mut kept);
        assert!(occupancy.is_occupied(1, 0, 0));
        assert!(kept.get(2, 2));

        // Once the finer level empties, the same pass clears the pivots.
        for y in 0..2 {
            for x in 0..2 {
                occupancy.clear(0, x, y);
            }
        }
        run_cross_pass(1, 2, &field, 0.5, &mut occupancy, &mut kept);
        assert!(occupancy.is_empty(1, 0, 0));
        assert!(!kept.get(2, 0));
        assert!(!kept.get(0, 2));
        assert!(!kept.get(4, 2));
        assert!(!kept.get(2, 4));
        // Ring corners and the pending center stay.
        assert!(kept.get(0, 0));
        assert!(kept.get(4, 4));
        assert!(kept.get(2, 2));
    }

    #[test]
    fn out_of_range_level_is_a_no_op() {
        let field = Field::from_fn(2, |_, _| 0.0);
        let mut occupancy = ZoneOccupancy::fully_occupied(2);
        let mut kept = BitGrid::filled(5);
        run_cross_pass(7, 2, &field, 0.0, &mut occupancy, &mut kept);
        assert_eq!(kept.count_set(), 25);
    }
}
