//! Level-by-level refinement driver.
//!
//! Runs the marching-cross pass and then the diagonal march for every
//! level, finest to coarsest, over one shared decision buffer. Each level
//! overwrites the marks of the points it owns, so the buffer converges to
//! the final kept mask; the four corners of the single coarsest cell are
//! the only points no coarser pass revisits.

use tracing::debug;

use crate::field::Field;

use super::bitgrid::BitGrid;
use super::cross::run_cross_pass;
use super::diagonal::run_diagonal_pass;
use super::occupancy::ZoneOccupancy;

/// Outcome of a refinement run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RefineSummary {
    /// Nodes surviving in the kept mask.
    pub kept: usize,
    /// Total nodes in the grid.
    pub total: usize,
}

impl RefineSummary {
    /// Fraction of nodes kept.
    #[inline]
    pub fn ratio(&self) -> f64 {
        self.kept as f64 / self.total as f64
    }
}

/// Refine every level against `threshold`.
///
/// `occupancy` is expected fully occupied and `kept` fully set; the run is
/// a pure function of those initial states, the field, and the threshold.
pub(crate) fn run_refinement(
    level_count: u32,
    field: &Field,
    threshold: f64,
    occupancy: &mut ZoneOccupancy,
    kept: &mut BitGrid,
) -> RefineSummary {
    for level in 0..level_count as usize {
        run_cross_pass(level, level_count, field, threshold, occupancy, kept);
        run_diagonal_pass(level, level_count, field, threshold, occupancy, kept);
        debug!(
            level,
            occupied = occupancy.occupied_count(level),
            zones = occupancy.side(level) * occupancy.side(level),
            "level refined"
        );
    }

    let summary = RefineSummary {
        kept: kept.count_set(),
        total: kept.len(),
    };
    debug!(
        kept = summary.kept,
        total = summary.total,
        ratio = summary.ratio(),
        "refinement complete"
    );
    summary
}

#[cfg(test)]
mod tests {
    use super::{run_refinement, RefineSummary};
    use crate::field::Field;
    use crate::mesh::bitgrid::BitGrid;
    use crate::mesh::occupancy::ZoneOccupancy;

    fn refine(field: &Field, levels: u32, threshold: f64) -> (ZoneOccupancy, BitGrid, RefineSummary) {
        let mut occupancy = ZoneOccupancy::fully_occupied(levels);
        let mut kept = BitGrid::filled(Field::side_for(levels));
        let summary = run_refinement(levels, field, threshold, &mut occupancy, &mut kept);
        (occupancy, kept, summary)
    }

    #[test]
    fn ratio_is_kept_over_total() {
        let summary = RefineSummary { kept: 17, total: 289 };
        assert!((summary.ratio() - 17.0 / 289.0).abs() < 1e-12);
    }

    #[test]
    fn infinite_threshold_leaves_only_the_coarsest_corners() {
        let field = Field::random(4, 0xBEEF);
        let (occupancy, kept, summary) = refine(&field, 4, f64::INFINITY);

        for level in 0..4 {
            assert_eq!(occupancy.occupied_count(level), 0);
        }
        assert_eq!(summary.kept, 4);
        for &(x, y) in &[(0, 0), (16, 0), (0, 16), (16, 16)] {
            assert!(kept.get(x, y), "corner ({x},{y}) must survive");
        }
    }

    #[test]
    fn zero_threshold_keeps_everything_under_curvature() {
        let field = Field::from_fn(3, |x, y| 0.01 * (x * x + y * y) as f64);
        let (occupancy, kept, summary) = refine(&field, 3, 0.0);

        for level in 0..3 {
            let side = occupancy.side(level);
            assert_eq!(occupancy.occupied_count(level), side * side);
        }
        assert_eq!(summary.kept, summary.total);
        assert_eq!(kept.count_set(), 81);
    }
}
