//! Per-level zone occupancy.
//!
//! Level `k` holds a `M_k`×`M_k` bit grid with `M_k = 2^(L-1-k)`: level 0 is
//! the finest, level `L-1` a single zone. A set bit means the zone still
//! requires its grid points. Clearing a coarse zone is only legal when the
//! 2×2 block of finer zones beneath it is already empty; `square_empty`
//! exposes that check but never propagates clears on its own.

use super::bitgrid::BitGrid;

#[derive(Debug)]
pub struct ZoneOccupancy {
    levels: Vec<BitGrid>,
}

impl ZoneOccupancy {
    /// Occupancy for `level_count` levels with every zone occupied.
    pub fn fully_occupied(level_count: u32) -> Self {
        let levels = (0..level_count)
            .map(|k| BitGrid::filled(1usize << (level_count - 1 - k)))
            .collect();
        Self { levels }
    }

    #[inline]
    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    /// Zone-grid side at `level`, or 0 for an out-of-range level.
    #[inline]
    pub fn side(&self, level: usize) -> usize {
        self.levels.get(level).map_or(0, BitGrid::side)
    }

    /// Mark the zone occupied. Out-of-range level or coordinates are a no-op.
    #[inline]
    pub fn keep(&mut self, level: usize, x: i32, y: i32) {
        if let Some(grid) = self.levels.get_mut(level) {
            grid.set(x, y);
        }
    }

    /// Mark the zone empty. Out-of-range level or coordinates are a no-op.
    #[inline]
    pub fn clear(&mut self, level: usize, x: i32, y: i32) {
        if let Some(grid) = self.levels.get_mut(level) {
            grid.clear(x, y);
        }
    }

    /// Whether the zone is occupied. Out-of-range resolves to `false`.
    #[inline]
    pub fn is_occupied(&self, level: usize, x: i32, y: i32) -> bool {
        self.levels.get(level).is_some_and(|grid| grid.get(x, y))
    }

    /// Whether the zone is empty. Out-of-range resolves to `true`.
    #[inline]
    pub fn is_empty(&self, level: usize, x: i32, y: i32) -> bool {
        !self.is_occupied(level, x, y)
    }

    /// True iff the zone and its in-range axis neighbors are all empty.
    ///
    /// Neighbors falling outside the zone grid read as empty, so border
    /// zones only answer for the neighbors they actually have.
    pub fn cross_empty(&self, level: usize, x: i32, y: i32) -> bool {
        self.is_empty(level, x, y)
            && self.is_empty(level, x, y - 1)
            && self.is_empty(level, x + 1, y)
            && self.is_empty(level, x, y + 1)
            && self.is_empty(level, x - 1, y)
    }

    /// True iff the 2×2 block of level `k-1` zones under `(x, y)` is empty.
    ///
    /// Level 0 has no finer level and is vacuously clearable.
    pub fn square_empty(&self, level: usize, x: i32, y: i32) -> bool {
        if level == 0 {
            return true;
        }
        let below = level - 1;
        let (fx, fy) = (x * 2, y * 2);
        self.is_empty(below, fx, fy)
            && self.is_empty(below, fx + 1, fy)
            && self.is_empty(below, fx, fy + 1)
            && self.is_empty(below, fx + 1, fy + 1)
    }

    /// Count of occupied zones at `level`.
    pub fn occupied_count(&self, level: usize) -> usize {
        self.levels.get(level).map_or(0, BitGrid::count_set)
    }
}

#[cfg(test)]
mod tests {
    use super::ZoneOccupancy;

    #[test]
    fn level_sides_follow_dyadic_ladder() {
        let occ = ZoneOccupancy::fully_occupied(4);
        assert_eq!(occ.level_count(), 4);
        assert_eq!(occ.side(0), 8);
        assert_eq!(occ.side(1), 4);
        assert_eq!(occ.side(2), 2);
        assert_eq!(occ.side(3), 1);
        assert_eq!(occ.side(4), 0);
    }

    #[test]
    fn keep_clear_query_round_trip() {
        let mut occ = ZoneOccupancy::fully_occupied(4);
        assert!(occ.is_occupied(0, 3, 3));
        occ.clear(0, 3, 3);
        assert!(occ.is_empty(0, 3, 3));
        occ.keep(0, 3, 3);
        assert!(occ.is_occupied(0, 3, 3));
    }

    #[test]
    fn out_of_range_is_conservatively_empty() {
        let mut occ = ZoneOccupancy::fully_occupied(4);
        assert!(occ.is_empty(0, -1, 0));
        assert!(occ.is_empty(0, 8, 0));
        assert!(occ.is_empty(9, 0, 0));

        // Writes outside the grid land nowhere.
        occ.keep(0, 8, 8);
        occ.keep(9, 0, 0);
        assert_eq!(occ.occupied_count(0), 64);
    }

    #[test]
    fn cross_empty_skips_missing_neighbors() {
        let mut occ = ZoneOccupancy::fully_occupied(2);
        for y in 0..2 {
            for x in 0..2 {
                occ.clear(0, x, y);
            }
        }
        // Corner zone: the two out-of-range neighbors read as empty.
        assert!(occ.cross_empty(0, 0, 0));

        occ.keep(0, 1, 0);
        assert!(!occ.cross_empty(0, 0, 0));
        assert!(!occ.cross_empty(0, 1, 1));
    }

    #[test]
    fn square_empty_requires_whole_finer_block() {
        let mut occ = ZoneOccupancy::fully_occupied(3);
        assert!(!occ.square_empty(1, 0, 0));

        occ.clear(0, 0, 0);
        occ.clear(0, 1, 0);
        occ.clear(0, 0, 1);
        assert!(!occ.square_empty(1, 0, 0));

        occ.clear(0, 1, 1);
        assert!(occ.square_empty(1, 0, 0));

        // Finest level never blocks on a level below it.
        assert!(occ.square_empty(0, 3, 3));
    }
}
