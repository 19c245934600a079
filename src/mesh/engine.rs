//! The mesh: field samples, node storage, per-level occupancy, and the
//! refinement passes that tie them together.

use thiserror::Error;
use tracing::info;

use crate::field::Field;

use super::arena::{CoordMap, Direction, NodeArena, NodeIdx};
use super::bitgrid::BitGrid;
use super::compact::run_compaction;
use super::occupancy::ZoneOccupancy;
use super::refine::{run_refinement, RefineSummary};
use super::relink::run_relink;

/// Largest supported level count. The grid holds `(2^L + 1)²` nodes, so
/// this bounds construction well before coordinate or memory overflow.
pub const MAX_LEVELS: u32 = 12;

const DEFAULT_SEED: u64 = 0x5EED_2D17_ACE5_0001;

/// Errors that can occur while building a mesh.
///
/// Construction is all-or-nothing: on error no partially built mesh
/// exists.
#[derive(Debug, Error)]
pub enum MeshBuildError {
    /// The refinement hierarchy needs at least one level.
    #[error("level count must be at least 1")]
    NoLevels,

    /// Level count beyond the supported grid sizes.
    #[error("level count {0} exceeds the supported maximum of {MAX_LEVELS}")]
    TooManyLevels(u32),

    /// The provided field was sampled for a different level count.
    #[error("field side {field_side} does not match {expected} for {levels} levels")]
    FieldSizeMismatch {
        field_side: usize,
        expected: usize,
        levels: u32,
    },
}

/// Mesh construction parameters.
#[derive(Clone, Copy, Debug)]
pub struct MeshConfig {
    levels: u32,
    threshold: f64,
    smooth_iterations: u32,
    seed: u64,
}

impl Default for MeshConfig {
    fn default() -> Self {
        Self {
            levels: 4,
            threshold: 0.1,
            smooth_iterations: 350,
            seed: DEFAULT_SEED,
        }
    }
}

impl MeshConfig {
    pub fn levels(mut self, levels: u32) -> Self {
        self.levels = levels;
        self
    }

    pub fn threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn smooth_iterations(mut self, iterations: u32) -> Self {
        self.smooth_iterations = iterations;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

/// An adaptively refinable mesh over one in-memory dyadic grid.
///
/// The mesh exclusively owns its nodes, scalar storage, and occupancy
/// grids; `compact` swaps node storage wholesale, so no external index
/// may outlive it.
#[derive(Debug)]
pub struct Mesh {
    levels: u32,
    threshold: f64,
    field: Field,
    arena: NodeArena,
    map: CoordMap,
    occupancy: ZoneOccupancy,
    kept: BitGrid,
}

impl Mesh {
    /// Generate a mesh over a seeded random field smoothed per `config`.
    pub fn generate(config: MeshConfig) -> Result<Self, MeshBuildError> {
        Self::check_levels(config.levels)?;
        let mut field = Field::random(config.levels, config.seed);
        field.smooth(config.smooth_iterations);
        Self::from_field(field, config)
    }

    /// Build a mesh over an existing field. The field's side must match
    /// the configured level count.
    pub fn from_field(field: Field, config: MeshConfig) -> Result<Self, MeshBuildError> {
        Self::check_levels(config.levels)?;
        let expected = Field::side_for(config.levels);
        if field.side() != expected {
            return Err(MeshBuildError::FieldSizeMismatch {
                field_side: field.side(),
                expected,
                levels: config.levels,
            });
        }

        let side = field.side();
        let arena = NodeArena::dense_grid(side, |x, y| field.value(x, y));
        let map = CoordMap::for_arena(side, &arena);
        Ok(Self {
            levels: config.levels,
            threshold: config.threshold,
            field,
            arena,
            map,
            occupancy: ZoneOccupancy::fully_occupied(config.levels),
            kept: BitGrid::filled(side),
        })
    }

    fn check_levels(levels: u32) -> Result<(), MeshBuildError> {
        if levels == 0 {
            return Err(MeshBuildError::NoLevels);
        }
        if levels > MAX_LEVELS {
            return Err(MeshBuildError::TooManyLevels(levels));
        }
        Ok(())
    }

    #[inline]
    pub fn levels(&self) -> u32 {
        self.levels
    }

    /// Grid side: `2^levels + 1`.
    #[inline]
    pub fn side(&self) -> usize {
        self.field.side()
    }

    #[inline]
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Set the error threshold. Must not be called while a pass runs;
    /// the next `refine` picks it up.
    #[inline]
    pub fn set_threshold(&mut self, threshold: f64) {
        self.threshold = threshold;
    }

    #[inline]
    pub fn field(&self) -> &Field {
        &self.field
    }

    /// Number of nodes currently in storage.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.arena.len()
    }

    /// Run the full refinement over all levels, finest to coarsest.
    ///
    /// Occupancy and the kept mask are reset to fully occupied first, so
    /// repeated runs with the same field and threshold are bitwise
    /// identical.
    pub fn refine(&mut self) -> RefineSummary {
        self.occupancy = ZoneOccupancy::fully_occupied(self.levels);
        self.kept = BitGrid::filled(self.side());
        let summary = run_refinement(
            self.levels,
            &self.field,
            self.threshold,
            &mut self.occupancy,
            &mut self.kept,
        );
        info!(
            kept = summary.kept,
            total = summary.total,
            ratio = summary.ratio(),
            threshold = self.threshold,
            "mesh refined"
        );
        summary
    }

    /// Rebuild the neighbor graph over surviving nodes.
    pub fn relink(&mut self) {
        run_relink(
            self.levels,
            &self.occupancy,
            &self.kept,
            &mut self.arena,
            &self.map,
        );
    }

    /// Discard unkept nodes and renumber storage. Any previously built
    /// adjacency is invalidated; run `relink` again on the reduced mesh.
    /// Returns the surviving node count.
    pub fn compact(&mut self) -> usize {
        let len = run_compaction(&mut self.arena, &self.kept, &mut self.map);
        info!(nodes = len, "mesh compacted");
        len
    }

    /// Whether the grid point at `(x, y)` survives refinement.
    #[inline]
    pub fn is_kept(&self, x: i32, y: i32) -> bool {
        self.kept.get(x, y)
    }

    /// The final kept mask over the full grid.
    #[inline]
    pub fn kept_mask(&self) -> &BitGrid {
        &self.kept
    }

    /// Whether the zone at `(x, y)` of `level` is empty. Out-of-range
    /// queries are conservatively empty.
    #[inline]
    pub fn zone_is_empty(&self, level: usize, x: i32, y: i32) -> bool {
        self.occupancy.is_empty(level, x, y)
    }

    /// Whether the zone and its in-range axis neighbors are all empty.
    #[inline]
    pub fn zone_cross_empty(&self, level: usize, x: i32, y: i32) -> bool {
        self.occupancy.cross_empty(level, x, y)
    }

    /// Whether the 2×2 finer block under the zone is empty.
    #[inline]
    pub fn zone_square_empty(&self, level: usize, x: i32, y: i32) -> bool {
        self.occupancy.square_empty(level, x, y)
    }

    pub(crate) fn occupancy(&self) -> &ZoneOccupancy {
        &self.occupancy
    }

    /// Node at `(x, y)`, if it is still in storage.
    #[inline]
    pub fn node_at(&self, x: i32, y: i32) -> Option<NodeIdx> {
        self.map.get(x, y)
    }

    /// Scalar value of the node at `(x, y)`, if it is still in storage.
    pub fn scalar_at(&self, x: i32, y: i32) -> Option<f64> {
        self.map.get(x, y).map(|idx| self.arena.value(idx))
    }

    /// Coordinate of a stored node.
    #[inline]
    pub fn node_coord(&self, idx: NodeIdx) -> (i32, i32) {
        self.arena.coord(idx)
    }

    /// Linked neighbor of a stored node, if the slot is populated.
    #[inline]
    pub fn neighbor(&self, idx: NodeIdx, dir: Direction) -> Option<NodeIdx> {
        self.arena.neighbor(idx, dir)
    }
}
