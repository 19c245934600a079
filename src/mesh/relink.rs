//! Neighbor-graph reconstruction over surviving nodes.
//!
//! Coarsest level first, every occupied zone walks outward from its center
//! in each of the four directions, stepping by the zone's stride until it
//! leaves the grid or reaches a surviving node, then links both directed
//! slots of the edge. Slots are only ever written when unset, so no pass
//! disturbs an edge an earlier pass established. Lookups go through the
//! coordinate store, which keeps the pass valid on a compacted mesh.

use super::arena::{CoordMap, Direction, NodeArena, NodeIdx};
use super::bitgrid::BitGrid;
use super::cross::cell_center;
use super::occupancy::ZoneOccupancy;

pub(crate) fn run_relink(
    level_count: u32,
    occupancy: &ZoneOccupancy,
    kept: &BitGrid,
    arena: &mut NodeArena,
    map: &CoordMap,
) {
    let grid_max = (1i32 << level_count) + 1;
    for level in (0..level_count as usize).rev() {
        let m = 1i32 << level;
        let zones = 1usize << (level_count as usize - 1 - level);
        for row in 0..zones {
            for col in 0..zones {
                if occupancy.is_empty(level, col as i32, row as i32) {
                    continue;
                }
                let (cx, cy) = cell_center(m, row, col);
                let Some(node) = map.get(cx, cy) else {
                    continue;
                };
                for dir in Direction::ALL {
                    link_towards(node, cx, cy, dir, m, grid_max, kept, arena, map);
                }
            }
        }
    }
}

/// Walk from `(cx, cy)` in `dir` by steps of `stride` and link the first
/// surviving node found, if any.
#[allow(clippy::too_many_arguments)]
fn link_towards(
    node: NodeIdx,
    cx: i32,
    cy: i32,
    dir: Direction,
    stride: i32,
    grid_max: i32,
    kept: &BitGrid,
    arena: &mut NodeArena,
    map: &CoordMap,
) {
    let (dx, dy) = dir.offset();
    let (mut x, mut y) = (cx + dx * stride, cy + dy * stride);
    while (0..grid_max).contains(&x) && (0..grid_max).contains(&y) {
        if kept.get(x, y) {
            if let Some(other) = map.get(x, y) {
                arena.set_neighbor_if_unset(node, dir, other);
                arena.set_neighbor_if_unset(other, dir.reverse(), node);
            }
            return;
        }
        x += dx * stride;
        y += dy * stride;
    }
}
