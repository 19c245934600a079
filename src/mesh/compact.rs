//! Storage compaction over the kept mask.
//!
//! Surviving nodes are copied into fresh parallel arrays in source scan
//! order with their neighbor slots reset; the arena then swaps to the new
//! storage in one move, dropping the old arrays. Any adjacency built
//! before compaction refers to dead indices and must be rebuilt.

use super::arena::{CoordMap, NodeArena, EMPTY_NEIGHBORS};
use super::bitgrid::BitGrid;

/// Discard every node whose kept bit is unset. Returns the surviving count.
pub(crate) fn run_compaction(arena: &mut NodeArena, kept: &BitGrid, map: &mut CoordMap) -> usize {
    let survivors = kept.count_set();
    let mut coords = Vec::with_capacity(survivors);
    let mut values = Vec::with_capacity(survivors);

    for idx in 0..arena.len() {
        let (x, y) = arena.coords[idx];
        if kept.get(x, y) {
            coords.push((x, y));
            values.push(arena.values[idx]);
        }
    }

    arena.coords = coords;
    arena.values = values;
    arena.neighbors = vec![EMPTY_NEIGHBORS; arena.coords.len()];
    map.rebuild(arena);
    arena.len()
}
