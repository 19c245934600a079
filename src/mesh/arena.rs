//! Node storage and the coordinate lookup store.
//!
//! Nodes live in parallel arrays addressed by `NodeIdx`: coordinates,
//! scalar values, and the four directional neighbor slots. Slots hold raw
//! `u32` indices with a `NO_NEIGHBOR` sentinel instead of references, so
//! compaction can rebuild storage without chasing pointers. `CoordMap` is
//! the coordinate→node side: a dense table over the full grid, rebuilt
//! whenever node storage is rewritten.

/// Sentinel for an unlinked neighbor slot.
pub const NO_NEIGHBOR: u32 = u32::MAX;

const NO_NODE: u32 = u32::MAX;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeIdx(pub u32);

impl NodeIdx {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// The 4 cardinal directions for neighbor addressing. `y` grows southward
/// (row-major scan order).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Direction {
    North = 0, // (x, y-1)
    East = 1,  // (x+1, y)
    South = 2, // (x, y+1)
    West = 3,  // (x-1, y)
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// The coordinate offset for this direction.
    #[inline]
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::East => (1, 0),
            Direction::South => (0, 1),
            Direction::West => (-1, 0),
        }
    }

    /// The reverse direction (for bidirectional linking).
    #[inline]
    pub const fn reverse(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
        }
    }

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Neighbor slots for one node, indexed by `Direction`.
pub type Neighbors = [u32; 4];

/// An empty neighbor array (all `NO_NEIGHBOR`).
pub const EMPTY_NEIGHBORS: Neighbors = [NO_NEIGHBOR; 4];

#[derive(Debug)]
pub struct NodeArena {
    pub(crate) coords: Vec<(i32, i32)>,
    pub(crate) values: Vec<f64>,
    pub(crate) neighbors: Vec<Neighbors>,
}

impl NodeArena {
    /// One node per grid coordinate in row-major scan order, scalar values
    /// copied from `value_at`, neighbor slots unlinked.
    pub fn dense_grid(side: usize, mut value_at: impl FnMut(i32, i32) -> f64) -> Self {
        let len = side * side;
        let mut coords = Vec::with_capacity(len);
        let mut values = Vec::with_capacity(len);
        for y in 0..side as i32 {
            for x in 0..side as i32 {
                coords.push((x, y));
                values.push(value_at(x, y));
            }
        }
        Self {
            coords,
            values,
            neighbors: vec![EMPTY_NEIGHBORS; len],
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.coords.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    #[inline]
    pub fn coord(&self, idx: NodeIdx) -> (i32, i32) {
        self.coords[idx.index()]
    }

    #[inline]
    pub fn value(&self, idx: NodeIdx) -> f64 {
        self.values[idx.index()]
    }

    /// The linked neighbor in `dir`, if the slot is populated.
    #[inline]
    pub fn neighbor(&self, idx: NodeIdx, dir: Direction) -> Option<NodeIdx> {
        let raw = self.neighbors[idx.index()][dir.index()];
        (raw != NO_NEIGHBOR).then_some(NodeIdx(raw))
    }

    /// Write a neighbor slot only if it is currently unset.
    ///
    /// Returns whether the slot was written. Established edges are never
    /// overwritten by later passes.
    #[inline]
    pub fn set_neighbor_if_unset(&mut self, idx: NodeIdx, dir: Direction, other: NodeIdx) -> bool {
        let slot = &mut self.neighbors[idx.index()][dir.index()];
        if *slot == NO_NEIGHBOR {
            *slot = other.0;
            true
        } else {
            false
        }
    }

    /// Reset all four neighbor slots of a node.
    #[inline]
    pub fn clear_neighbors(&mut self, idx: NodeIdx) {
        self.neighbors[idx.index()] = EMPTY_NEIGHBORS;
    }
}

/// Dense coordinate→node table over the full grid.
///
/// Every grid coordinate maps to at most one arena slot; absent entries
/// (discarded by compaction) and out-of-range coordinates both resolve to
/// "not found".
#[derive(Debug)]
pub struct CoordMap {
    side: usize,
    slots: Vec<u32>,
}

impl CoordMap {
    /// Build the table for `side` and index every node in `arena`.
    pub fn for_arena(side: usize, arena: &NodeArena) -> Self {
        let mut map = Self {
            side,
            slots: vec![NO_NODE; side * side],
        };
        map.rebuild(arena);
        map
    }

    /// Reindex after node storage was rewritten.
    pub fn rebuild(&mut self, arena: &NodeArena) {
        self.slots.fill(NO_NODE);
        for (i, &(x, y)) in arena.coords.iter().enumerate() {
            self.slots[y as usize * self.side + x as usize] = i as u32;
        }
    }

    /// Look up the node at `(x, y)`, if one exists.
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Option<NodeIdx> {
        if x < 0 || y < 0 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.side || y >= self.side {
            return None;
        }
        let raw = self.slots[y * self.side + x];
        (raw != NO_NODE).then_some(NodeIdx(raw))
    }
}
