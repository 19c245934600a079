//! Mesh engine internals and public API.

mod arena;
mod bitgrid;
mod compact;
mod cross;
mod diagonal;
mod engine;
mod occupancy;
mod refine;
mod relink;
pub mod render;

pub use arena::{CoordMap, Direction, NodeArena, NodeIdx, NO_NEIGHBOR};
pub use bitgrid::BitGrid;
pub use engine::{Mesh, MeshBuildError, MeshConfig, MAX_LEVELS};
pub use occupancy::ZoneOccupancy;
pub use refine::RefineSummary;
