//! Adaptive compression of scalar fields sampled on dyadic grids.

pub mod field;
pub mod mesh;

pub use field::Field;
pub use mesh::{Mesh, MeshBuildError, MeshConfig, RefineSummary};
