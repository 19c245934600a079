//! ASCII rendering of refinement state.
//!
//! Pure observers over the mesh: the decision passes never print, callers
//! render after a run when they want the picture.

use super::engine::Mesh;

/// Render the kept mask, `*` for surviving points, one row per line.
pub fn render_kept(mesh: &Mesh) -> String {
    let side = mesh.side() as i32;
    let mut out = String::with_capacity((mesh.side() * 2 + 1) * mesh.side());
    for y in 0..side {
        for x in 0..side {
            out.push(if mesh.is_kept(x, y) { '*' } else { ' ' });
            if x + 1 < side {
                out.push(' ');
            }
        }
        out.push('\n');
    }
    out
}

/// Render one occupancy level, `#` for occupied zones.
pub fn render_zones(mesh: &Mesh, level: usize) -> String {
    let occupancy = mesh.occupancy();
    let side = occupancy.side(level) as i32;
    let mut out = String::new();
    for y in 0..side {
        for x in 0..side {
            out.push(if occupancy.is_occupied(level, x, y) {
                '#'
            } else {
                '.'
            });
            if x + 1 < side {
                out.push(' ');
            }
        }
        out.push('\n');
    }
    out
}
