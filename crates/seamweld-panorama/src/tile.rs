//! Sky tile mesh construction (spec.md §4.6, step 1): a quadrilateral mesh
//! for one element of the `Rows` × `Cols` panorama grid, in one of three
//! modes.

use seamweld_math::{Vec2, Vec3};
use seamweld_mesh::Mesh;

use crate::error::{PanoramaError, Result};

/// How the sky surround is modeled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileMeshMode {
    /// Four planar walls around the scene; `Cols` must be divisible by 4,
    /// with columns aligned one quarter per wall.
    Box,
    /// A UV-sphere band above/below the horizon.
    Sphere,
    /// Like [`TileMeshMode::Sphere`], but resampled through a remote
    /// orbital DEM so a horizon silhouette is correct at the advertised
    /// panoramic distance.
    TopoSphere,
}

/// A remote elevation source consulted only by [`TileMeshMode::TopoSphere`]
/// (spec.md §4.6: the DEM fetch itself is an external collaborator — this
/// crate only resamples through whatever elevation function it is given).
pub trait OrbitalDem: Sync {
    /// Returns the surface distance (meters) along `direction` (a unit
    /// vector from the panorama center), replacing the default `radius`.
    fn elevation(&self, direction: Vec3) -> f32;
}

impl<F> OrbitalDem for F
where
    F: Fn(Vec3) -> f32 + Sync,
{
    fn elevation(&self, direction: Vec3) -> f32 {
        self(direction)
    }
}

/// Geometry parameters shared by every tile in one panorama grid.
#[derive(Debug, Clone, Copy)]
pub struct PanoramaGeometry {
    /// Number of tile rows.
    pub rows: u32,
    /// Number of tile columns.
    pub cols: u32,
    /// Tile mesh construction mode.
    pub mode: TileMeshMode,
    /// Nominal panorama radius (meters) from the scene center.
    pub radius: f32,
    /// [`TileMeshMode::Box`]-only: vertical extent `(bottom, top)` of the
    /// box walls, in meters relative to the scene center.
    pub wall_height: (f32, f32),
    /// Per-tile mesh subdivision (an `n` x `n` quad grid per tile), so
    /// curved modes (`Sphere`/`TopoSphere`) approximate the sphere within
    /// the tile rather than using one flat quad.
    pub tile_subdivisions: u32,
}

impl Default for PanoramaGeometry {
    fn default() -> Self {
        Self {
            rows: 1,
            cols: 4,
            mode: TileMeshMode::Box,
            radius: 100.0,
            wall_height: (-50.0, 50.0),
            tile_subdivisions: 4,
        }
    }
}

/// Builds the quadrilateral mesh for tile `(row, col)` (spec.md §4.6).
///
/// UVs run `(0,0)` at the tile's top-left to `(1,1)` at its bottom-right,
/// matching the per-tile backproject/composite convention used downstream.
///
/// # Errors
///
/// Returns [`PanoramaError::ColsNotDivisibleByFour`] if `mode` is `Box` and
/// `geometry.cols` isn't a multiple of 4.
pub fn build_tile_mesh(geometry: &PanoramaGeometry, row: u32, col: u32, dem: Option<&dyn OrbitalDem>) -> Result<Mesh> {
    match geometry.mode {
        TileMeshMode::Box => build_box_tile(geometry, row, col),
        TileMeshMode::Sphere => build_sphere_tile(geometry, row, col, None),
        TileMeshMode::TopoSphere => build_sphere_tile(geometry, row, col, dem),
    }
}

fn build_box_tile(geometry: &PanoramaGeometry, row: u32, col: u32) -> Result<Mesh> {
    if geometry.cols % 4 != 0 {
        return Err(PanoramaError::ColsNotDivisibleByFour { cols: geometry.cols });
    }
    let cols_per_wall = geometry.cols / 4;
    let wall = col / cols_per_wall;
    let within = col % cols_per_wall;

    // Wall-local basis: `right` sweeps across the wall's width, `normal`
    // points inward toward the scene center.
    let (normal, right) = match wall {
        0 => (Vec3::new(0.0, 0.0, -1.0), Vec3::new(1.0, 0.0, 0.0)),
        1 => (Vec3::new(-1.0, 0.0, 0.0), Vec3::new(0.0, 0.0, -1.0)),
        2 => (Vec3::new(0.0, 0.0, 1.0), Vec3::new(-1.0, 0.0, 0.0)),
        _ => (Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 1.0)),
    };
    let center = normal * -geometry.radius;

    let half_width = geometry.radius; // one wall spans the full box side
    let u0 = (within as f32) / cols_per_wall as f32 * 2.0 - 1.0;
    let u1 = (within as f32 + 1.0) / cols_per_wall as f32 * 2.0 - 1.0;
    let (bottom, top) = geometry.wall_height;
    let v0 = bottom + (top - bottom) * (row as f32) / geometry.rows as f32;
    let v1 = bottom + (top - bottom) * (row as f32 + 1.0) / geometry.rows as f32;

    let n = geometry.tile_subdivisions.max(1);
    let mut positions = Vec::with_capacity(((n + 1) * (n + 1)) as usize);
    let mut uvs = Vec::with_capacity(positions.capacity());
    for j in 0..=n {
        let t = j as f32 / n as f32;
        let v = v0 + (v1 - v0) * t;
        for i in 0..=n {
            let s = i as f32 / n as f32;
            let u = u0 + (u1 - u0) * s;
            let pos = center + right * (u * half_width) + Vec3::new(0.0, v, 0.0);
            positions.push(pos);
            uvs.push(Vec2::new(s, t));
        }
    }
    let faces = grid_faces(n, n);
    let mesh = Mesh::new(positions, faces)?.with_uvs(uvs)?;
    Ok(mesh)
}

fn build_sphere_tile(geometry: &PanoramaGeometry, row: u32, col: u32, dem: Option<&dyn OrbitalDem>) -> Result<Mesh> {
    let n = geometry.tile_subdivisions.max(1);
    let mut positions = Vec::with_capacity(((n + 1) * (n + 1)) as usize);
    let mut uvs = Vec::with_capacity(positions.capacity());

    for j in 0..=n {
        let row_t = (row as f32 + j as f32 / n as f32) / geometry.rows as f32;
        // row_t in [0,1] maps to latitude in [-pi/2, pi/2], row 0 = south pole.
        let lat = (row_t - 0.5) * std::f32::consts::PI;
        for i in 0..=n {
            let col_t = (col as f32 + i as f32 / n as f32) / geometry.cols as f32;
            let lon = col_t * std::f32::consts::TAU;
            let direction = Vec3::new(lat.cos() * lon.cos(), lat.sin(), lat.cos() * lon.sin());
            let radius = dem.map(|d| d.elevation(direction)).unwrap_or(geometry.radius);
            positions.push(direction * radius);
            uvs.push(Vec2::new(i as f32 / n as f32, j as f32 / n as f32));
        }
    }
    let faces = grid_faces(n, n);
    let mesh = Mesh::new(positions, faces)?.with_uvs(uvs)?;
    Ok(mesh)
}

fn grid_faces(cols: u32, rows: u32) -> Vec<[u32; 3]> {
    let mut faces = Vec::with_capacity((cols * rows * 2) as usize);
    let stride = cols + 1;
    for j in 0..rows {
        for i in 0..cols {
            let a = j * stride + i;
            let b = a + 1;
            let c = a + stride;
            let d = c + 1;
            faces.push([a, b, d]);
            faces.push([a, d, c]);
        }
    }
    faces
}

/// The row-major deterministic tile name (spec.md §3: "tile indices are
/// named by a row-major integer for deterministic ordering").
#[inline]
pub fn tile_name(row: u32, col: u32, cols: u32) -> u32 {
    row * cols + col
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn box_mode_rejects_cols_not_divisible_by_four() {
        let geometry = PanoramaGeometry { cols: 5, ..Default::default() };
        assert!(build_tile_mesh(&geometry, 0, 0, None).is_err());
    }

    #[test]
    fn box_tile_mesh_has_valid_uvs() {
        let geometry = PanoramaGeometry::default();
        let mesh = build_tile_mesh(&geometry, 0, 1, None).unwrap();
        assert!(mesh.uvs().is_some());
        assert!(mesh.face_count() > 0);
    }

    #[test]
    fn sphere_tile_respects_dem() {
        let geometry = PanoramaGeometry { mode: TileMeshMode::TopoSphere, rows: 2, cols: 8, ..Default::default() };
        let dem = |_dir: Vec3| 42.0f32;
        let mesh = build_tile_mesh(&geometry, 0, 0, Some(&dem)).unwrap();
        let p = mesh.positions()[0];
        assert!((p.length() - 42.0).abs() < 1e-3);
    }

    #[test]
    fn tile_names_are_row_major() {
        assert_eq!(tile_name(0, 0, 32), 0);
        assert_eq!(tile_name(1, 0, 32), 32);
        assert_eq!(tile_name(0, 31, 32), 31);
    }
}
