//! Indexed triangle mesh: vertex positions plus optional per-vertex
//! normal, RGBA, and UV attributes.
//!
//! Attribute presence is mesh-wide, not per-vertex (spec invariant: "if any
//! vertex has UVs, all do"), so it is modeled structurally as a parallel
//! `Option<Vec<_>>` rather than `Vec<Option<_>>` — a mesh either carries an
//! attribute for every vertex or not at all.

use seamweld_math::{Mat4, Vec2, Vec3};

use crate::error::{MeshError, Result};

/// Per-vertex RGBA color, stored as four `f32` components in `[0, 1]`.
pub type Rgba = [f32; 4];

/// An indexed triangle mesh.
#[derive(Debug, Clone)]
pub struct Mesh {
    positions: Vec<Vec3>,
    normals: Option<Vec<Vec3>>,
    colors: Option<Vec<Rgba>>,
    uvs: Option<Vec<Vec2>>,
    faces: Vec<[u32; 3]>,
}

impl Mesh {
    /// Builds a mesh from a position buffer and triangle index list, with
    /// no optional attributes. Validates face indices.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::DanglingFaceIndex`] if any face references a
    /// vertex beyond `positions.len()`.
    pub fn new(positions: Vec<Vec3>, faces: Vec<[u32; 3]>) -> Result<Self> {
        Self::validate_faces(&positions, &faces)?;
        Ok(Self {
            positions,
            normals: None,
            colors: None,
            uvs: None,
            faces,
        })
    }

    fn validate_faces(positions: &[Vec3], faces: &[[u32; 3]]) -> Result<()> {
        for (i, face) in faces.iter().enumerate() {
            for &idx in face {
                if idx as usize >= positions.len() {
                    return Err(MeshError::DanglingFaceIndex {
                        face: i,
                        index: idx,
                        vertex_count: positions.len(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Attaches per-vertex normals.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::AttributeLengthMismatch`] if `normals.len() !=
    /// self.vertex_count()`.
    pub fn with_normals(mut self, normals: Vec<Vec3>) -> Result<Self> {
        if normals.len() != self.positions.len() {
            return Err(MeshError::AttributeLengthMismatch {
                attribute: "normal",
                got: normals.len(),
                expected: self.positions.len(),
            });
        }
        self.normals = Some(normals);
        Ok(self)
    }

    /// Attaches per-vertex RGBA colors.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::AttributeLengthMismatch`] on a length mismatch.
    pub fn with_colors(mut self, colors: Vec<Rgba>) -> Result<Self> {
        if colors.len() != self.positions.len() {
            return Err(MeshError::AttributeLengthMismatch {
                attribute: "color",
                got: colors.len(),
                expected: self.positions.len(),
            });
        }
        self.colors = Some(colors);
        Ok(self)
    }

    /// Attaches per-vertex UVs.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::AttributeLengthMismatch`] on a length mismatch.
    pub fn with_uvs(mut self, uvs: Vec<Vec2>) -> Result<Self> {
        if uvs.len() != self.positions.len() {
            return Err(MeshError::AttributeLengthMismatch {
                attribute: "uv",
                got: uvs.len(),
                expected: self.positions.len(),
            });
        }
        self.uvs = Some(uvs);
        Ok(self)
    }

    /// Number of vertices.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of triangles.
    #[inline]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Vertex positions.
    #[inline]
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// Mutable vertex positions; does not invalidate face indices.
    #[inline]
    pub fn positions_mut(&mut self) -> &mut [Vec3] {
        &mut self.positions
    }

    /// Per-vertex normals, if present.
    #[inline]
    pub fn normals(&self) -> Option<&[Vec3]> {
        self.normals.as_deref()
    }

    /// Per-vertex RGBA colors, if present.
    #[inline]
    pub fn colors(&self) -> Option<&[Rgba]> {
        self.colors.as_deref()
    }

    /// Per-vertex UVs, if present.
    #[inline]
    pub fn uvs(&self) -> Option<&[Vec2]> {
        self.uvs.as_deref()
    }

    /// Mutable per-vertex UVs, if present.
    #[inline]
    pub fn uvs_mut(&mut self) -> Option<&mut [Vec2]> {
        self.uvs.as_deref_mut()
    }

    /// Triangle index triples.
    #[inline]
    pub fn faces(&self) -> &[[u32; 3]] {
        &self.faces
    }

    /// Iterates triangles as resolved position triples.
    pub fn triangles(&self) -> impl Iterator<Item = (Vec3, Vec3, Vec3)> + '_ {
        self.faces.iter().map(move |f| {
            (
                self.positions[f[0] as usize],
                self.positions[f[1] as usize],
                self.positions[f[2] as usize],
            )
        })
    }

    /// Axis-aligned bounding box as `(min, max)`. Returns `None` for an
    /// empty mesh.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let mut iter = self.positions.iter();
        let first = *iter.next()?;
        let mut min = first;
        let mut max = first;
        for &p in iter {
            min = min.min(p);
            max = max.max(p);
        }
        Some((min, max))
    }

    /// Applies a rigid/affine transform to every vertex position (and
    /// direction-transforms normals, without renormalizing non-uniform
    /// scale — callers that scale non-uniformly should renormalize
    /// afterwards).
    pub fn transform(&mut self, m: &Mat4) {
        for p in &mut self.positions {
            *p = m.transform_point(*p);
        }
        if let Some(normals) = &mut self.normals {
            for n in normals {
                *n = m.transform_vector(*n).normalize();
            }
        }
    }

    /// Remaps every UV through `f`. No-op if the mesh has no UVs.
    ///
    /// Used by the coherent-index builder's center-dense UV warp (spec.md
    /// §4.3) and the shrinkwrap grid's row/col → UV assignment.
    pub fn uv_warp<F>(&mut self, mut f: F)
    where
        F: FnMut(Vec2) -> Vec2,
    {
        if let Some(uvs) = &mut self.uvs {
            for uv in uvs {
                *uv = f(*uv);
            }
        }
    }

    /// Validates mesh invariants: face indices in range (already guaranteed
    /// by construction) and non-empty faces.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::EmptyGeometry`] if the mesh has no faces.
    pub fn validate(&self) -> Result<()> {
        if self.faces.is_empty() {
            return Err(MeshError::EmptyGeometry);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad() -> Mesh {
        Mesh::new(
            vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(1.0, 1.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
            ],
            vec![[0, 1, 2], [0, 2, 3]],
        )
        .unwrap()
    }

    #[test]
    fn test_dangling_index_rejected() {
        let err = Mesh::new(vec![Vec3::ZERO, Vec3::ONE], vec![[0, 1, 5]]);
        assert!(matches!(err, Err(MeshError::DanglingFaceIndex { .. })));
    }

    #[test]
    fn test_bounds() {
        let m = quad();
        let (min, max) = m.bounds().unwrap();
        assert_eq!(min, Vec3::new(0.0, 0.0, 0.0));
        assert_eq!(max, Vec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn test_with_uvs_length_mismatch() {
        let m = quad();
        let err = m.with_uvs(vec![Vec2::ZERO]);
        assert!(matches!(err, Err(MeshError::AttributeLengthMismatch { .. })));
    }

    #[test]
    fn test_transform_translates() {
        let mut m = quad();
        m.transform(&Mat4::from_translation(Vec3::new(1.0, 0.0, 0.0)));
        assert_eq!(m.positions()[0], Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_uv_warp_noop_without_uvs() {
        let mut m = quad();
        m.uv_warp(|uv| uv * 2.0);
        assert!(m.uvs().is_none());
    }

    #[test]
    fn test_uv_warp_applies() {
        let mut m = quad()
            .with_uvs(vec![Vec2::ZERO, Vec2::new(1.0, 0.0), Vec2::ONE, Vec2::new(0.0, 1.0)])
            .unwrap();
        m.uv_warp(|uv| Vec2::new(uv.x * 0.5, uv.y));
        assert_eq!(m.uvs().unwrap()[1], Vec2::new(0.5, 0.0));
    }

    #[test]
    fn test_validate_rejects_empty() {
        let m = Mesh::new(vec![Vec3::ZERO], vec![]).unwrap();
        assert!(matches!(m.validate(), Err(MeshError::EmptyGeometry)));
    }

    #[test]
    fn test_triangles_iterator() {
        let m = quad();
        let tris: Vec<_> = m.triangles().collect();
        assert_eq!(tris.len(), 2);
        assert_eq!(tris[0].0, Vec3::new(0.0, 0.0, 0.0));
    }
}
