//! 4x4 matrix type for mesh transforms.
//!
//! [`Mat4`] is used to transform mesh vertex positions (the shrinkwrap proxy
//! grid, panorama tile geometry) between local and world space. Wraps
//! [`glam::Mat4`] rather than reimplementing the algebra, since unlike
//! [`crate::Mat3`] there's no color-specific API surface to add here.

use crate::Vec3;
use std::ops::Mul;

/// A 4x4 transform matrix, column-major to match [`glam`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat4(glam::Mat4);

impl Mat4 {
    /// Identity matrix.
    pub const IDENTITY: Self = Self(glam::Mat4::IDENTITY);

    /// Builds a translation matrix.
    #[inline]
    pub fn from_translation(t: Vec3) -> Self {
        Self(glam::Mat4::from_translation(glam::Vec3::new(t.x, t.y, t.z)))
    }

    /// Builds a uniform scale matrix.
    #[inline]
    pub fn from_scale(s: Vec3) -> Self {
        Self(glam::Mat4::from_scale(glam::Vec3::new(s.x, s.y, s.z)))
    }

    /// Transforms a point (applies translation).
    #[inline]
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        let v = self.0.transform_point3(glam::Vec3::new(p.x, p.y, p.z));
        Vec3::new(v.x, v.y, v.z)
    }

    /// Transforms a direction vector (ignores translation).
    #[inline]
    pub fn transform_vector(&self, v: Vec3) -> Vec3 {
        let r = self.0.transform_vector3(glam::Vec3::new(v.x, v.y, v.z));
        Vec3::new(r.x, r.y, r.z)
    }

    /// Returns the inverse, or the identity if the matrix is singular.
    #[inline]
    pub fn inverse(&self) -> Self {
        Self(self.0.inverse())
    }
}

impl Mul for Mat4 {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: Self) -> Self {
        Self(self.0 * rhs.0)
    }
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_transform() {
        let m = Mat4::IDENTITY;
        let p = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(m.transform_point(p), p);
    }

    #[test]
    fn test_translation() {
        let m = Mat4::from_translation(Vec3::new(1.0, 0.0, 0.0));
        let p = Vec3::ZERO;
        let out = m.transform_point(p);
        assert!((out.x - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_inverse_roundtrip() {
        let m = Mat4::from_translation(Vec3::new(2.0, 3.0, -1.0));
        let inv = m.inverse();
        let p = Vec3::new(5.0, 5.0, 5.0);
        let back = inv.transform_point(m.transform_point(p));
        assert!((back.x - p.x).abs() < 1e-5);
        assert!((back.y - p.y).abs() < 1e-5);
        assert!((back.z - p.z).abs() < 1e-5);
    }
}
