//! Barycentric coordinates for 2D triangles.
//!
//! Shared by the rasterizer's edge-function scan conversion and the
//! adjustment propagator's Delaunay-based interpolation: both need to turn
//! a point and a triangle into per-vertex weights.

use crate::Vec2;

/// Signed area of the triangle `(a, b, c)`, scaled by 2. Positive for
/// counter-clockwise winding (in a Y-down screen space, that's clockwise on
/// screen).
#[inline]
pub fn signed_area2(a: Vec2, b: Vec2, c: Vec2) -> f32 {
    (b - a).cross(c - a)
}

/// Barycentric weights `(wa, wb, wc)` of `p` with respect to triangle
/// `(a, b, c)`, summing to 1. Returns `None` if the triangle is degenerate
/// (zero area).
pub fn barycentric(p: Vec2, a: Vec2, b: Vec2, c: Vec2) -> Option<(f32, f32, f32)> {
    let area = signed_area2(a, b, c);
    if area.abs() < 1e-12 {
        return None;
    }
    let wa = signed_area2(p, b, c) / area;
    let wb = signed_area2(a, p, c) / area;
    let wc = 1.0 - wa - wb;
    Some((wa, wb, wc))
}

/// Returns `true` if all three barycentric weights are within `[-eps, 1 +
/// eps]`, i.e. `p` lies inside (or within `eps` of the edge of) the
/// triangle.
#[inline]
pub fn inside_triangle(weights: (f32, f32, f32), eps: f32) -> bool {
    let (a, b, c) = weights;
    a >= -eps && b >= -eps && c >= -eps && a <= 1.0 + eps && b <= 1.0 + eps && c <= 1.0 + eps
}

/// Interpolates three per-vertex values with barycentric weights.
#[inline]
pub fn interpolate(weights: (f32, f32, f32), va: f32, vb: f32, vc: f32) -> f32 {
    weights.0 * va + weights.1 * vb + weights.2 * vc
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_barycentric_centroid() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(1.0, 0.0);
        let c = Vec2::new(0.0, 1.0);
        let centroid = Vec2::new(1.0 / 3.0, 1.0 / 3.0);
        let w = barycentric(centroid, a, b, c).unwrap();
        assert!((w.0 - 1.0 / 3.0).abs() < 1e-5);
        assert!((w.1 - 1.0 / 3.0).abs() < 1e-5);
        assert!((w.2 - 1.0 / 3.0).abs() < 1e-5);
    }

    #[test]
    fn test_barycentric_vertex() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(1.0, 0.0);
        let c = Vec2::new(0.0, 1.0);
        let w = barycentric(a, a, b, c).unwrap();
        assert!((w.0 - 1.0).abs() < 1e-5);
        assert!(w.1.abs() < 1e-5);
        assert!(w.2.abs() < 1e-5);
    }

    #[test]
    fn test_degenerate_triangle() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(1.0, 0.0);
        let c = Vec2::new(2.0, 0.0);
        assert!(barycentric(Vec2::new(0.5, 0.0), a, b, c).is_none());
    }

    #[test]
    fn test_inside_triangle() {
        let w_in = (0.3, 0.3, 0.4);
        let w_out = (-0.1, 0.5, 0.6);
        assert!(inside_triangle(w_in, 1e-6));
        assert!(!inside_triangle(w_out, 1e-6));
    }
}
