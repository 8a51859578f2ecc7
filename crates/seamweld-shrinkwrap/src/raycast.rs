//! Ray-mesh intersection and closest-point queries against a reference
//! mesh. A brute-force loop over candidate triangles — acceptable at
//! shrinkwrap grid resolutions (spec.md §4.2); no BVH, no spec requirement
//! for one at this scale.

use seamweld_math::Vec3;

const EPS: f32 = 1e-8;

/// Intersects a ray `(origin, dir)` against triangle `(a, b, c)` via
/// Möller–Trumbore. Returns the hit distance `t` along `dir` if the ray
/// hits the triangle's front or back face at `t >= 0`.
pub fn ray_triangle_intersect(origin: Vec3, dir: Vec3, a: Vec3, b: Vec3, c: Vec3) -> Option<f32> {
    let edge1 = b - a;
    let edge2 = c - a;
    let pvec = dir.cross(edge2);
    let det = edge1.dot(pvec);
    if det.abs() < EPS {
        return None;
    }
    let inv_det = 1.0 / det;
    let tvec = origin - a;
    let u = tvec.dot(pvec) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }
    let qvec = tvec.cross(edge1);
    let v = dir.dot(qvec) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }
    let t = edge2.dot(qvec) * inv_det;
    if t < 0.0 {
        return None;
    }
    Some(t)
}

/// Finds the closest point to `p` on triangle `(a, b, c)` (Ericson,
/// *Real-Time Collision Detection*, §5.1.5).
pub fn closest_point_on_triangle(p: Vec3, a: Vec3, b: Vec3, c: Vec3) -> Vec3 {
    let ab = b - a;
    let ac = c - a;
    let ap = p - a;
    let d1 = ab.dot(ap);
    let d2 = ac.dot(ap);
    if d1 <= 0.0 && d2 <= 0.0 {
        return a;
    }

    let bp = p - b;
    let d3 = ab.dot(bp);
    let d4 = ac.dot(bp);
    if d3 >= 0.0 && d4 <= d3 {
        return b;
    }

    let vc = d1 * d4 - d3 * d2;
    if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 {
        let v = d1 / (d1 - d3);
        return a + ab * v;
    }

    let cp = p - c;
    let d5 = ab.dot(cp);
    let d6 = ac.dot(cp);
    if d6 >= 0.0 && d5 <= d6 {
        return c;
    }

    let vb = d5 * d2 - d1 * d6;
    if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 {
        let w = d2 / (d2 - d6);
        return a + ac * w;
    }

    let va = d3 * d6 - d5 * d4;
    if va <= 0.0 && (d4 - d3) >= 0.0 && (d5 - d6) >= 0.0 {
        let w = (d4 - d3) / ((d4 - d3) + (d5 - d6));
        return b + (c - b) * w;
    }

    let denom = 1.0 / (va + vb + vc);
    let v = vb * denom;
    let w = vc * denom;
    a + ab * v + ac * w
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ray_hits_triangle_center() {
        let a = Vec3::new(-1.0, -1.0, 0.0);
        let b = Vec3::new(1.0, -1.0, 0.0);
        let c = Vec3::new(0.0, 1.0, 0.0);
        let t = ray_triangle_intersect(Vec3::new(0.0, -0.3, 5.0), Vec3::new(0.0, 0.0, -1.0), a, b, c);
        assert!((t.unwrap() - 5.0).abs() < 1e-4);
    }

    #[test]
    fn test_ray_misses_outside_triangle() {
        let a = Vec3::new(-1.0, -1.0, 0.0);
        let b = Vec3::new(1.0, -1.0, 0.0);
        let c = Vec3::new(0.0, 1.0, 0.0);
        let t = ray_triangle_intersect(Vec3::new(5.0, 5.0, 5.0), Vec3::new(0.0, 0.0, -1.0), a, b, c);
        assert!(t.is_none());
    }

    #[test]
    fn test_closest_point_on_triangle_vertex() {
        let a = Vec3::new(0.0, 0.0, 0.0);
        let b = Vec3::new(1.0, 0.0, 0.0);
        let c = Vec3::new(0.0, 1.0, 0.0);
        let p = Vec3::new(-5.0, -5.0, 0.0);
        let cp = closest_point_on_triangle(p, a, b, c);
        assert_eq!(cp, a);
    }

    #[test]
    fn test_closest_point_on_triangle_interior() {
        let a = Vec3::new(0.0, 0.0, 0.0);
        let b = Vec3::new(1.0, 0.0, 0.0);
        let c = Vec3::new(0.0, 1.0, 0.0);
        let p = Vec3::new(0.25, 0.25, 1.0);
        let cp = closest_point_on_triangle(p, a, b, c);
        assert!((cp.z - 0.0).abs() < 1e-5);
        assert!((cp.x - 0.25).abs() < 1e-5);
    }
}
