//! Orthographic top-down camera used by the rasterizer.

use seamweld_math::{Vec2, Vec3};

/// An orthographic top-down projection: a center point, an in-plane right
/// axis, an in-plane down axis, and a world-to-pixel scale.
///
/// `right` and `down` must be unit vectors perpendicular to each other (and
/// typically to the scene's dominant up axis); no validation is performed
/// here since the caller (the coherent-index builder) derives them from the
/// scene bounds.
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    /// World-space point that projects to the center of the output image.
    pub center: Vec3,
    /// Unit vector: world direction that maps to +X in the output image.
    pub right: Vec3,
    /// Unit vector: world direction that maps to +Y in the output image.
    pub down: Vec3,
    /// World units (meters) spanned by one output pixel.
    pub meters_per_pixel: f32,
}

impl Camera {
    /// Projects a world-space point to pixel coordinates in an image of the
    /// given dimensions, with `(width/2, height/2)` as the image center.
    pub fn project_to_pixel(&self, p: Vec3, out_width: u32, out_height: u32) -> Vec2 {
        let rel = p - self.center;
        let u = rel.dot(self.right) / self.meters_per_pixel + out_width as f32 * 0.5;
        let v = rel.dot(self.down) / self.meters_per_pixel + out_height as f32 * 0.5;
        Vec2::new(u, v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_center_point() {
        let cam = Camera {
            center: Vec3::ZERO,
            right: Vec3::new(1.0, 0.0, 0.0),
            down: Vec3::new(0.0, -1.0, 0.0),
            meters_per_pixel: 1.0,
        };
        let p = cam.project_to_pixel(Vec3::ZERO, 100, 100);
        assert_eq!(p, Vec2::new(50.0, 50.0));
    }

    #[test]
    fn test_project_offset_scales_by_meters_per_pixel() {
        let cam = Camera {
            center: Vec3::ZERO,
            right: Vec3::new(1.0, 0.0, 0.0),
            down: Vec3::new(0.0, -1.0, 0.0),
            meters_per_pixel: 0.5,
        };
        let p = cam.project_to_pixel(Vec3::new(1.0, 0.0, 0.0), 100, 100);
        assert_eq!(p, Vec2::new(52.0, 50.0));
    }
}
