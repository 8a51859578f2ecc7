//! Per-vertex attribute sources sampled during rasterization.
//!
//! The rasterizer interpolates, per output pixel, the *per-vertex* values
//! returned here — it never samples a shared texture per-pixel. Each vertex
//! supplies its value via its own source image lookup (spec.md §4.1), which
//! is how a textured leaf tile or an atlased scene mesh hands its colors to
//! the scan converter.

use seamweld_core::Image;
use seamweld_math::Vec2;

/// Supplies up to a handful of per-vertex float bands to the rasterizer.
pub trait AttributeSource {
    /// Number of float bands each vertex supplies.
    fn bands(&self) -> usize;

    /// Returns the band values for vertex `vertex_index`, or `None` if the
    /// vertex has no valid source sample (e.g. its UV lands on a masked
    /// source pixel) — such vertices contribute nothing to coverage
    /// (pixels whose nearest-contributing-vertex data is missing are
    /// simply not written, matching the rasterizer's winner-take-all,
    /// leave-masked-on-miss convention).
    fn sample(&self, vertex_index: usize) -> Option<Vec<f32>>;
}

/// An [`AttributeSource`] that looks each vertex's value up in a shared
/// source image via a per-vertex UV coordinate.
///
/// This is the common case: a textured leaf mesh (Path A) or an atlased
/// scene mesh (Path B) whose vertices carry UVs into one backing image.
pub struct UvImageSource<'a> {
    image: &'a Image,
    uvs: &'a [Vec2],
    normalized: bool,
}

impl<'a> UvImageSource<'a> {
    /// Builds a source sampling `image` at `uvs[vertex_index]`.
    ///
    /// If `normalized` is `true`, UVs are taken to be in `[0, 1]` and
    /// scaled by the image's dimensions; otherwise they are already pixel
    /// coordinates.
    pub fn new(image: &'a Image, uvs: &'a [Vec2], normalized: bool) -> Self {
        Self { image, uvs, normalized }
    }
}

impl<'a> AttributeSource for UvImageSource<'a> {
    fn bands(&self) -> usize {
        self.image.bands()
    }

    fn sample(&self, vertex_index: usize) -> Option<Vec<f32>> {
        let uv = *self.uvs.get(vertex_index)?;
        let (x, y) = if self.normalized {
            (uv.x * self.image.width() as f32, uv.y * self.image.height() as f32)
        } else {
            (uv.x, uv.y)
        };
        let bands = self.image.bands();
        let mut out = Vec::with_capacity(bands);
        for band in 0..bands {
            out.push(self.image.sample_bilinear(x, y, band)?);
        }
        Some(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seamweld_core::Image;

    #[test]
    fn test_uv_image_source_samples_normalized() {
        let mut img = Image::new_empty(2, 2, 1);
        img.set_pixel(0, 0, &[1.0]);
        img.set_pixel(1, 0, &[1.0]);
        img.set_pixel(0, 1, &[1.0]);
        img.set_pixel(1, 1, &[1.0]);
        let uvs = vec![Vec2::new(0.5, 0.5)];
        let src = UvImageSource::new(&img, &uvs, true);
        let v = src.sample(0).unwrap();
        assert!((v[0] - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_uv_image_source_none_on_invalid() {
        let img = Image::new_empty(2, 2, 1);
        let uvs = vec![Vec2::new(0.5, 0.5)];
        let src = UvImageSource::new(&img, &uvs, true);
        assert!(src.sample(0).is_none());
    }
}
