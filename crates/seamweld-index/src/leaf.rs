//! Leaf tile inputs for coherent-index Path A (spec.md §4.3).

use seamweld_core::{Connectivity, Image};
use seamweld_mesh::Mesh;

/// One leaf tile's mesh and its own (possibly atlased, not necessarily
/// coherent) backproject index.
///
/// `index` carries four bands: `obs, row, col, weight`. The `weight` band
/// (e.g. a winner confidence or a boolean 0/1 winner flag) is thresholded
/// by [`mask_losing_pixels`] to clear the validity bit of losing pixels
/// before the leaf is rasterized into the scene-wide composite; it is not
/// itself part of the coherent index and is dropped once masking is done.
#[derive(Debug, Clone)]
pub struct LeafTile {
    /// The leaf's own mesh, UV-mapped to address `index`.
    pub mesh: Mesh,
    /// Four-band `(obs, row, col, weight)` backproject index for this leaf.
    pub index: Image,
}

/// Clears the validity bit of every pixel whose `weight` band (band 3) is
/// below `threshold`, per spec.md §4.3 Path A ("mask losing pixels by
/// thresholding the index validity band").
pub fn mask_losing_pixels(index: &mut Image, threshold: f32) {
    let (w, h) = index.dimensions();
    for y in 0..h {
        for x in 0..w {
            if index.is_valid(x, y) && index.pixel(x, y)[3] < threshold {
                index.set_valid(x, y, false);
            }
        }
    }
}

/// Drops the `weight` band, producing a plain 3-band `(obs, row, col)`
/// image suitable for compositing, preserving the validity mask.
pub fn trim_to_index_bands(index: &Image) -> Image {
    let (w, h) = index.dimensions();
    let mut out = Image::new_empty(w, h, 3);
    for y in 0..h {
        for x in 0..w {
            if index.is_valid(x, y) {
                let px = index.pixel(x, y);
                out.set_pixel(x, y, &px[0..3]);
            }
        }
    }
    out
}

/// Closes small masked gaps left between leaf tiles after compositing
/// (spec.md §4.3: "inpaint small gaps of radius ≤ 2 using any 8-connected
/// neighbor; this closes tile-edge cracks").
pub fn close_tile_edge_cracks(composite: &mut Image, radius: u32) {
    if radius > 0 {
        composite.inpaint(radius, Connectivity::Eight);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_losing_pixels_clears_below_threshold() {
        let mut idx = Image::new(2, 1, 4);
        idx.set_pixel(0, 0, &[1.0, 0.0, 0.0, 1.0]);
        idx.set_pixel(1, 0, &[2.0, 0.0, 0.0, 0.1]);
        mask_losing_pixels(&mut idx, 0.5);
        assert!(idx.is_valid(0, 0));
        assert!(!idx.is_valid(1, 0));
    }

    #[test]
    fn test_trim_drops_weight_band() {
        let mut idx = Image::new(1, 1, 4);
        idx.set_pixel(0, 0, &[5.0, 6.0, 7.0, 1.0]);
        let trimmed = trim_to_index_bands(&idx);
        assert_eq!(trimmed.bands(), 3);
        assert_eq!(trimmed.pixel(0, 0), [5.0, 6.0, 7.0]);
    }
}
