//! Turning a coherent scene index into the artifacts the multigrid blender
//! and propagator consume directly (spec.md §3 "Coherent Scene Texture
//! (blurred variant)", §4.4's `region` input).

use seamweld_core::Image;

use crate::bits::{decode, IndexValue};

/// Extracts the coherent index's observation-id band (band 0) as a
/// standalone single-band image, suitable as the `region` argument to
/// [`seamweld_dmg::solve`]: pixels from the same observation share a
/// region id, so seam edges (`J(p) != J(q)`) fall exactly at observation
/// boundaries, per spec.md §4.4.
pub fn extract_region_band(index: &Image) -> Image {
    let (w, h) = index.dimensions();
    let mut out = Image::new_empty(w, h, 1);
    for y in 0..h {
        for x in 0..w {
            if index.is_valid(x, y) {
                out.set_pixel(x, y, &index.pixel(x, y)[0..1]);
                out.set_valid(x, y, true);
            }
        }
    }
    out
}

/// Builds the "Coherent Scene Texture" composite (spec.md §3) by sampling
/// each composite texel's source observation at `(row, col)`, through
/// `sample`. `sample(obs, row, col)` returns that observation's pixel
/// value (already read from whichever variant — blurred or original — the
/// caller wants composited), or `None` if the observation is unavailable
/// (per-unit failure, spec.md §7 kind 4: the texel is left masked and the
/// run continues).
///
/// `HoldConstant` texels are left masked here; the caller (the solver) is
/// expected to supply their existing value separately as a Dirichlet
/// boundary, since this function has no "existing texture" to hold.
pub fn build_coherent_texture(
    index: &Image,
    bands: usize,
    legacy_invalid_index: bool,
    sample: impl Fn(u16, u16, u16) -> Option<Vec<f32>>,
) -> Image {
    let (w, h) = index.dimensions();
    let mut out = Image::new_empty(w, h, bands);
    for y in 0..h {
        for x in 0..w {
            if !index.is_valid(x, y) {
                continue;
            }
            if let IndexValue::Observation { obs, row, col } = decode(index.pixel(x, y), legacy_invalid_index) {
                if let Some(px) = sample(obs, row, col) {
                    out.set_pixel(x, y, &px);
                    out.set_valid(x, y, true);
                }
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index_pixel(obs: u16, row: u16, col: u16) -> [f32; 3] {
        [obs as f32, row as f32, col as f32]
    }

    #[test]
    fn extract_region_band_keeps_only_observation_id() {
        let mut index = Image::new(1, 1, 3);
        index.set_pixel(0, 0, &index_pixel(7, 3, 4));
        let region = extract_region_band(&index);
        assert_eq!(region.bands(), 1);
        assert_eq!(region.pixel(0, 0), [7.0]);
    }

    #[test]
    fn unmasked_pixels_stay_masked_in_region_band() {
        let index = Image::new_empty(1, 1, 3);
        let region = extract_region_band(&index);
        assert!(!region.is_valid(0, 0));
    }

    #[test]
    fn build_coherent_texture_samples_through_index() {
        let mut index = Image::new(2, 1, 3);
        index.set_pixel(0, 0, &index_pixel(10, 10, 20));
        index.set_pixel(1, 0, &index_pixel(20, 11, 21));
        let texture = build_coherent_texture(&index, 1, false, |obs, row, col| {
            Some(vec![obs as f32 * 100.0 + row as f32 + col as f32])
        });
        assert_eq!(texture.pixel(0, 0), [1030.0]);
        assert_eq!(texture.pixel(1, 0), [2032.0]);
    }

    #[test]
    fn missing_observation_leaves_texel_masked() {
        let mut index = Image::new(1, 1, 3);
        index.set_pixel(0, 0, &index_pixel(9, 0, 0));
        let texture = build_coherent_texture(&index, 1, false, |_, _, _| None);
        assert!(!texture.is_valid(0, 0));
    }
}
