//! Per-image luminance adjustment toward a global median (spec.md §4.3 C6,
//! §6 "Pre-adjust luminance strength ∈ [0,1]").
//!
//! Rover observations of the same terrain patch can carry noticeably
//! different exposure. Before handing images to the rasterizer/DMG stages,
//! each observation's luminance is nudged toward the batch's median so the
//! seam-hiding solver isn't asked to paper over a large flat exposure step
//! in addition to genuine parallax/reflectance seams.

use seamweld_core::Image;

use crate::error::{ConditionerError, Result};

/// Rec. 709 luma coefficients, matching the weighting `seamweld-dmg`'s
/// colorspace module uses for its own luminance channel.
const LUMA_COEFFS: [f32; 3] = [0.2126, 0.7152, 0.0722];

/// Mean luminance over an image's valid pixels. 1-band images are treated
/// as already luminance; 3+ band images are weighted by [`LUMA_COEFFS`].
///
/// # Errors
///
/// Returns [`ConditionerError::NoValidPixels`] if the image has no valid
/// pixels.
pub fn mean_luminance(image: &Image) -> Result<f32> {
    let (w, h) = image.dimensions();
    let mut sum = 0.0f64;
    let mut count = 0u64;
    for y in 0..h {
        for x in 0..w {
            if !image.is_valid(x, y) {
                continue;
            }
            let px = image.pixel(x, y);
            let l = if px.len() >= 3 {
                px[0] * LUMA_COEFFS[0] + px[1] * LUMA_COEFFS[1] + px[2] * LUMA_COEFFS[2]
            } else {
                px[0]
            };
            sum += l as f64;
            count += 1;
        }
    }
    if count == 0 {
        return Err(ConditionerError::NoValidPixels);
    }
    Ok((sum / count as f64) as f32)
}

/// Median of a batch's per-image mean luminances. Images with no valid
/// pixels are skipped.
///
/// # Errors
///
/// Returns [`ConditionerError::EmptyBatch`] if `images` is empty, or
/// [`ConditionerError::NoValidPixels`] if every image had no valid pixels.
pub fn median_luminance(images: &[Image]) -> Result<f32> {
    if images.is_empty() {
        return Err(ConditionerError::EmptyBatch);
    }
    let mut values: Vec<f32> = images.iter().filter_map(|img| mean_luminance(img).ok()).collect();
    if values.is_empty() {
        return Err(ConditionerError::NoValidPixels);
    }
    values.sort_by(|a, b| a.total_cmp(b));
    Ok(values[values.len() / 2])
}

/// Computes the per-image multiplicative gain that would move each image's
/// mean luminance to `target`, then blends that gain toward `1.0` (no-op)
/// by `1.0 - strength`. `strength = 0.0` disables adjustment entirely
/// (every gain is `1.0`); `strength = 1.0` matches the target exactly.
pub fn luminance_gains(images: &[Image], target: f32, strength: f32) -> Vec<f32> {
    let strength = strength.clamp(0.0, 1.0);
    images
        .iter()
        .map(|img| match mean_luminance(img) {
            Ok(l) if l > 1e-6 => {
                let full_gain = target / l;
                1.0 + (full_gain - 1.0) * strength
            }
            _ => 1.0,
        })
        .collect()
}

/// Multiplies every band of every valid pixel by `gain`.
pub fn apply_gain(image: &mut Image, gain: f32) {
    image.apply_in_place(|px| {
        for v in px.iter_mut() {
            *v *= gain;
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_image(value: f32) -> Image {
        let mut img = Image::new(2, 2, 1);
        img.fill(&[value]);
        img
    }

    #[test]
    fn test_mean_luminance_single_band() {
        let img = flat_image(0.5);
        assert!((mean_luminance(&img).unwrap() - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_median_luminance_of_batch() {
        let images = vec![flat_image(0.2), flat_image(0.5), flat_image(0.8)];
        assert!((median_luminance(&images).unwrap() - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_zero_strength_disables_adjustment() {
        let images = vec![flat_image(0.2), flat_image(0.8)];
        let gains = luminance_gains(&images, 0.5, 0.0);
        for g in gains {
            assert!((g - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_full_strength_matches_target_exactly() {
        let images = vec![flat_image(0.2)];
        let gains = luminance_gains(&images, 0.5, 1.0);
        let mut img = images[0].clone();
        apply_gain(&mut img, gains[0]);
        assert!((mean_luminance(&img).unwrap() - 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_empty_batch_errors() {
        assert!(matches!(median_luminance(&[]), Err(ConditionerError::EmptyBatch)));
    }
}
