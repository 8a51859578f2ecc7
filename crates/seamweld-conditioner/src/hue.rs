//! RGB↔HSV conversion and median-hue colorization of mono observations
//! (spec.md §4.3 C6, §6 "Colorize: apply median hue to mono observations").
//!
//! Some observations are captured by a monochrome filter and have no
//! chroma of their own. Rather than leave them gray against their
//! neighbors' color, the conditioner can paint them with the batch's
//! median hue at a caller-chosen saturation, using each pixel's own
//! luminance as HSV value.

use seamweld_core::Image;

use crate::error::{ConditionerError, Result};

/// Converts linear RGB in `[0, 1]` to `(hue degrees in [0, 360), saturation
/// in [0, 1], value in [0, 1])`.
pub fn rgb_to_hsv(r: f32, g: f32, b: f32) -> (f32, f32, f32) {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;
    let value = max;
    let saturation = if max > 1e-6 { delta / max } else { 0.0 };
    let hue = if delta < 1e-6 {
        0.0
    } else if max == r {
        60.0 * (((g - b) / delta).rem_euclid(6.0))
    } else if max == g {
        60.0 * ((b - r) / delta + 2.0)
    } else {
        60.0 * ((r - g) / delta + 4.0)
    };
    (hue, saturation, value)
}

/// Converts `(hue degrees, saturation, value)` back to linear RGB.
pub fn hsv_to_rgb(hue: f32, saturation: f32, value: f32) -> (f32, f32, f32) {
    let h = hue.rem_euclid(360.0) / 60.0;
    let c = value * saturation;
    let x = c * (1.0 - (h.rem_euclid(2.0) - 1.0).abs());
    let m = value - c;
    let (r1, g1, b1) = match h as i32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    (r1 + m, g1 + m, b1 + m)
}

/// Median hue (degrees) across a batch of 3-band color images' valid
/// pixels.
///
/// # Errors
///
/// Returns [`ConditionerError::NoValidPixels`] if no 3-band image with
/// valid pixels was found in the batch.
pub fn median_hue(images: &[Image]) -> Result<f32> {
    let mut hues = Vec::new();
    for img in images {
        if img.bands() < 3 {
            continue;
        }
        let (w, h) = img.dimensions();
        for y in 0..h {
            for x in 0..w {
                if !img.is_valid(x, y) {
                    continue;
                }
                let px = img.pixel(x, y);
                let (hue, sat, _) = rgb_to_hsv(px[0], px[1], px[2]);
                if sat > 0.05 {
                    hues.push(hue);
                }
            }
        }
    }
    if hues.is_empty() {
        return Err(ConditionerError::NoValidPixels);
    }
    hues.sort_by(|a, b| a.total_cmp(b));
    Ok(hues[hues.len() / 2])
}

/// Colorizes a 1-band mono image into a 3-band RGB image, using `hue` and
/// `saturation` for every valid pixel and the pixel's own band-0 value as
/// HSV value (luminance).
pub fn colorize(mono: &Image, hue: f32, saturation: f32) -> Image {
    let (w, h) = mono.dimensions();
    let mut out = Image::new_empty(w, h, 3);
    for y in 0..h {
        for x in 0..w {
            if !mono.is_valid(x, y) {
                continue;
            }
            let value = mono.pixel(x, y)[0];
            let (r, g, b) = hsv_to_rgb(hue, saturation, value);
            out.set_pixel(x, y, &[r, g, b]);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_hsv_roundtrip() {
        let cases = [(0.8, 0.2, 0.1), (0.1, 0.9, 0.3), (0.0, 0.0, 0.0), (1.0, 1.0, 1.0)];
        for (r, g, b) in cases {
            let (h, s, v) = rgb_to_hsv(r, g, b);
            let (r2, g2, b2) = hsv_to_rgb(h, s, v);
            assert!((r - r2).abs() < 1e-4, "r mismatch: {r} vs {r2}");
            assert!((g - g2).abs() < 1e-4, "g mismatch: {g} vs {g2}");
            assert!((b - b2).abs() < 1e-4, "b mismatch: {b} vs {b2}");
        }
    }

    #[test]
    fn test_gray_has_zero_saturation() {
        let (_, s, v) = rgb_to_hsv(0.5, 0.5, 0.5);
        assert!(s < 1e-6);
        assert!((v - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_median_hue_skips_grey_pixels() {
        let mut red = Image::new(1, 1, 3);
        red.fill(&[1.0, 0.0, 0.0]);
        let mut gray = Image::new(1, 1, 3);
        gray.fill(&[0.5, 0.5, 0.5]);
        let hue = median_hue(&[red, gray]).unwrap();
        assert!((hue - 0.0).abs() < 1e-3);
    }

    #[test]
    fn test_colorize_preserves_luminance_as_value() {
        let mut mono = Image::new(1, 1, 1);
        mono.fill(&[0.6]);
        let colorized = colorize(&mono, 120.0, 0.5);
        let (_, _, v) = rgb_to_hsv(colorized.pixel(0, 0)[0], colorized.pixel(0, 0)[1], colorized.pixel(0, 0)[2]);
        assert!((v - 0.6).abs() < 1e-4);
    }
}
