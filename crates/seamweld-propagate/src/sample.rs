//! Collecting sparse per-observation Δ samples from a coherent scene index
//! (spec.md §4.5: "Δ(o;r,c) = B′(pixel) − B(pixel) in linearized color").

use std::collections::HashMap;

use seamweld_core::Image;
use seamweld_index::bits::{decode, IndexValue};

use crate::error::{PropagateError, Result};

/// One sparse observation-space correction sample.
#[derive(Debug, Clone)]
pub struct Sample {
    /// Source pixel row in the observation.
    pub row: u32,
    /// Source pixel column in the observation.
    pub col: u32,
    /// `blended − blurred`, one value per composite band.
    pub delta: Vec<f32>,
}

/// Walks every valid composite pixel, decodes its coherent-index triple,
/// and accumulates the per-observation Δ sample list.
///
/// `index`, `blurred`, and `blended` must share one geometry; bands of
/// `blurred`/`blended` are the color channels propagated (typically 3 for
/// RGB). Texels decoding to `NoData`/`HoldConstant` are skipped — they are
/// not attached to any observation.
pub fn collect_samples(
    index: &Image,
    blurred: &Image,
    blended: &Image,
    legacy_invalid_index: bool,
) -> Result<HashMap<u16, Vec<Sample>>> {
    let (iw, ih) = index.dimensions();
    let (bw, bh) = blurred.dimensions();
    let (cw, ch) = blended.dimensions();
    if (iw, ih) != (bw, bh) || (iw, ih) != (cw, ch) {
        return Err(PropagateError::DimensionMismatch { iw, ih, bw, bh, cw, ch });
    }

    let mut by_obs: HashMap<u16, Vec<Sample>> = HashMap::new();
    for y in 0..ih {
        for x in 0..iw {
            if !index.is_valid(x, y) {
                continue;
            }
            let bands = index.pixel(x, y);
            match decode(bands, legacy_invalid_index) {
                IndexValue::NoData | IndexValue::HoldConstant => continue,
                IndexValue::Observation { obs, row, col } => {
                    if !blurred.is_valid(x, y) || !blended.is_valid(x, y) {
                        continue;
                    }
                    let before = blurred.pixel(x, y);
                    let after = blended.pixel(x, y);
                    let delta: Vec<f32> = after.iter().zip(before.iter()).map(|(a, b)| a - b).collect();
                    by_obs.entry(obs).or_default().push(Sample { row: row as u32, col: col as u32, delta });
                }
            }
        }
    }
    Ok(by_obs)
}

/// Mean Δ across a sample list, one value per band. Empty input yields an
/// all-zero vector of `bands` length.
pub fn mean_delta(samples: &[Sample], bands: usize) -> Vec<f32> {
    if samples.is_empty() {
        return vec![0.0; bands];
    }
    let mut acc = vec![0.0f32; bands];
    for s in samples {
        for (a, v) in acc.iter_mut().zip(s.delta.iter()) {
            *a += v;
        }
    }
    for a in acc.iter_mut() {
        *a /= samples.len() as f32;
    }
    acc
}

#[cfg(test)]
mod tests {
    use super::*;
    use seamweld_core::Image;

    fn index_pixel(obs: u16, row: u16, col: u16) -> [f32; 3] {
        [obs as f32, row as f32, col as f32]
    }

    #[test]
    fn collects_one_sample_per_valid_composite_pixel() {
        let mut index = Image::new(2, 1, 3);
        index.set_pixel(0, 0, &index_pixel(5, 10, 20));
        index.set_pixel(1, 0, &index_pixel(5, 11, 21));

        let mut blurred = Image::new(2, 1, 1);
        blurred.set_pixel(0, 0, &[0.5]);
        blurred.set_pixel(1, 0, &[0.5]);

        let mut blended = Image::new(2, 1, 1);
        blended.set_pixel(0, 0, &[0.6]);
        blended.set_pixel(1, 0, &[0.4]);

        let by_obs = collect_samples(&index, &blurred, &blended, false).unwrap();
        let samples = &by_obs[&5];
        assert_eq!(samples.len(), 2);
        assert!((samples[0].delta[0] - 0.1).abs() < 1e-6);
        assert!((samples[1].delta[0] + 0.1).abs() < 1e-6);
    }

    #[test]
    fn skips_no_data_and_hold_constant_texels() {
        let mut index = Image::new(2, 1, 3);
        index.set_pixel(0, 0, &index_pixel(0, 0, 0)); // NoData
        index.set_pixel(1, 0, &index_pixel(1, 0, 0)); // HoldConstant (strict)
        let blurred = Image::new(2, 1, 1);
        let blended = Image::new(2, 1, 1);
        let by_obs = collect_samples(&index, &blurred, &blended, false).unwrap();
        assert!(by_obs.is_empty());
    }

    #[test]
    fn dimension_mismatch_is_an_error() {
        let index = Image::new(2, 1, 3);
        let blurred = Image::new(3, 1, 1);
        let blended = Image::new(2, 1, 1);
        assert!(collect_samples(&index, &blurred, &blended, false).is_err());
    }
}
