//! Applying a dense correction field to an observation to produce its
//! "Blended" variant (spec.md §4.5, §3 "Per-observation Correction Field").

use seamweld_core::Image;

use crate::error::{PropagateError, Result};

/// Adds `correction` to `base` band-for-band, producing the observation's
/// blended variant. `base` is whichever variant (blurred or original) the
/// caller's [`crate::AppliedVariant`] selects.
///
/// # Errors
///
/// Returns [`PropagateError::ApplyDimensionMismatch`] if `correction` and
/// `base` don't share one geometry.
pub fn apply_correction(base: &Image, correction: &Image) -> Result<Image> {
    let (ow, oh) = base.dimensions();
    let (fw, fh) = correction.dimensions();
    if (ow, oh) != (fw, fh) {
        return Err(PropagateError::ApplyDimensionMismatch { fw, fh, ow, oh });
    }
    let mut out = base.clone();
    for y in 0..oh {
        for x in 0..ow {
            if !base.is_valid(x, y) {
                continue;
            }
            let bands = base.bands().min(correction.bands());
            let mut px: Vec<f32> = base.pixel(x, y).to_vec();
            if correction.is_valid(x, y) {
                let delta = correction.pixel(x, y);
                for b in 0..bands {
                    px[b] += delta[b];
                }
            }
            out.set_pixel(x, y, &px);
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adds_correction_where_valid() {
        let mut base = Image::new(2, 1, 1);
        base.set_pixel(0, 0, &[0.5]);
        base.set_pixel(1, 0, &[0.5]);

        let mut correction = Image::new_empty(2, 1, 1);
        correction.set_pixel(0, 0, &[0.1]);
        correction.set_valid(0, 0, true);

        let blended = apply_correction(&base, &correction).unwrap();
        assert!((blended.pixel(0, 0)[0] - 0.6).abs() < 1e-6);
        assert!((blended.pixel(1, 0)[0] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn dimension_mismatch_is_an_error() {
        let base = Image::new(2, 1, 1);
        let correction = Image::new_empty(3, 1, 1);
        assert!(apply_correction(&base, &correction).is_err());
    }
}
