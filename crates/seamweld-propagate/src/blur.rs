//! Post-scatter Gaussian blur (spec.md §4.5: "lightly Gaussian-blurred
//! (default radius 7) to remove interpolation artefacts").

use seamweld_core::Image;
use seamweld_ops::parallel::gaussian_blur;

use crate::error::Result;

/// Blurs `field` in place with a Gaussian kernel sized from `radius`.
/// Masked pixels are treated as zero for the blur (they hold no usable Δ
/// and interpolation/diffusion already filled everything that matters
/// before this stage runs); the mask itself is left untouched.
pub fn blur_correction_field(field: &Image, radius: u32) -> Result<Image> {
    let (width, height) = field.dimensions();
    let bands = field.bands();
    let sigma = (radius.max(1) as f32) / 3.0;
    let blurred = gaussian_blur(field.data(), width as usize, height as usize, bands, sigma)?;
    let mut out = Image::from_data(width, height, bands, blurred)?;
    for y in 0..height {
        for x in 0..width {
            out.set_valid(x, y, field.is_valid(x, y));
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blur_preserves_shape_and_validity() {
        let mut field = Image::new_empty(8, 8, 1);
        field.set_pixel(4, 4, &[1.0]);
        field.set_valid(4, 4, true);
        let blurred = blur_correction_field(&field, 7).unwrap();
        assert_eq!(blurred.dimensions(), (8, 8));
        assert!(blurred.is_valid(4, 4));
        assert!(!blurred.is_valid(0, 0));
    }
}
