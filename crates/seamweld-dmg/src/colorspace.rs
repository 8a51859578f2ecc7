//! RGB/Lab color space conversion for the solver (spec.md §4.4, §6).
//!
//! The solver can optionally relax in CIE Lab or a log-luminance variant of
//! Lab instead of raw RGB, so that its gradient-matching term operates on a
//! perceptually uniform space. Inputs are assumed to already be linear-light
//! RGB (the sRGB encode/decode toggle is a separate, orthogonal concern
//! handled by [`seamweld_transfer::srgb`] upstream of the solver).

use seamweld_math::{Mat3, Vec3};

/// Which space the solver relaxes in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorSpace {
    /// Relax directly on the input bands.
    #[default]
    None,
    /// Convert 3-band linear RGB to CIE Lab (D65 white point) before
    /// relaxing, and back afterward.
    RgbToLab,
    /// Like [`ColorSpace::RgbToLab`], but the lightness channel is
    /// log-encoded luminance rather than CIE `L*`, compressing the dynamic
    /// range of high-contrast terrain imagery before relaxation.
    RgbToLogLab,
}

/// sRGB (linear) to CIE XYZ, D65 white point.
const RGB_TO_XYZ: Mat3 = Mat3 {
    m: [
        [0.4124564, 0.3575761, 0.1804375],
        [0.2126729, 0.7151522, 0.0721750],
        [0.0193339, 0.1191920, 0.9503041],
    ],
};

/// CIE XYZ to sRGB (linear), D65 white point; inverse of [`RGB_TO_XYZ`].
const XYZ_TO_RGB: Mat3 = Mat3 {
    m: [
        [3.2404542, -1.5371385, -0.4985314],
        [-0.9692660, 1.8760108, 0.0415560],
        [0.0556434, -0.2040259, 1.0572252],
    ],
};

/// D65 reference white, CIE XYZ.
const WHITE: Vec3 = Vec3 { x: 0.95047, y: 1.0, z: 1.08883 };

const LAB_EPSILON: f32 = 216.0 / 24389.0;
const LAB_KAPPA: f32 = 24389.0 / 27.0;

fn lab_f(t: f32) -> f32 {
    if t > LAB_EPSILON {
        t.cbrt()
    } else {
        (LAB_KAPPA * t + 16.0) / 116.0
    }
}

fn lab_f_inv(t: f32) -> f32 {
    let t3 = t * t * t;
    if t3 > LAB_EPSILON {
        t3
    } else {
        (116.0 * t - 16.0) / LAB_KAPPA
    }
}

/// Converts linear RGB to CIE XYZ.
pub fn rgb_to_xyz(rgb: Vec3) -> Vec3 {
    RGB_TO_XYZ * rgb
}

/// Converts CIE XYZ to linear RGB.
pub fn xyz_to_rgb(xyz: Vec3) -> Vec3 {
    XYZ_TO_RGB * xyz
}

/// Converts CIE XYZ to CIE Lab (D65).
pub fn xyz_to_lab(xyz: Vec3) -> Vec3 {
    let fx = lab_f(xyz.x / WHITE.x);
    let fy = lab_f(xyz.y / WHITE.y);
    let fz = lab_f(xyz.z / WHITE.z);
    Vec3::new(116.0 * fy - 16.0, 500.0 * (fx - fy), 200.0 * (fy - fz))
}

/// Converts CIE Lab (D65) to CIE XYZ.
pub fn lab_to_xyz(lab: Vec3) -> Vec3 {
    let fy = (lab.x + 16.0) / 116.0;
    let fx = fy + lab.y / 500.0;
    let fz = fy - lab.z / 200.0;
    Vec3::new(lab_f_inv(fx) * WHITE.x, lab_f_inv(fy) * WHITE.y, lab_f_inv(fz) * WHITE.z)
}

/// Converts linear RGB to CIE Lab in one step.
pub fn rgb_to_lab(rgb: Vec3) -> Vec3 {
    xyz_to_lab(rgb_to_xyz(rgb))
}

/// Converts CIE Lab back to linear RGB in one step.
pub fn lab_to_rgb(lab: Vec3) -> Vec3 {
    xyz_to_rgb(lab_to_xyz(lab))
}

/// Converts linear RGB to the log-lightness Lab variant: like
/// [`rgb_to_lab`], but `L*` is replaced by `log1p(Y)` scaled to a comparable
/// range, compressing highlights before the solver relaxes.
pub fn rgb_to_log_lab(rgb: Vec3) -> Vec3 {
    let xyz = rgb_to_xyz(rgb);
    let lab = xyz_to_lab(xyz);
    let log_l = xyz.y.max(0.0).ln_1p() * 100.0;
    Vec3::new(log_l, lab.y, lab.z)
}

/// Inverse of [`rgb_to_log_lab`].
pub fn log_lab_to_rgb(lab: Vec3) -> Vec3 {
    let y = (lab.x / 100.0).exp_m1().max(0.0);
    // Recover a* b* the same way rgb_to_lab would have, pivoting on the
    // recovered Y via the CIE L* that corresponds to it.
    let fy = lab_f(y / WHITE.y);
    let fx = fy + lab.y / 500.0;
    let fz = fy - lab.z / 200.0;
    let xyz = Vec3::new(lab_f_inv(fx) * WHITE.x, y, lab_f_inv(fz) * WHITE.z);
    xyz_to_rgb(xyz)
}

impl ColorSpace {
    /// Converts one 3-band RGB sample into this color space's representation.
    pub fn forward(self, rgb: [f32; 3]) -> [f32; 3] {
        let v = Vec3::new(rgb[0], rgb[1], rgb[2]);
        let out = match self {
            ColorSpace::None => v,
            ColorSpace::RgbToLab => rgb_to_lab(v),
            ColorSpace::RgbToLogLab => rgb_to_log_lab(v),
        };
        [out.x, out.y, out.z]
    }

    /// Inverse of [`ColorSpace::forward`].
    pub fn inverse(self, sample: [f32; 3]) -> [f32; 3] {
        let v = Vec3::new(sample[0], sample[1], sample[2]);
        let out = match self {
            ColorSpace::None => v,
            ColorSpace::RgbToLab => lab_to_rgb(v),
            ColorSpace::RgbToLogLab => log_lab_to_rgb(v),
        };
        [out.x, out.y, out.z]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_lab_roundtrip() {
        let rgb = Vec3::new(0.6, 0.2, 0.4);
        let lab = rgb_to_lab(rgb);
        let back = lab_to_rgb(lab);
        assert_relative_eq!(back.x, rgb.x, epsilon = 1e-3);
        assert_relative_eq!(back.y, rgb.y, epsilon = 1e-3);
        assert_relative_eq!(back.z, rgb.z, epsilon = 1e-3);
    }

    #[test]
    fn test_log_lab_roundtrip() {
        let rgb = Vec3::new(0.1, 0.9, 0.3);
        let lab = rgb_to_log_lab(rgb);
        let back = log_lab_to_rgb(lab);
        assert_relative_eq!(back.x, rgb.x, epsilon = 1e-3);
        assert_relative_eq!(back.y, rgb.y, epsilon = 1e-3);
        assert_relative_eq!(back.z, rgb.z, epsilon = 1e-3);
    }

    #[test]
    fn test_white_is_achromatic() {
        let lab = rgb_to_lab(Vec3::new(1.0, 1.0, 1.0));
        assert_relative_eq!(lab.y, 0.0, epsilon = 1e-2);
        assert_relative_eq!(lab.z, 0.0, epsilon = 1e-2);
        assert_relative_eq!(lab.x, 100.0, epsilon = 0.5);
    }

    #[test]
    fn test_colorspace_none_is_identity() {
        let rgb = [0.3, 0.4, 0.5];
        assert_eq!(ColorSpace::None.forward(rgb), rgb);
        assert_eq!(ColorSpace::None.inverse(rgb), rgb);
    }
}
