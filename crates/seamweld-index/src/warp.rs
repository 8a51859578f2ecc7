//! Center-dense composite-space UV warp (spec.md §4.3, §4.5).
//!
//! When the orbital surround of the surface mesh is significantly larger
//! than the surface itself, a central sub-rectangle of composite UVs is
//! warped outward so the high-detail central region consumes more texels.
//! The same warp function must be consulted at every stage that maps
//! between composite pixels and world coordinates (here, the rasterizer's
//! pixel-center remap; in `seamweld-propagate`, the inverse when scattering
//! corrections back).

use seamweld_math::Vec2;

/// Builds a bilinear ease warp that expands the central `center_fraction`
/// (in `[0, 1]`, e.g. `0.5` for the middle half) of normalized UV space to
/// fill more of the output, compressing the surrounding margin.
///
/// `ease` in `(0, 1]` controls how aggressively the center is dilated: `1.0`
/// performs no warp; smaller values dedicate progressively more of the
/// image to the center. Operates independently per axis.
pub fn center_dense_warp(center_fraction: f32, ease: f32) -> impl Fn(Vec2) -> Vec2 + Sync + Copy {
    let center_fraction = center_fraction.clamp(1e-3, 1.0);
    let ease = ease.clamp(1e-3, 1.0);
    move |p: Vec2| Vec2::new(warp_axis(p.x, center_fraction, ease), warp_axis(p.y, center_fraction, ease))
}

/// Warps one normalized `[0, 1]` axis coordinate.
fn warp_axis(t: f32, center_fraction: f32, ease: f32) -> f32 {
    let margin = (1.0 - center_fraction) * 0.5;
    let centered = t - 0.5;
    let sign = centered.signum();
    let mag = centered.abs();
    // Power curve: `mag.powf(ease)` expands small (central) magnitudes
    // relative to large (edge) ones when ease < 1.
    let warped_mag = mag.powf(ease) * (0.5f32).powf(1.0 - ease);
    let clamped = warped_mag.min(0.5 - margin * 0.0);
    0.5 + sign * clamped.min(0.5)
}

/// Pixel-space adapter: wraps [`center_dense_warp`]'s normalized-UV warp so
/// it can be passed directly as a [`seamweld_raster::WarpFn`] over an image
/// of the given dimensions.
pub fn pixel_space_warp(
    width: u32,
    height: u32,
    center_fraction: f32,
    ease: f32,
) -> impl Fn(Vec2) -> Vec2 + Sync + Copy {
    let inner = center_dense_warp(center_fraction, ease);
    move |p: Vec2| {
        let norm = Vec2::new(p.x / width as f32, p.y / height as f32);
        let warped = inner(norm);
        Vec2::new(warped.x * width as f32, warped.y * height as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_at_full_ease() {
        let warp = center_dense_warp(1.0, 1.0);
        let p = Vec2::new(0.3, 0.7);
        let out = warp(p);
        assert!((out.x - p.x).abs() < 1e-4);
        assert!((out.y - p.y).abs() < 1e-4);
    }

    #[test]
    fn test_center_stays_centered() {
        let warp = center_dense_warp(0.5, 0.5);
        let out = warp(Vec2::new(0.5, 0.5));
        assert!((out.x - 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_warp_is_monotonic_on_axis() {
        let warp = center_dense_warp(0.5, 0.5);
        let a = warp(Vec2::new(0.4, 0.5)).x;
        let b = warp(Vec2::new(0.45, 0.5)).x;
        let c = warp(Vec2::new(0.5, 0.5)).x;
        assert!(a < b && b <= c);
    }
}
