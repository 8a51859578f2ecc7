//! Configuration for coherent-index construction (spec.md §4.3, §6).

use seamweld_raster::Camera;

/// Configuration shared by all three construction paths.
#[derive(Debug, Clone)]
pub struct IndexConfig {
    /// Composite resolution along the long axis (power of two, default
    /// 4096 per spec.md §4.3).
    pub composite_resolution: u32,
    /// Orthographic top-down camera used to flatten leaf tiles (Path A) or
    /// the atlased scene mesh (Path B) into the composite. Unused by Path C,
    /// which addresses the composite directly through proxy-mesh UVs.
    pub camera: Camera,
    /// Gap-closing radius applied after rasterization (spec.md §4.3: "small
    /// gaps of radius ≤ 2"). `0` disables inpainting.
    pub inpaint_radius: u32,
    /// Whether to additionally inpaint gaps that appear specifically around
    /// leaf-tile boundaries (spec.md §9 open question: behavior preserved
    /// behind an explicit toggle rather than inferred intent).
    pub inpaint_leaf_seams: bool,
    /// Ease parameter for the central-region UV warp (spec.md §4.3); `None`
    /// disables warping.
    pub warp_ease: Option<f32>,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            composite_resolution: 4096,
            camera: Camera {
                center: seamweld_math::Vec3::ZERO,
                right: seamweld_math::Vec3::X,
                down: seamweld_math::Vec3::Y,
                meters_per_pixel: 1.0,
            },
            inpaint_radius: 2,
            inpaint_leaf_seams: true,
            warp_ease: None,
        }
    }
}

/// Builds an orthographic [`Camera`] covering `(min, max)` at
/// `composite_resolution` pixels along the long axis, letterboxing the
/// short axis (spec.md §4.3: "if the scene is wider than tall ... the
/// smaller dimension is letterboxed with masked pixels").
///
/// Looks down the `up` axis; `right`/`down` span the remaining two axes in
/// a fixed, right-handed assignment.
pub fn letterboxed_camera(
    min: seamweld_math::Vec3,
    max: seamweld_math::Vec3,
    up: seamweld_shrinkwrap::Axis,
    composite_resolution: u32,
) -> Camera {
    use seamweld_math::Vec3;
    use seamweld_shrinkwrap::Axis;

    let (right_axis, down_axis) = match up {
        Axis::X => (Axis::Y, Axis::Z),
        Axis::Y => (Axis::Z, Axis::X),
        Axis::Z => (Axis::X, Axis::Y),
    };
    let unit = |a: Axis| match a {
        Axis::X => Vec3::new(1.0, 0.0, 0.0),
        Axis::Y => Vec3::new(0.0, 1.0, 0.0),
        Axis::Z => Vec3::new(0.0, 0.0, 1.0),
    };
    let idx = |a: Axis| match a {
        Axis::X => 0,
        Axis::Y => 1,
        Axis::Z => 2,
    };
    let span_right = max[idx(right_axis)] - min[idx(right_axis)];
    let span_down = max[idx(down_axis)] - min[idx(down_axis)];
    let long_span = span_right.max(span_down).max(1e-6);
    let meters_per_pixel = long_span / composite_resolution as f32;
    let center = (min + max) * 0.5;

    Camera {
        center,
        right: unit(right_axis),
        down: unit(down_axis),
        meters_per_pixel,
    }
}
