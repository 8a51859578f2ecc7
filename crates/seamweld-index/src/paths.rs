//! The three coherent-index construction paths (spec.md §4.3, component
//! C5): from existing leaf tiles, by reprojecting an existing atlased scene
//! index, or by shrinkwrap + backproject.

use seamweld_core::{CancellationToken, Image};
use seamweld_mesh::Mesh;
use seamweld_raster::{rasterize_parallel, Camera, UvImageSource, WarpFn};
use seamweld_shrinkwrap::{shrinkwrap, ShrinkwrapConfig};

use crate::config::IndexConfig;
use crate::error::{IndexError, Result};
use crate::leaf::{close_tile_edge_cracks, mask_losing_pixels, trim_to_index_bands, LeafTile};

const RASTER_BAND_HEIGHT: u32 = 64;

/// A function that assigns each texel of a UV-gridded proxy mesh a winning
/// observation and source pixel, producing a composite coherent index at
/// the given pixel dimensions. The concrete backproject strategy (camera
/// models, glancing-angle rejection, occlusion) lives outside this crate's
/// scope (spec.md §1: "external collaborators").
pub trait Backproject {
    /// Runs backprojection over `proxy`'s texel grid, returning a composite
    /// index image at `(width, height)`.
    fn backproject(&self, proxy: &Mesh, width: u32, height: u32, cancel: Option<&CancellationToken>) -> Image;
}

impl<F> Backproject for F
where
    F: Fn(&Mesh, u32, u32, Option<&CancellationToken>) -> Image,
{
    fn backproject(&self, proxy: &Mesh, width: u32, height: u32, cancel: Option<&CancellationToken>) -> Image {
        self(proxy, width, height, cancel)
    }
}

/// The result of building a coherent scene index: the composite index
/// itself, plus (Path B only) the original atlased index, retained so the
/// caller can later emit a final re-atlased scene texture (spec.md §4.3).
pub struct CoherentIndex {
    /// The scene-wide, spatially coherent composite index.
    pub composite: Image,
    /// Path B only: the original atlased index, kept for re-atlasing the
    /// blended result back onto the scene mesh's original UVs.
    pub retained_atlas: Option<Image>,
}

/// Path A: rasterize each leaf tile's (loser-masked) index into the
/// scene-wide composite under `config.camera`, then close small cracks.
///
/// # Errors
///
/// Returns [`IndexError::NoLeafTiles`] if `leaves` is empty, or
/// [`IndexError::EmptyComposite`] if no leaf contributed any valid texel.
pub fn build_from_leaf_tiles(
    leaves: &[LeafTile],
    config: &IndexConfig,
    loser_threshold: f32,
    warp: Option<WarpFn>,
    cancel: Option<&CancellationToken>,
) -> Result<CoherentIndex> {
    if leaves.is_empty() {
        return Err(IndexError::NoLeafTiles);
    }
    let resolution = config.composite_resolution;
    let mut composite = Image::new_empty(resolution, resolution, 3);

    for leaf in leaves {
        if cancel.map(|c| c.is_cancelled()).unwrap_or(false) {
            break;
        }
        let uvs = leaf.mesh.uvs().ok_or(IndexError::MissingUvs)?;
        let mut masked = leaf.index.clone();
        mask_losing_pixels(&mut masked, loser_threshold);
        let trimmed = trim_to_index_bands(&masked);
        let attrs = UvImageSource::new(&trimmed, uvs, true);
        let mut leaf_composite = Image::new_empty(resolution, resolution, 3);
        rasterize_parallel(
            &leaf.mesh,
            &config.camera,
            &mut leaf_composite,
            &attrs,
            warp,
            RASTER_BAND_HEIGHT,
            cancel,
        );
        round_index_bands(&mut leaf_composite);
        composite.blit(&leaf_composite, 0, 0);
    }

    if config.inpaint_leaf_seams {
        close_tile_edge_cracks(&mut composite, config.inpaint_radius);
    }

    if !has_any_valid(&composite) {
        return Err(IndexError::EmptyComposite);
    }
    Ok(CoherentIndex { composite, retained_atlas: None })
}

/// Path B: rasterize the scene mesh (whose UVs address an existing atlased
/// index) top-down into a fresh composite, reading the atlased index
/// through the mesh's UVs. The original atlas is retained for later
/// re-atlasing of the blended result.
///
/// # Errors
///
/// Returns [`IndexError::MissingUvs`] if `scene_mesh` carries no UVs, or
/// [`IndexError::EmptyComposite`] if rasterization produced no valid texel.
pub fn build_from_atlased_scene_index(
    scene_mesh: &Mesh,
    atlased_index: &Image,
    config: &IndexConfig,
    warp: Option<WarpFn>,
    cancel: Option<&CancellationToken>,
) -> Result<CoherentIndex> {
    let uvs = scene_mesh.uvs().ok_or(IndexError::MissingUvs)?;
    let resolution = config.composite_resolution;
    let attrs = UvImageSource::new(atlased_index, uvs, true);
    let mut composite = Image::new_empty(resolution, resolution, atlased_index.bands());
    rasterize_parallel(scene_mesh, &config.camera, &mut composite, &attrs, warp, RASTER_BAND_HEIGHT, cancel);
    round_index_bands(&mut composite);

    if config.inpaint_radius > 0 {
        close_tile_edge_cracks(&mut composite, config.inpaint_radius);
    }

    if !has_any_valid(&composite) {
        return Err(IndexError::EmptyComposite);
    }
    Ok(CoherentIndex { composite, retained_atlas: Some(atlased_index.clone()) })
}

/// Path C: shrinkwrap a proxy grid onto `reference`, then hand it to the
/// external `backproject` collaborator to assign each proxy texel a
/// winning observation.
///
/// # Errors
///
/// Propagates [`IndexError::Shrinkwrap`] if the shrinkwrap stage fails, or
/// returns [`IndexError::EmptyComposite`] if backprojection produced no
/// valid texel.
pub fn build_from_shrinkwrap(
    reference: &Mesh,
    shrinkwrap_config: &ShrinkwrapConfig,
    backproject: &dyn Backproject,
    composite_resolution: u32,
    cancel: Option<&CancellationToken>,
) -> Result<CoherentIndex> {
    let proxy = shrinkwrap(reference, shrinkwrap_config)?;
    let composite = backproject.backproject(&proxy, composite_resolution, composite_resolution, cancel);
    if !has_any_valid(&composite) {
        return Err(IndexError::EmptyComposite);
    }
    Ok(CoherentIndex { composite, retained_atlas: None })
}

/// Index bands are categorical (observation id, source row, source col);
/// rasterization barycentrically interpolates per-vertex texture samples,
/// so the result is rounded back to the nearest integer-valued float after
/// scan conversion (mirrors [`crate::bits::decode`]'s own rounding).
fn round_index_bands(image: &mut Image) {
    image.apply_in_place(|px| {
        for v in px.iter_mut() {
            *v = v.round();
        }
    });
}

fn has_any_valid(image: &Image) -> bool {
    let (w, h) = image.dimensions();
    (0..h).any(|y| (0..w).any(|x| image.is_valid(x, y)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use seamweld_math::{Vec2, Vec3};
    use seamweld_raster::Camera;
    use seamweld_shrinkwrap::{Axis, MissMode, WrapMode};

    fn unit_camera(resolution: u32) -> Camera {
        Camera {
            center: Vec3::new(resolution as f32 / 2.0, resolution as f32 / 2.0, 0.0),
            right: Vec3::new(1.0, 0.0, 0.0),
            down: Vec3::new(0.0, 1.0, 0.0),
            meters_per_pixel: 1.0,
        }
    }

    fn quad_mesh(size: f32) -> Mesh {
        Mesh::new(
            vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(size, 0.0, 0.0),
                Vec3::new(0.0, size, 0.0),
                Vec3::new(size, size, 0.0),
            ],
            vec![[0, 1, 2], [1, 3, 2]],
        )
        .unwrap()
        .with_uvs(vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(0.0, 1.0),
            Vec2::new(1.0, 1.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_path_a_no_leaves_errors() {
        let config = IndexConfig { composite_resolution: 8, camera: unit_camera(8), ..Default::default() };
        let err = build_from_leaf_tiles(&[], &config, 0.5, None, None).unwrap_err();
        assert!(matches!(err, IndexError::NoLeafTiles));
    }

    #[test]
    fn test_path_a_single_leaf_covers_composite() {
        let mut index = Image::new(2, 2, 4);
        index.fill(&[7.0, 0.0, 0.0, 1.0]);
        let leaf = LeafTile { mesh: quad_mesh(8.0), index };
        let config = IndexConfig {
            composite_resolution: 8,
            camera: unit_camera(8),
            inpaint_radius: 0,
            ..Default::default()
        };
        let result = build_from_leaf_tiles(&[leaf], &config, 0.5, None, None).unwrap();
        assert!(result.composite.is_valid(4, 4));
        assert_eq!(result.composite.pixel(4, 4)[0], 7.0);
    }

    #[test]
    fn test_path_b_retains_atlas() {
        let mut atlas = Image::new(2, 2, 3);
        atlas.fill(&[3.0, 1.0, 1.0]);
        let mesh = quad_mesh(8.0);
        let config = IndexConfig {
            composite_resolution: 8,
            camera: unit_camera(8),
            inpaint_radius: 0,
            ..Default::default()
        };
        let result = build_from_atlased_scene_index(&mesh, &atlas, &config, None, None).unwrap();
        assert!(result.retained_atlas.is_some());
        assert!(result.composite.is_valid(4, 4));
    }

    #[test]
    fn test_path_b_missing_uvs_errors() {
        let mesh = Mesh::new(
            vec![Vec3::new(0.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 0.0)],
            vec![[0, 1, 2]],
        )
        .unwrap();
        let atlas = Image::new(2, 2, 3);
        let config = IndexConfig { composite_resolution: 8, camera: unit_camera(8), ..Default::default() };
        let err = build_from_atlased_scene_index(&mesh, &atlas, &config, None, None).unwrap_err();
        assert!(matches!(err, IndexError::MissingUvs));
    }

    #[test]
    fn test_path_c_runs_shrinkwrap_then_backproject() {
        let reference = Mesh::new(
            vec![
                Vec3::new(-5.0, -5.0, 0.0),
                Vec3::new(5.0, -5.0, 0.0),
                Vec3::new(5.0, 5.0, 0.0),
                Vec3::new(-5.0, 5.0, 0.0),
            ],
            vec![[0, 1, 2], [0, 2, 3]],
        )
        .unwrap();
        let sw_config = ShrinkwrapConfig {
            grid_resolution: 4,
            axis: Axis::Z,
            mode: WrapMode::NearestPoint,
            miss: MissMode::None,
            jitter: 0.0,
        };
        let backproject = |_proxy: &Mesh, w: u32, h: u32, _c: Option<&CancellationToken>| {
            let mut img = Image::new(w, h, 3);
            img.fill(&[9.0, 0.0, 0.0]);
            img
        };
        let result = build_from_shrinkwrap(&reference, &sw_config, &backproject, 8, None).unwrap();
        assert!(result.composite.is_valid(0, 0));
        assert_eq!(result.composite.pixel(0, 0)[0], 9.0);
    }
}
