//! `seamweld panorama` - drives the tile-wise panorama pipeline (index,
//! condition, blend, propagate) over a synthetic backproject (spec.md
//! §4.6, component C9).
//!
//! A real run's backproject strategy (camera models, occlusion, orbital
//! imagery) is an external collaborator (spec.md §1); this command stands
//! one in with a per-tile solid observation id and a procedural texture, so
//! the rest of the pipeline can be exercised end to end from the CLI.

use anyhow::{bail, Context, Result};
use seamweld_core::{CancellationToken, Image};
use seamweld_index::Backproject;
use seamweld_mesh::Mesh;
use seamweld_panorama::{
    build_and_backproject_tiles, drive_panorama, extract_tile_texture, tile_name, ObservationSource,
    PanoramaConfig, PanoramaGeometry, TileMeshMode,
};
use std::collections::HashMap;
use std::fs;
use tracing::info;

use super::save_image;
use crate::PanoramaArgs;

/// Every texel across every tile is assigned the same observation id (2;
/// id 1 decodes as `HoldConstant` in strict mode, spec.md §6), so the
/// region boundaries the solver sees are exactly the tile boundaries
/// (spec.md §4.4 "J(p) != J(q)").
struct TileBackproject;

impl Backproject for TileBackproject {
    fn backproject(&self, _proxy: &Mesh, width: u32, height: u32, _cancel: Option<&CancellationToken>) -> Image {
        let mut img = Image::new(width, height, 3);
        for y in 0..height {
            for x in 0..width {
                img.set_pixel(x, y, &[2.0, y as f32, x as f32]);
            }
        }
        img
    }
}

fn parse_mode(s: &str) -> Result<TileMeshMode> {
    Ok(match s {
        "box" => TileMeshMode::Box,
        "sphere" => TileMeshMode::Sphere,
        "topo-sphere" => TileMeshMode::TopoSphere,
        other => bail!("unknown mode '{other}' (expected box, sphere, topo-sphere)"),
    })
}

pub fn run(args: PanoramaArgs) -> Result<()> {
    let geometry = PanoramaGeometry {
        rows: args.rows,
        cols: args.cols,
        mode: parse_mode(&args.mode)?,
        ..PanoramaGeometry::default()
    };

    let backproject = TileBackproject;
    info!(rows = args.rows, cols = args.cols, mode = %args.mode, "building panorama tiles");
    let tiles = build_and_backproject_tiles(&geometry, args.tile_resolution, &backproject, None, None)?;

    // Every tile's backproject reports observation id 2 (spec.md §6:
    // observation id 1 decodes as HoldConstant in strict mode, so a single
    // synthetic observation must avoid it); give it a native resolution
    // large enough to cover the whole assembled composite.
    let native_w = geometry.cols * args.tile_resolution;
    let native_h = geometry.rows * args.tile_resolution;
    let blurred_pixel =
        move |row: u32, col: u32| Some(vec![0.5f32, row as f32 / native_h.max(1) as f32, col as f32 / native_w.max(1) as f32]);
    let original_pixel = blurred_pixel;

    let mut observations = HashMap::new();
    observations.insert(
        2u16,
        ObservationSource { width: native_w, height: native_h, blurred_pixel: &blurred_pixel, original_pixel: &original_pixel },
    );

    let config = PanoramaConfig { tile_resolution: args.tile_resolution, bands: 3, ..PanoramaConfig::default() };
    let result = drive_panorama(&tiles, args.rows, args.cols, &observations, &config, None)?;

    println!(
        "converged={} residual={:.6} vcycles={}",
        result.convergence.converged, result.convergence.residual, result.convergence.vcycles
    );

    fs::create_dir_all(&args.out_dir).with_context(|| format!("failed to create {}", args.out_dir.display()))?;
    save_image(&args.out_dir.join("composite.png"), &result.blended_composite)?;

    for row in 0..args.rows {
        for col in 0..args.cols {
            let texture = extract_tile_texture(&result.blended_composite, row, col, args.tile_resolution);
            let name = tile_name(row, col, args.cols);
            save_image(&args.out_dir.join(format!("tile_{name:04}.png")), &texture)?;
        }
    }
    println!("wrote {} tile textures to {}", args.rows * args.cols, args.out_dir.display());
    Ok(())
}
