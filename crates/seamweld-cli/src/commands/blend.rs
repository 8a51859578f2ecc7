//! `seamweld blend` - runs the discrete multigrid solver over a composite
//! and its region index (spec.md §4.4, component C7).

use anyhow::{bail, Context, Result};
use seamweld_core::Image;
use seamweld_dmg::{solve, ColorSpace, DmgConfig, EdgeBehavior};
use serde::Deserialize;
use std::fs;
use tracing::info;

use super::{load_image, save_image};
use crate::BlendArgs;

/// Mirrors [`DmgConfig`]'s fields as a YAML-deserializable side-file; the
/// solver crate itself stays `serde`-free (spec.md §2 ambient stack: config
/// structs are plain data, the CLI is the only place that parses them).
#[derive(Deserialize, Default)]
#[serde(default)]
struct BlendFileConfig {
    lambda: Option<f32>,
    relax_steps: Option<u32>,
    max_vcycles: Option<u32>,
    residual_epsilon: Option<f32>,
    edge: Option<String>,
    lab: Option<bool>,
}

fn parse_edge(s: &str) -> Result<EdgeBehavior> {
    Ok(match s {
        "clamp" => EdgeBehavior::Clamp,
        "wrap-cylinder" => EdgeBehavior::WrapCylinder,
        "wrap-sphere" => EdgeBehavior::WrapSphere,
        "wrap-torus" => EdgeBehavior::WrapTorus,
        other => bail!("unknown edge behavior '{other}' (expected clamp, wrap-cylinder, wrap-sphere, wrap-torus)"),
    })
}

/// Reconstructs the 1-band region-id image from a PNG/JPEG's decoded `[0,
/// 1]` band 0, since the codec round-trips through 8-bit samples: exact for
/// up to 255 distinct observations, which is enough for CLI-driven runs
/// (project-scale index persistence is an external collaborator, spec.md
/// §1).
fn region_from_image(image: &Image) -> Image {
    let (w, h) = image.dimensions();
    let mut region = Image::new_empty(w, h, 1);
    for y in 0..h {
        for x in 0..w {
            if image.is_valid(x, y) {
                let id = (image.pixel(x, y)[0] * 255.0).round();
                region.set_pixel(x, y, &[id]);
                region.set_valid(x, y, true);
            }
        }
    }
    region
}

pub fn run(args: BlendArgs) -> Result<()> {
    let composite = load_image(&args.composite)?;
    let region_source = load_image(&args.region)?;
    let region = region_from_image(&region_source);

    let mut config = DmgConfig {
        lambda: args.lambda,
        relax_steps: args.relax_steps,
        max_vcycles: args.max_vcycles,
        residual_epsilon: args.residual_epsilon,
        colorspace: if args.lab { ColorSpace::RgbToLab } else { ColorSpace::None },
        edge: parse_edge(&args.edge)?,
        ..DmgConfig::default()
    };

    if let Some(path) = &args.config {
        let text = fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
        let file: BlendFileConfig = serde_yaml::from_str(&text)?;
        if let Some(v) = file.lambda {
            config.lambda = v;
        }
        if let Some(v) = file.relax_steps {
            config.relax_steps = v;
        }
        if let Some(v) = file.max_vcycles {
            config.max_vcycles = v;
        }
        if let Some(v) = file.residual_epsilon {
            config.residual_epsilon = v;
        }
        if let Some(v) = &file.edge {
            config.edge = parse_edge(v)?;
        }
        if let Some(true) = file.lab {
            config.colorspace = ColorSpace::RgbToLab;
        }
    }

    info!(lambda = config.lambda, max_vcycles = config.max_vcycles, "solving");
    let (blended, convergence) = solve(&composite, &region, None, &config, None)?;

    save_image(&args.out, &blended)?;
    println!(
        "converged={} residual={:.6} vcycles={}",
        convergence.converged, convergence.residual, convergence.vcycles
    );
    Ok(())
}
