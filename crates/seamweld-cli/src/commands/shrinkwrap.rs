//! `seamweld shrinkwrap` - wraps a proxy grid onto a synthetic reference
//! mesh and reports coverage (spec.md §4.2, component C4).
//!
//! Reference meshes are normally supplied by an external collaborator
//! (spec.md §1), so this command builds a coarse hemisphere as a stand-in
//! surface to exercise the shrinkwrap stage end to end.

use anyhow::{bail, Result};
use seamweld_math::Vec3;
use seamweld_mesh::Mesh;
use seamweld_shrinkwrap::{shrinkwrap, Axis, MissMode, ShrinkwrapConfig, WrapMode};
use tracing::info;

use crate::ShrinkwrapArgs;

/// A coarse hemisphere (radius 1, apex at `+Z`) used as a stand-in
/// reference surface.
fn hemisphere(rings: u32) -> Mesh {
    let mut positions = vec![Vec3::new(0.0, 0.0, 1.0)];
    for i in 0..rings {
        let theta = std::f32::consts::FRAC_PI_2 * (i as f32 + 1.0) / rings as f32;
        let r = theta.sin();
        let z = theta.cos();
        for j in 0..rings {
            let phi = std::f32::consts::TAU * j as f32 / rings as f32;
            positions.push(Vec3::new(r * phi.cos(), r * phi.sin(), z));
        }
    }
    let mut faces = Vec::new();
    for j in 0..rings {
        faces.push([0u32, 1 + j, 1 + (j + 1) % rings]);
    }
    for i in 0..rings - 1 {
        for j in 0..rings {
            let a = 1 + i * rings + j;
            let b = 1 + i * rings + (j + 1) % rings;
            let c = 1 + (i + 1) * rings + j;
            let d = 1 + (i + 1) * rings + (j + 1) % rings;
            faces.push([a, b, c]);
            faces.push([b, d, c]);
        }
    }
    Mesh::new(positions, faces).expect("hemisphere construction is always valid")
}

fn parse_mode(s: &str) -> Result<WrapMode> {
    Ok(match s {
        "project" => WrapMode::Project,
        "nearest-point" => WrapMode::NearestPoint,
        other => bail!("unknown mode '{other}' (expected project, nearest-point)"),
    })
}

fn parse_miss(s: &str) -> Result<MissMode> {
    Ok(match s {
        "none" => MissMode::None,
        "delaunay" => MissMode::Delaunay,
        "inpaint" => MissMode::Inpaint,
        other => bail!("unknown miss mode '{other}' (expected none, delaunay, inpaint)"),
    })
}

pub fn run(args: ShrinkwrapArgs) -> Result<()> {
    let reference = hemisphere(8);
    let config = ShrinkwrapConfig {
        grid_resolution: args.grid_resolution,
        axis: Axis::Z,
        mode: parse_mode(&args.mode)?,
        miss: parse_miss(&args.miss)?,
        jitter: args.jitter,
    };

    info!(grid_resolution = args.grid_resolution, mode = %args.mode, "shrinkwrapping");
    let wrapped = shrinkwrap(&reference, &config)?;

    println!("reference: {} vertices, {} faces (synthetic hemisphere)", reference.vertex_count(), reference.face_count());
    println!("wrapped  : {} vertices, {} faces", wrapped.vertex_count(), wrapped.face_count());
    println!("has uvs  : {}", wrapped.uvs().is_some());
    Ok(())
}
