//! # seamweld-mesh
//!
//! Indexed triangle mesh primitive (spec.md §3 "Mesh", component C2):
//! vertex positions plus optional per-vertex normal, RGBA, and UV
//! attributes, face list, bounds, transform, and UV warp.
//!
//! No rendering, skinning, or animation — those are out of scope (spec.md
//! §1). This crate exists purely to hand [`Mesh`] to the rasterizer, the
//! shrinkwrap builder, and the panorama tile generator.

#![warn(missing_docs)]

pub mod error;
pub mod mesh;

pub use error::{MeshError, Result};
pub use mesh::{Mesh, Rgba};
