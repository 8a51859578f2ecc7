//! # seamweld-raster
//!
//! Top-down orthographic rasterization of a textured mesh into a
//! caller-supplied multi-band [`seamweld_core::Image`] (spec.md §4.1,
//! component C3). Used by the coherent-index builder to flatten leaf tiles
//! (Path A) and atlased scene meshes (Path B) into the scene-wide composite,
//! and by the panorama driver to blit per-tile backproject results.

#![warn(missing_docs)]

pub mod attribute;
pub mod camera;
pub mod raster;

pub use attribute::{AttributeSource, UvImageSource};
pub use camera::Camera;
pub use raster::{rasterize, rasterize_parallel, WarpFn};
