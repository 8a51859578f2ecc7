//! # seamweld-index
//!
//! Builds the scene-wide "where did each texel come from" coherent scene
//! index (spec.md §4.3, component C5) by one of three paths:
//!
//! - [`paths::build_from_leaf_tiles`] (Path A): rasterize each already-won
//!   leaf tile into a composite under a shared scene camera.
//! - [`paths::build_from_atlased_scene_index`] (Path B): reproject an
//!   existing atlased index through the scene mesh's UVs.
//! - [`paths::build_from_shrinkwrap`] (Path C): shrinkwrap a proxy grid onto
//!   a reference mesh and hand it to an external backproject collaborator.
//!
//! All three paths converge on the same [`paths::CoherentIndex`] artifact:
//! a 3-band `(obs, row, col)` composite plus, for Path B, the retained
//! original atlas. [`bits`] defines the bit layout those three bands share
//! (spec.md §6); [`warp`] builds the optional center-dense UV remap applied
//! while flattening (spec.md §4.3, §4.5).

#![warn(missing_docs)]

pub mod bits;
pub mod compose;
pub mod config;
pub mod error;
pub mod leaf;
pub mod paths;
pub mod warp;

pub use bits::{decode, encode, IndexValue};
pub use compose::{build_coherent_texture, extract_region_band};
pub use config::{letterboxed_camera, IndexConfig};
pub use error::{IndexError, Result};
pub use leaf::LeafTile;
pub use paths::{Backproject, CoherentIndex};
