//! # seamweld-shrinkwrap
//!
//! Builds a coarse N×N grid proxy mesh and wraps it onto a dense reference
//! mesh by axial projection or nearest-point search, with configurable miss
//! handling (spec.md §4.2, component C4). Feeds Path C of the coherent-index
//! builder.

#![warn(missing_docs)]

pub mod error;
pub mod raycast;
pub mod shrinkwrap;

pub use error::{Result, ShrinkwrapError};
pub use shrinkwrap::{inpaint_heights, shrinkwrap, Axis, MissMode, ShrinkwrapConfig, WrapMode};
