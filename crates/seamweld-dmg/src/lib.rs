//! # seamweld-dmg
//!
//! The discrete multigrid ("DMG") gradient-domain blender: the mathematical
//! heart of seamweld. Given a coherent composite image, a per-texel region
//! index naming which source observation contributed each texel, and
//! optional per-pixel flags, [`solve`] produces an output image whose
//! cross-region seams are smoothed away while within-region detail is
//! preserved, by minimizing a fidelity-plus-gradient-matching objective with
//! a V-cycle geometric multigrid solver.
//!
//! ## Modules
//!
//! - [`solver`] - [`solve`], [`DmgConfig`], [`ConvergenceInfo`]: the public
//!   entry point and its tuning knobs.
//! - [`colorspace`] - optional RGB/Lab relaxation space.
//! - [`edge`] - domain edge behavior (`Clamp`, `WrapCylinder`, `WrapSphere`,
//!   `WrapTorus`) consulted by the stencil.
//! - [`flags`] - the `NONE`/`HOLD_CONSTANT`/`GRADIENT_ONLY`/`NO_DATA` bits.
//! - [`pyramid`] - the power-of-two restriction/prolongation pyramid.

#![warn(missing_docs)]

pub mod colorspace;
pub mod edge;
pub mod error;
pub mod flags;
pub mod pyramid;
pub mod solver;

pub use colorspace::ColorSpace;
pub use edge::EdgeBehavior;
pub use error::{DmgError, Result};
pub use solver::{solve, ConvergenceInfo, DmgConfig};
