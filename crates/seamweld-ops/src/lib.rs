//! # seamweld-ops
//!
//! Parallel separable-pass image filters shared by the multigrid blender,
//! the luminance/chroma conditioner, and the adjustment propagator: blur,
//! resample, and dense-kernel convolution over flat `f32` pixel buffers.
//!
//! # Modules
//!
//! - [`resize`] - serial resampling filters and dimension-fitting helpers
//! - [`filter`] - convolution kernels (box, Gaussian, sharpen)
//! - [`parallel`] - Rayon-parallel blur, resize, and convolve
//!
//! # Example
//!
//! ```rust
//! use seamweld_ops::parallel;
//!
//! let src = vec![0.5f32; 256 * 256 * 3];
//! let blurred = parallel::box_blur(&src, 256, 256, 3, 2).unwrap();
//! assert_eq!(blurred.len(), src.len());
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
pub mod filter;
pub mod resize;

pub mod parallel;

pub use error::{OpsError, OpsResult};
pub use resize::Filter;
