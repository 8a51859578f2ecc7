//! # seamweld-core
//!
//! Shared foundation types for the seamweld texture-blending pipeline:
//!
//! - [`Image`] - runtime band-count float buffer with a per-pixel validity
//!   mask, the common currency passed between the rasterizer, the coherent
//!   scene index builder, the multigrid blender, and the propagator.
//! - [`Rect`], [`Roi`] - region of interest types.
//! - [`Error`], [`Result`] - the error type shared by every seamweld crate.
//! - [`WorkerPool`], [`CancellationToken`] - the shared fan-out pool and
//!   cooperative cancellation flag used by every parallel stage.
//! - [`ImageCache`] - LRU cache of decoded observation images.
//!
//! ## Crate structure
//!
//! This crate has no internal dependencies; every other seamweld crate
//! depends on it.
//!
//! ```text
//! seamweld-core (this crate)
//!    ^
//!    +-- seamweld-math
//!    +-- seamweld-mesh
//!    +-- seamweld-raster
//!    +-- seamweld-shrinkwrap
//!    +-- seamweld-index
//!    +-- seamweld-conditioner
//!    +-- seamweld-dmg
//!    +-- seamweld-propagate
//!    +-- seamweld-panorama
//!    +-- seamweld-cli
//! ```

#![warn(missing_docs)]

pub mod cache;
pub mod error;
pub mod image;
pub mod rect;
pub mod worker;

pub use cache::ImageCache;
pub use error::{Error, Result};
pub use image::{Connectivity, DecimateMode, Image, ImageView, ImageViewMut};
pub use rect::{Rect, Roi};
pub use worker::{CancellationToken, WorkerPool};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::cache::ImageCache;
    pub use crate::error::{Error, Result};
    pub use crate::image::{Connectivity, DecimateMode, Image, ImageView, ImageViewMut};
    pub use crate::rect::{Rect, Roi};
    pub use crate::worker::{CancellationToken, WorkerPool};
}
