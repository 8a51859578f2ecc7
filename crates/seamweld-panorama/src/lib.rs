//! # seamweld-panorama
//!
//! Tile-wise application of the coherent-index, DMG, and propagation
//! machinery to a cylindrically- or spherically-tiled sky panorama whose
//! horizontal wrap must be respected (spec.md §4.6, component C9).
//!
//! ## Pipeline
//!
//! 1. [`tile::build_tile_mesh`] builds each tile's quadrilateral mesh in
//!    `Box`, `Sphere`, or `TopoSphere` mode.
//! 2. [`grid::build_and_backproject_tiles`] runs the caller's backproject
//!    strategy over every tile, in parallel, returning [`grid::SkyTile`]s
//!    in deterministic row-major order.
//! 3. [`composite::assemble_composite`] blits all tile indices into one
//!    composite, adding wrap-aware guard columns when `Cols·T` isn't a
//!    power of two and picking `WrapCylinder` when it is.
//! 4. [`driver::drive_panorama`] builds the blurred composite, runs the
//!    multigrid blend, propagates corrections per observation, and returns
//!    a blended composite ready for [`driver::extract_tile_texture`] to
//!    crop back into individual tile textures.

#![warn(missing_docs)]

pub mod composite;
pub mod driver;
pub mod error;
pub mod grid;
pub mod tile;

pub use composite::{PanoramaComposite, GUARD_COLUMNS, MAX_COMPOSITE_LONG_AXIS};
pub use driver::{drive_panorama, extract_tile_texture, ObservationSource, PanoramaConfig, PanoramaResult};
pub use error::{PanoramaError, Result};
pub use grid::{build_and_backproject_tiles, SkyTile};
pub use tile::{build_tile_mesh, tile_name, OrbitalDem, PanoramaGeometry, TileMeshMode};
