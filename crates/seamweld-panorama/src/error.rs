//! Error type for the panorama driver.

use thiserror::Error;

/// Result type alias using [`PanoramaError`] as the error type.
pub type Result<T> = std::result::Result<T, PanoramaError>;

/// Errors raised while building, blending, or re-emitting a sky panorama
/// (spec.md §4.6, §7).
#[derive(Debug, Error)]
pub enum PanoramaError {
    /// `Box` mode requires a column count divisible by 4 (one quarter per
    /// wall), per spec.md §4.6.
    #[error("box panorama requires cols divisible by 4, got {cols}")]
    ColsNotDivisibleByFour {
        /// The offending column count.
        cols: u32,
    },

    /// The grid had zero rows or columns.
    #[error("panorama grid must have at least one row and column, got {rows}x{cols}")]
    EmptyGrid {
        /// Row count.
        rows: u32,
        /// Column count.
        cols: u32,
    },

    /// A tile's backproject result did not match the configured tile
    /// resolution.
    #[error("tile ({row}, {col}) backproject result is {got_w}x{got_h}, expected {expected}x{expected}")]
    TileDimensionMismatch {
        /// Tile row.
        row: u32,
        /// Tile column.
        col: u32,
        /// Actual width.
        got_w: u32,
        /// Actual height.
        got_h: u32,
        /// Expected tile resolution `T`.
        expected: u32,
    },

    /// Surfaced from `seamweld-index`.
    #[error(transparent)]
    Index(#[from] seamweld_index::IndexError),

    /// Surfaced from `seamweld-dmg`.
    #[error(transparent)]
    Dmg(#[from] seamweld_dmg::DmgError),

    /// Surfaced from `seamweld-propagate`.
    #[error(transparent)]
    Propagate(#[from] seamweld_propagate::PropagateError),

    /// Surfaced from `seamweld-core`.
    #[error(transparent)]
    Core(#[from] seamweld_core::Error),

    /// Surfaced from `seamweld-mesh`.
    #[error(transparent)]
    Mesh(#[from] seamweld_mesh::MeshError),
}
