//! Error type for the multigrid blender.

use thiserror::Error;

/// Result type alias using [`DmgError`] as the error type.
pub type Result<T> = std::result::Result<T, DmgError>;

/// Errors raised while running the DMG solver (spec.md §7).
#[derive(Debug, Error)]
pub enum DmgError {
    /// The composite image and the region index have different dimensions.
    #[error("composite is {cw}x{ch} but region index is {rw}x{rh}")]
    DimensionMismatch {
        /// Composite width
        cw: u32,
        /// Composite height
        ch: u32,
        /// Region index width
        rw: u32,
        /// Region index height
        rh: u32,
    },

    /// The flags image's band count is neither `1` nor the composite's.
    #[error("flags image has {got} bands; expected 1 or {expected}")]
    FlagsBandMismatch {
        /// Bands found
        got: usize,
        /// Composite band count
        expected: usize,
    },

    /// The region index's band count is neither `1` nor the composite's.
    #[error("region index has {got} bands; expected 1 or {expected}")]
    RegionBandMismatch {
        /// Bands found
        got: usize,
        /// Composite band count
        expected: usize,
    },

    /// An empty (zero-area) image was given to the solver.
    #[error("empty image")]
    EmptyImage,
}
