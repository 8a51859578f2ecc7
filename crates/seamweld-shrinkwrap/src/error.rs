//! Error type for shrinkwrap grid construction and wrapping.

use thiserror::Error;

/// Result type alias using [`ShrinkwrapError`] as the error type.
pub type Result<T> = std::result::Result<T, ShrinkwrapError>;

/// Errors raised while building a shrinkwrapped proxy mesh.
#[derive(Debug, Error)]
pub enum ShrinkwrapError {
    /// The reference mesh has no faces to project or search against.
    #[error("reference mesh has no faces")]
    EmptyReference,

    /// The grid resolution is too small to form any quads.
    #[error("grid resolution {0} must be >= 2")]
    ResolutionTooSmall(u32),

    /// Every grid vertex missed the reference mesh and `miss = None`
    /// dropped all of them, leaving no faces.
    #[error("shrinkwrap produced no faces: all {missed} of {total} grid vertices missed the reference mesh")]
    AllMissed {
        /// Vertices that missed
        missed: usize,
        /// Total grid vertices attempted
        total: usize,
    },
}
