//! Error type for coherent-index construction.

use thiserror::Error;

/// Result type alias using [`IndexError`] as the error type.
pub type Result<T> = std::result::Result<T, IndexError>;

/// Errors raised while building a coherent scene index (spec.md §7).
#[derive(Debug, Error)]
pub enum IndexError {
    /// Path B was requested but the scene mesh has no UVs to address the
    /// atlased index with.
    #[error("scene mesh has no UVs; cannot address the atlased index")]
    MissingUvs,

    /// No leaf tiles were supplied to Path A.
    #[error("no leaf tiles supplied")]
    NoLeafTiles,

    /// Shrinkwrap (Path C) failed.
    #[error("shrinkwrap failed: {0}")]
    Shrinkwrap(#[from] seamweld_shrinkwrap::ShrinkwrapError),

    /// Mesh construction/validation failed.
    #[error("mesh error: {0}")]
    Mesh(#[from] seamweld_mesh::MeshError),

    /// The composite produced no valid texels at all.
    #[error("composite has no valid texels")]
    EmptyComposite,
}
