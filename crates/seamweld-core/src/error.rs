//! Error types shared across the seamweld crates.
//!
//! Every crate in the workspace that can fail at runtime (as opposed to the
//! `anyhow`-only `seamweld-cli` binary boundary) returns this `Result`. The
//! variants cover the failure modes that recur across the pipeline: bad
//! image geometry, malformed meshes, missing samples, and solver
//! non-convergence.

use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur anywhere in the seamweld pipeline.
#[derive(Debug, Error)]
pub enum Error {
    /// Pixel coordinates are outside image bounds.
    #[error("pixel ({x}, {y}) out of bounds for image {width}x{height}")]
    OutOfBounds {
        /// X coordinate that was out of bounds
        x: u32,
        /// Y coordinate that was out of bounds
        y: u32,
        /// Image width
        width: u32,
        /// Image height
        height: u32,
    },

    /// Region of interest extends beyond image bounds.
    #[error("region ({rx}, {ry}, {rw}x{rh}) exceeds image bounds {width}x{height}")]
    InvalidRegion {
        /// Region X origin
        rx: u32,
        /// Region Y origin
        ry: u32,
        /// Region width
        rw: u32,
        /// Region height
        rh: u32,
        /// Image width
        width: u32,
        /// Image height
        height: u32,
    },

    /// Image dimensions don't match for an operation that requires equal size.
    #[error("dimension mismatch: {a_width}x{a_height} vs {b_width}x{b_height}")]
    DimensionMismatch {
        /// First image width
        a_width: u32,
        /// First image height
        a_height: u32,
        /// Second image width
        b_width: u32,
        /// Second image height
        b_height: u32,
    },

    /// Band count mismatch between source and destination.
    #[error("band mismatch: expected {expected}, got {got}")]
    BandMismatch {
        /// Expected band count
        expected: usize,
        /// Actual band count
        got: usize,
    },

    /// Invalid image dimensions (zero area, or overflow in buffer size).
    #[error("invalid dimensions: {width}x{height} ({reason})")]
    InvalidDimensions {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
        /// Reason why dimensions are invalid
        reason: String,
    },

    /// A mesh failed validation (dangling face index, empty vertex buffer,
    /// inconsistent per-vertex attribute presence).
    #[error("invalid mesh: {0}")]
    InvalidMesh(String),

    /// A coherent scene index or correction field had no valid samples where
    /// the caller required at least one.
    #[error("no valid samples: {0}")]
    NoValidSamples(String),

    /// The multigrid solver failed to reach the requested tolerance within
    /// the configured iteration budget.
    #[error("solver did not converge after {iterations} iterations (residual {residual:e})")]
    DidNotConverge {
        /// Iterations actually run
        iterations: u32,
        /// Residual at the last iteration
        residual: f32,
    },

    /// Image codec error (decode/encode of PNG/JPEG via the `image` crate).
    #[error("image codec error: {0}")]
    Codec(#[from] image::ImageError),

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error with a custom message.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Creates an [`Error::OutOfBounds`] error.
    #[inline]
    pub fn out_of_bounds(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self::OutOfBounds { x, y, width, height }
    }

    /// Creates an [`Error::InvalidRegion`] error.
    #[inline]
    pub fn invalid_region(rx: u32, ry: u32, rw: u32, rh: u32, width: u32, height: u32) -> Self {
        Self::InvalidRegion { rx, ry, rw, rh, width, height }
    }

    /// Creates an [`Error::DimensionMismatch`] error.
    #[inline]
    pub fn dimension_mismatch(a: (u32, u32), b: (u32, u32)) -> Self {
        Self::DimensionMismatch {
            a_width: a.0,
            a_height: a.1,
            b_width: b.0,
            b_height: b.1,
        }
    }

    /// Creates an [`Error::BandMismatch`] error.
    #[inline]
    pub fn band_mismatch(expected: usize, got: usize) -> Self {
        Self::BandMismatch { expected, got }
    }

    /// Creates an [`Error::InvalidDimensions`] error.
    #[inline]
    pub fn invalid_dimensions(width: u32, height: u32, reason: impl Into<String>) -> Self {
        Self::InvalidDimensions { width, height, reason: reason.into() }
    }

    /// Creates an [`Error::InvalidMesh`] error.
    #[inline]
    pub fn invalid_mesh(msg: impl Into<String>) -> Self {
        Self::InvalidMesh(msg.into())
    }

    /// Creates an [`Error::NoValidSamples`] error.
    #[inline]
    pub fn no_valid_samples(msg: impl Into<String>) -> Self {
        Self::NoValidSamples(msg.into())
    }

    /// Creates an [`Error::Other`] error.
    #[inline]
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    /// Returns `true` if this is a bounds-related error.
    #[inline]
    pub fn is_bounds_error(&self) -> bool {
        matches!(self, Self::OutOfBounds { .. } | Self::InvalidRegion { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_bounds() {
        let err = Error::out_of_bounds(100, 50, 80, 60);
        let msg = err.to_string();
        assert!(msg.contains("100"));
        assert!(err.is_bounds_error());
    }

    #[test]
    fn test_dimension_mismatch() {
        let err = Error::dimension_mismatch((100, 100), (200, 200));
        assert!(err.to_string().contains("100x100"));
        assert!(err.to_string().contains("200x200"));
    }

    #[test]
    fn test_does_not_converge_message() {
        let err = Error::DidNotConverge { iterations: 40, residual: 1.2e-3 };
        assert!(err.to_string().contains("40"));
    }
}
