//! Error type for mesh construction and validation.

use thiserror::Error;

/// Result type alias using [`MeshError`] as the error type.
pub type Result<T> = std::result::Result<T, MeshError>;

/// Errors raised while building or validating a [`crate::Mesh`].
#[derive(Debug, Error)]
pub enum MeshError {
    /// A face referenced a vertex index beyond the vertex buffer.
    #[error("face {face} references out-of-range vertex index {index} (have {vertex_count} vertices)")]
    DanglingFaceIndex {
        /// Index of the offending face
        face: usize,
        /// The out-of-range vertex index
        index: u32,
        /// Total vertex count
        vertex_count: usize,
    },

    /// A per-vertex attribute array's length didn't match the vertex count.
    #[error("attribute '{attribute}' has {got} entries, expected {expected}")]
    AttributeLengthMismatch {
        /// Name of the attribute (normal, uv, color)
        attribute: &'static str,
        /// Length found
        got: usize,
        /// Expected length (vertex count)
        expected: usize,
    },

    /// The mesh has no faces.
    #[error("mesh has no faces")]
    EmptyGeometry,

    /// An operation required UVs but the mesh doesn't carry any.
    #[error("mesh has no UVs")]
    MissingUvs,
}
