//! Error type for adjustment propagation.

use thiserror::Error;

/// Result type alias using [`PropagateError`] as the error type.
pub type Result<T> = std::result::Result<T, PropagateError>;

/// Errors raised while scattering and propagating per-observation
/// corrections (spec.md §4.5, §7).
#[derive(Debug, Error)]
pub enum PropagateError {
    /// The coherent index, blurred composite, and blended composite must
    /// share one geometry.
    #[error("dimension mismatch: index {iw}x{ih}, blurred {bw}x{bh}, blended {cw}x{ch}")]
    DimensionMismatch {
        /// Index width
        iw: u32,
        /// Index height
        ih: u32,
        /// Blurred-composite width
        bw: u32,
        /// Blurred-composite height
        bh: u32,
        /// Blended-composite width
        cw: u32,
        /// Blended-composite height
        ch: u32,
    },

    /// A correction field's geometry didn't match the observation it was
    /// meant to be applied to.
    #[error("correction field {fw}x{fh} does not match observation {ow}x{oh}")]
    ApplyDimensionMismatch {
        /// Field width
        fw: u32,
        /// Field height
        fh: u32,
        /// Observation width
        ow: u32,
        /// Observation height
        oh: u32,
    },

    /// An observation referenced by the coherent index had no registered
    /// native resolution.
    #[error("observation {obs} has no registered native resolution")]
    UnknownObservation {
        /// Observation identifier
        obs: u16,
    },

    /// Propagation surfaced the seamweld-core pipeline error type.
    #[error(transparent)]
    Core(#[from] seamweld_core::Error),

    /// The post-scatter blur stage failed.
    #[error(transparent)]
    Ops(#[from] seamweld_ops::OpsError),
}
