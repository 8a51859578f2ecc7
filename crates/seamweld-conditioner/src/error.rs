//! Error type for the luminance/chroma conditioner.

use thiserror::Error;

/// Result type alias using [`ConditionerError`] as the error type.
pub type Result<T> = std::result::Result<T, ConditionerError>;

/// Errors raised while conditioning a batch of observation images.
#[derive(Debug, Error)]
pub enum ConditionerError {
    /// No images were supplied to a batch operation that requires at least
    /// one.
    #[error("no images supplied")]
    EmptyBatch,

    /// An image had no valid pixels, so no luminance/hue statistic could be
    /// computed for it.
    #[error("image has no valid pixels")]
    NoValidPixels,
}
