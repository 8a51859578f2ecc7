//! # seamweld-conditioner
//!
//! Luminance pre-adjustment and optional chroma colorization applied to
//! observation images before they feed the coherent-index builder and DMG
//! (spec.md §4.3, component C6):
//!
//! - [`luminance::median_luminance`] / [`luminance::luminance_gains`]:
//!   nudge each observation's mean luminance toward the batch median by a
//!   configurable `[0, 1]` strength.
//! - [`hue::median_hue`] / [`hue::colorize`]: paint mono observations with
//!   the batch's median hue, using each pixel's own brightness as value.

#![warn(missing_docs)]

pub mod error;
pub mod hue;
pub mod luminance;

pub use error::{ConditionerError, Result};
