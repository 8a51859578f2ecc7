//! # seamweld-transfer
//!
//! The sRGB opto-electronic transfer function: linearizes encoded rover
//! imagery before the multigrid solver's Lab-space relaxation, and
//! re-encodes the solved composite back to display-referred values.
//!
//! # Terminology
//!
//! - **OETF** (Opto-Electronic Transfer Function): Linear -> Encoded
//! - **EOTF** (Electro-Optical Transfer Function): Encoded -> Linear
//!
//! # Usage
//!
//! ```rust
//! use seamweld_transfer::srgb;
//!
//! let linear = srgb::eotf(0.5);
//! let encoded = srgb::oetf(linear);
//! ```
//!
//! # Used By
//!
//! - `seamweld-dmg` - RGB/Lab colorspace conversion for the solver
//! - `seamweld-conditioner` - luminance matching of mono observations

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod srgb;

pub use srgb::{eotf as srgb_eotf, oetf as srgb_oetf};
