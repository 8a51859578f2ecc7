//! CLI command implementations

pub mod blend;
pub mod condition;
pub mod info;
pub mod panorama;
pub mod propagate;
pub mod shrinkwrap;

use anyhow::{Context, Result};
use seamweld_core::Image;
use std::path::Path;

/// Loads an image via the shared PNG/JPEG codec (spec.md §1: lossless raw
/// formats and project persistence are external collaborators; this CLI's
/// file I/O is deliberately limited to the same codec `seamweld-core`
/// exposes to every other caller).
pub fn load_image(path: &Path) -> Result<Image> {
    Image::read(path).with_context(|| format!("failed to load {}", path.display()))
}

/// Saves an image via the shared PNG/JPEG codec.
pub fn save_image(path: &Path, image: &Image) -> Result<()> {
    image.write(path).with_context(|| format!("failed to write {}", path.display()))
}
