//! `seamweld info` - dimensions, band count, and valid-pixel coverage.

use anyhow::Result;
use tracing::info;

use super::load_image;
use crate::InfoArgs;

pub fn run(args: InfoArgs) -> Result<()> {
    for path in &args.input {
        let image = load_image(path)?;
        let (w, h) = image.dimensions();
        let bands = image.bands();
        let total = (w as u64) * (h as u64);
        let valid = (0..h)
            .flat_map(|y| (0..w).map(move |x| (x, y)))
            .filter(|&(x, y)| image.is_valid(x, y))
            .count() as u64;
        let coverage = if total > 0 { valid as f64 / total as f64 * 100.0 } else { 0.0 };

        println!("{}", path.display());
        println!("  dimensions : {w}x{h}");
        println!("  bands      : {bands}");
        println!("  valid      : {valid}/{total} ({coverage:.2}%)");
        info!(path = %path.display(), w, h, bands, valid, total, "inspected image");
    }
    Ok(())
}
