//! `seamweld condition` - luminance pre-adjustment and mono colorization
//! (spec.md §4.3 C6).

use anyhow::{Context, Result};
use std::fs;
use tracing::info;

use super::{load_image, save_image};
use crate::ConditionArgs;

pub fn run(args: ConditionArgs) -> Result<()> {
    fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("failed to create {}", args.out_dir.display()))?;

    let images: Vec<_> = args.input.iter().map(|p| load_image(p)).collect::<Result<_>>()?;

    let target = seamweld_conditioner::luminance::median_luminance(&images)?;
    let gains = seamweld_conditioner::luminance::luminance_gains(&images, target, args.strength);
    info!(target, strength = args.strength, "computed luminance gains");

    let hue = if args.colorize_saturation.is_some() {
        seamweld_conditioner::hue::median_hue(&images).ok()
    } else {
        None
    };

    for ((path, mut image), gain) in args.input.iter().zip(images.into_iter()).zip(gains.into_iter()) {
        seamweld_conditioner::luminance::apply_gain(&mut image, gain);

        let image = match (image.bands(), args.colorize_saturation, hue) {
            (1, Some(saturation), Some(hue)) => seamweld_conditioner::hue::colorize(&image, hue, saturation),
            _ => image,
        };

        let file_name = path.file_name().context("input path has no file name")?;
        let out_path = args.out_dir.join(file_name);
        save_image(&out_path, &image)?;
        println!("{} -> {} (gain {gain:.4})", path.display(), out_path.display());
    }
    Ok(())
}
