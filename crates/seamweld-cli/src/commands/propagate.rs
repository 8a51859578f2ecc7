//! `seamweld propagate` - scatters composite-level adjustments back onto
//! observations (spec.md §4.5, component C8).

use anyhow::{bail, Context, Result};
use seamweld_propagate::{propagate_all, AppliedVariant, ObservationGeometry, PropagateConfig, PropagationStrategy};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use tracing::info;

use super::{load_image, save_image};
use crate::PropagateArgs;

#[derive(Deserialize)]
struct ObservationEntry {
    width: u32,
    height: u32,
}

fn parse_strategy(s: &str) -> Result<PropagationStrategy> {
    Ok(match s {
        "auto" => PropagationStrategy::Auto,
        "none" => PropagationStrategy::None,
        "barycentric" => PropagationStrategy::Barycentric,
        "inpaint" => PropagationStrategy::Inpaint,
        "barycentric-winners-only" => PropagationStrategy::BarycentricWinnersOnly,
        other => bail!(
            "unknown strategy '{other}' (expected auto, none, barycentric, inpaint, barycentric-winners-only)"
        ),
    })
}

pub fn run(args: PropagateArgs) -> Result<()> {
    let index = load_image(&args.index)?;
    let blurred = load_image(&args.blurred)?;
    let blended = load_image(&args.blended)?;

    let text = fs::read_to_string(&args.observations)
        .with_context(|| format!("failed to read {}", args.observations.display()))?;
    let entries: HashMap<u16, ObservationEntry> = serde_yaml::from_str(&text)?;

    let geometries: HashMap<u16, ObservationGeometry> = entries
        .iter()
        .map(|(&obs, e)| (obs, ObservationGeometry { width: e.width, height: e.height, winner_mask: None }))
        .collect();

    let config = PropagateConfig {
        strategy: parse_strategy(&args.strategy)?,
        index_from_shrinkwrap: args.index_from_shrinkwrap,
        blur_radius: args.blur_radius,
        min_samples_for_local_fill: args.min_samples_for_local_fill,
        applied_to: AppliedVariant::Blurred,
        ..PropagateConfig::default()
    };

    info!(strategy = ?config.resolved_strategy(), observations = geometries.len(), "propagating");
    let corrections = propagate_all(&index, &blurred, &blended, &geometries, &config)?;

    fs::create_dir_all(&args.out_dir).with_context(|| format!("failed to create {}", args.out_dir.display()))?;
    for (obs, correction) in &corrections {
        let out_path = args.out_dir.join(format!("{obs}.png"));
        save_image(&out_path, &correction.field)?;
        println!("observation {obs}: {} samples -> {}", correction.sample_count, out_path.display());
    }
    Ok(())
}
