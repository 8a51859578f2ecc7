//! # seamweld-propagate
//!
//! Turns the sparse per-composite-texel color adjustments computed by
//! [`seamweld_dmg`] into dense per-observation correction fields, and
//! applies them to produce each observation's "Blended" variant (spec.md
//! §4.5, component C8).
//!
//! Pipeline, per observation `o`:
//!
//! 1. [`sample::collect_samples`] walks the coherent scene index and pairs
//!    every composite texel with its owning observation and source pixel,
//!    recording `Δ = blended − blurred`.
//! 2. One of three strategies scatters those sparse samples across `o`'s
//!    full native resolution: [`barycentric::scatter_barycentric`] (Delaunay
//!    + barycentric interpolation, optionally restricted to winner pixels),
//!    or [`diffuse::scatter_inpaint`] (iterative diffusion).
//! 3. [`blur::blur_correction_field`] lightly blurs the scattered field to
//!    remove interpolation artefacts.
//! 4. [`apply::apply_correction`] adds the field to whichever observation
//!    variant (`blurred` or `original`) the configuration selects.
//!
//! [`propagate_all`] drives all four steps for every observation the
//! coherent index references, in parallel across observations (spec.md §5:
//! "across tiles / observations").

#![warn(missing_docs)]

pub mod apply;
pub mod barycentric;
pub mod diffuse;
pub mod error;
pub mod sample;
pub mod strategy;

mod blur;

use std::collections::HashMap;

use rayon::prelude::*;
use seamweld_core::Image;

pub use error::{PropagateError, Result};
pub use strategy::{AppliedVariant, PropagateConfig, PropagationStrategy};

use sample::{collect_samples, mean_delta, Sample};

/// Per-observation metadata the propagator needs beyond the Δ samples
/// themselves: the observation's native resolution, and (for
/// [`PropagationStrategy::BarycentricWinnersOnly`]) a winner predicate.
pub struct ObservationGeometry<'a> {
    /// Native observation width in pixels.
    pub width: u32,
    /// Native observation height in pixels.
    pub height: u32,
    /// `true` at pixels that are currently winners (already textured) in
    /// this observation. Only consulted by `BarycentricWinnersOnly`.
    pub winner_mask: Option<&'a (dyn Fn(u32, u32) -> bool + Sync)>,
}

/// The dense correction field for one observation, plus how many Δ samples
/// fed it (diagnostic / testable-property bookkeeping, spec.md §8
/// "Propagator conservation").
pub struct Correction {
    /// The dense per-pixel additive correction.
    pub field: Image,
    /// How many sparse samples this observation received before scatter.
    pub sample_count: usize,
}

/// Computes a dense correction field for every observation referenced by
/// `index`, from the sparse Δ between `blurred` and `blended` composites.
///
/// `geometries` must have an entry for every observation identifier the
/// index references; [`PropagateError::UnknownObservation`] is returned
/// otherwise.
pub fn propagate_all(
    index: &Image,
    blurred: &Image,
    blended: &Image,
    geometries: &HashMap<u16, ObservationGeometry>,
    config: &PropagateConfig,
) -> Result<HashMap<u16, Correction>> {
    let by_obs = collect_samples(index, blurred, blended, config.legacy_invalid_index)?;
    let bands = blended.bands();
    let strategy = config.resolved_strategy();

    let entries: Vec<(u16, Vec<Sample>)> = by_obs.into_iter().collect();
    let results: Vec<Result<(u16, Correction)>> = entries
        .into_par_iter()
        .map(|(obs, samples)| {
            let geom = geometries.get(&obs).ok_or(PropagateError::UnknownObservation { obs })?;
            let sample_count = samples.len();
            let scattered = if sample_count < config.min_samples_for_local_fill {
                let mean = mean_delta(&samples, bands);
                let mut field = Image::new(geom.width, geom.height, bands);
                field.fill(&mean);
                field
            } else {
                match strategy {
                    PropagationStrategy::None => Image::new_empty(geom.width, geom.height, bands),
                    PropagationStrategy::Barycentric => {
                        barycentric::scatter_barycentric(&samples, geom.width, geom.height, bands, false, None)
                    }
                    PropagationStrategy::BarycentricWinnersOnly => barycentric::scatter_barycentric(
                        &samples,
                        geom.width,
                        geom.height,
                        bands,
                        true,
                        geom.winner_mask,
                    ),
                    PropagationStrategy::Inpaint => {
                        let radius = geom.width.max(geom.height);
                        diffuse::scatter_inpaint(&samples, geom.width, geom.height, bands, radius)
                    }
                    PropagationStrategy::Auto => unreachable!("resolved_strategy never returns Auto"),
                }
            };
            let field = blur::blur_correction_field(&scattered, config.blur_radius)?;
            Ok((obs, Correction { field, sample_count }))
        })
        .collect();

    results.into_iter().collect::<Result<Vec<_>>>().map(|v| v.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use seamweld_core::Image;

    fn index_pixel(obs: u16, row: u16, col: u16) -> [f32; 3] {
        [obs as f32, row as f32, col as f32]
    }

    #[test]
    fn propagates_a_single_observation_end_to_end() {
        let mut index = Image::new(4, 1, 3);
        for x in 0..4 {
            index.set_pixel(x, 0, &index_pixel(7, 0, x as u16));
        }
        let mut blurred = Image::new(4, 1, 1);
        let mut blended = Image::new(4, 1, 1);
        for x in 0..4 {
            blurred.set_pixel(x, 0, &[0.5]);
            blended.set_pixel(x, 0, &[0.6]);
        }

        let mut geometries = HashMap::new();
        geometries.insert(7u16, ObservationGeometry { width: 4, height: 1, winner_mask: None });

        let config = PropagateConfig { strategy: PropagationStrategy::Inpaint, blur_radius: 1, ..Default::default() };
        let corrections = propagate_all(&index, &blurred, &blended, &geometries, &config).unwrap();
        let correction = &corrections[&7];
        assert_eq!(correction.sample_count, 4);
        assert_eq!(correction.field.dimensions(), (4, 1));
    }

    #[test]
    fn unknown_observation_is_an_error() {
        let mut index = Image::new(1, 1, 3);
        index.set_pixel(0, 0, &index_pixel(99, 0, 0));
        let blurred = Image::new(1, 1, 1);
        let blended = Image::new(1, 1, 1);
        let geometries = HashMap::new();
        let config = PropagateConfig::default();
        assert!(propagate_all(&index, &blurred, &blended, &geometries, &config).is_err());
    }
}
