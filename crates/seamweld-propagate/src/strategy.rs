//! Configuration surface for adjustment propagation (spec.md §4.5, §6).

/// Which strategy turns sparse per-observation Δ samples into a dense
/// correction field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PropagationStrategy {
    /// Pick [`PropagationStrategy::Barycentric`] if the coherent index came
    /// from shrinkwrap+backproject (Path C), else
    /// [`PropagationStrategy::Inpaint`] (spec.md §4.5).
    #[default]
    Auto,
    /// No propagation: corrections stay sparse and are not applied.
    None,
    /// 2-D Delaunay triangulation over sample locations, barycentric
    /// interpolation inside the hull, nearest-edge extrapolation outside.
    Barycentric,
    /// Iteratively diffuse the sparse Δ samples into neighboring pixels.
    Inpaint,
    /// Barycentric, but the triangulation and output are both restricted
    /// to pixels that are winners (already textured) in the observation.
    BarycentricWinnersOnly,
}

/// Which observation variant a correction field is added to when emitting
/// the final "Blended" image (spec.md §4.5, §9 open question 3: "the exact
/// choice... varies with the upstream stage; keep this as an explicit
/// configuration rather than auto-selecting").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppliedVariant {
    /// Apply the correction field to the pre-blur-conditioned observation.
    #[default]
    Blurred,
    /// Apply the correction field to the original, unblurred observation.
    Original,
}

/// Tunable parameters for the propagation pipeline (spec.md §6).
#[derive(Debug, Clone, Copy)]
pub struct PropagateConfig {
    /// Which scatter strategy to use, or [`PropagationStrategy::Auto`] to
    /// pick based on `index_from_shrinkwrap`.
    pub strategy: PropagationStrategy,
    /// Whether the coherent index handed to the propagator was built via
    /// Path C (shrinkwrap+backproject). Only consulted when `strategy` is
    /// `Auto`.
    pub index_from_shrinkwrap: bool,
    /// Gaussian blur radius applied to each scattered correction field
    /// after scatter, to remove interpolation artefacts. Default `7`.
    pub blur_radius: u32,
    /// If an observation receives fewer than this many Δ samples, its
    /// correction field is instead filled uniformly with the mean Δ
    /// across all its samples ("fill blend with average diff").
    pub min_samples_for_local_fill: usize,
    /// Whether the strict or legacy coherent-index sentinel interpretation
    /// applies when decoding (spec.md §6, §9).
    pub legacy_invalid_index: bool,
    /// Which observation variant the correction field is added to.
    pub applied_to: AppliedVariant,
}

impl Default for PropagateConfig {
    fn default() -> Self {
        Self {
            strategy: PropagationStrategy::Auto,
            index_from_shrinkwrap: false,
            blur_radius: 7,
            min_samples_for_local_fill: 4,
            legacy_invalid_index: false,
            applied_to: AppliedVariant::Blurred,
        }
    }
}

impl PropagateConfig {
    /// Resolves [`PropagationStrategy::Auto`] against `index_from_shrinkwrap`.
    pub fn resolved_strategy(&self) -> PropagationStrategy {
        match self.strategy {
            PropagationStrategy::Auto => {
                if self.index_from_shrinkwrap {
                    PropagationStrategy::Barycentric
                } else {
                    PropagationStrategy::Inpaint
                }
            }
            other => other,
        }
    }
}
