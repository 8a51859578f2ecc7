//! Barycentric scatter strategy (spec.md §4.5): Delaunay-triangulate the
//! sample locations in an observation, then interpolate Δ across every
//! pixel inside the hull and extrapolate outside it.

use delaunator::{triangulate, Point};
use seamweld_core::Image;
use seamweld_math::barycentric::{barycentric, inside_triangle};
use seamweld_math::Vec2;

use crate::sample::{mean_delta, Sample};

/// Builds a dense `width`×`height` correction field from `samples` by
/// barycentric interpolation over their 2-D Delaunay triangulation.
///
/// When `winners_only` is set, only pixels where `winner_mask` reports a
/// winner receive a value (all other pixels stay masked) — this implements
/// [`crate::PropagationStrategy::BarycentricWinnersOnly`].
pub fn scatter_barycentric(
    samples: &[Sample],
    width: u32,
    height: u32,
    bands: usize,
    winners_only: bool,
    winner_mask: Option<&dyn Fn(u32, u32) -> bool>,
) -> Image {
    let mut field = Image::new_empty(width, height, bands);
    if samples.is_empty() {
        return field;
    }
    if samples.len() < 3 {
        return fill_uniform(width, height, bands, &mean_delta(samples, bands));
    }

    let points: Vec<Point> = samples.iter().map(|s| Point { x: s.col as f64, y: s.row as f64 }).collect();
    let triangulation = triangulate(&points);
    if triangulation.triangles.is_empty() {
        return fill_uniform(width, height, bands, &mean_delta(samples, bands));
    }

    let mut covered = vec![false; (width as usize) * (height as usize)];

    for tri in triangulation.triangles.chunks_exact(3) {
        let (ia, ib, ic) = (tri[0], tri[1], tri[2]);
        let a = Vec2::new(samples[ia].col as f32, samples[ia].row as f32);
        let b = Vec2::new(samples[ib].col as f32, samples[ib].row as f32);
        let c = Vec2::new(samples[ic].col as f32, samples[ic].row as f32);

        let min_x = a.x.min(b.x).min(c.x).floor().max(0.0) as u32;
        let max_x = a.x.max(b.x).max(c.x).ceil().min(width.saturating_sub(1) as f32) as u32;
        let min_y = a.y.min(b.y).min(c.y).floor().max(0.0) as u32;
        let max_y = a.y.max(b.y).max(c.y).ceil().min(height.saturating_sub(1) as f32) as u32;

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                if winners_only {
                    if let Some(is_winner) = winner_mask {
                        if !is_winner(x, y) {
                            continue;
                        }
                    }
                }
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let Some(w) = barycentric(p, a, b, c) else { continue };
                if !inside_triangle(w, 1e-3) {
                    continue;
                }
                let mut px = vec![0.0f32; bands];
                for band in 0..bands {
                    px[band] = w.0 * samples[ia].delta[band] + w.1 * samples[ib].delta[band] + w.2 * samples[ic].delta[band];
                }
                field.set_pixel(x, y, &px);
                field.set_valid(x, y, true);
                covered[(y as usize) * (width as usize) + x as usize] = true;
            }
        }
    }

    // Pixels outside the hull (or, in winners-only mode, winner pixels the
    // triangulation never covered): extrapolate from the nearest sample.
    for y in 0..height {
        for x in 0..width {
            if covered[(y as usize) * (width as usize) + x as usize] {
                continue;
            }
            if winners_only {
                if let Some(is_winner) = winner_mask {
                    if !is_winner(x, y) {
                        continue;
                    }
                }
            }
            let nearest = nearest_sample(samples, x, y);
            field.set_pixel(x, y, &nearest.delta);
            field.set_valid(x, y, true);
        }
    }

    field
}

fn nearest_sample(samples: &[Sample], x: u32, y: u32) -> &Sample {
    samples
        .iter()
        .min_by(|a, b| {
            let da = dist2(a, x, y);
            let db = dist2(b, x, y);
            da.partial_cmp(&db).unwrap()
        })
        .expect("non-empty sample list")
}

fn dist2(s: &Sample, x: u32, y: u32) -> f32 {
    let dx = s.col as f32 - x as f32;
    let dy = s.row as f32 - y as f32;
    dx * dx + dy * dy
}

fn fill_uniform(width: u32, height: u32, bands: usize, value: &[f32]) -> Image {
    let mut field = Image::new(width, height, bands);
    field.fill(value);
    field
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(row: u32, col: u32, d: f32) -> Sample {
        Sample { row, col, delta: vec![d] }
    }

    #[test]
    fn interior_point_interpolates_between_corners() {
        let samples = vec![sample(0, 0, 0.0), sample(0, 10, 1.0), sample(10, 0, 1.0), sample(10, 10, 0.0)];
        let field = scatter_barycentric(&samples, 11, 11, 1, false, None);
        assert!(field.is_valid(5, 5));
    }

    #[test]
    fn fewer_than_three_samples_falls_back_to_mean() {
        let samples = vec![sample(2, 2, 0.4), sample(3, 3, 0.6)];
        let field = scatter_barycentric(&samples, 4, 4, 1, false, None);
        for y in 0..4 {
            for x in 0..4 {
                assert!((field.pixel(x, y)[0] - 0.5).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn empty_samples_yields_fully_masked_field() {
        let field = scatter_barycentric(&[], 4, 4, 1, false, None);
        assert!(!field.is_valid(0, 0));
    }
}
