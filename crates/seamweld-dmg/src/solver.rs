//! The V-cycle multigrid solver (spec.md §4.4, §7, §8).
//!
//! Minimizes, independently per band,
//!
//! ```text
//! sum_p w_f(p)*(O(p) - I(p))^2
//!   + lambda * sum_{(p,q) neighbors, J(p)=J(q)} ((O(p)-O(q)) - (I(p)-I(q)))^2
//! ```
//!
//! over the output `O`, where `w_f(p)` is `0` for `GRADIENT_ONLY` pixels and
//! `1` otherwise, `HOLD_CONSTANT` pixels are pinned at `O(p) = I(p)`, and
//! pairs straddling a seam (`J(p) != J(q)`) or touching a `NO_DATA`/invalid
//! pixel drop out of the neighbor sum entirely. The normal equations of
//! that objective give a Gauss-Seidel update
//!
//! ```text
//! O(p) = (w_f(p)*I(p) + lambda * sum_q (O(q) + I(p) - I(q))) / (w_f(p) + lambda*deg(p))
//! ```
//!
//! which a V-cycle accelerates by solving the same equation for a
//! correction `e` against the restricted residual at coarser grids
//! (the "correction scheme"), prolonging `e` back, and post-smoothing.

use rayon::prelude::*;
use seamweld_core::{CancellationToken, Image};

use crate::colorspace::ColorSpace;
use crate::edge::{neighbor, EdgeBehavior, DIRECTIONS};
use crate::error::{DmgError, Result};
use crate::flags::{self, GRADIENT_ONLY, HOLD_CONSTANT, NO_DATA};
use crate::pyramid::{build_geometry_pyramid, next_power_of_two, prolong_values, restrict_values, GeomLevel};

/// Tunable parameters for [`solve`] (spec.md §6).
#[derive(Debug, Clone, Copy)]
pub struct DmgConfig {
    /// Seam-gradient weight `lambda`. Typical range `0.25..=1.0`.
    pub lambda: f32,
    /// Relaxation sweeps per V-cycle visit to a level (`K`). Typical `2..=4`.
    pub relax_steps: u32,
    /// Maximum V-cycles before giving up (`numMultigridIterations`).
    pub max_vcycles: u32,
    /// Stop once the residual L2 norm drops below this.
    pub residual_epsilon: f32,
    /// Color space the solver relaxes in, for 3-band inputs.
    pub colorspace: ColorSpace,
    /// How the stencil treats neighbors past the domain's edge.
    pub edge: EdgeBehavior,
    /// Coarsest pyramid level size (stops restricting once width and
    /// height both drop to or below this).
    pub min_level_size: u32,
}

impl Default for DmgConfig {
    fn default() -> Self {
        Self {
            lambda: 0.5,
            relax_steps: 3,
            max_vcycles: 50,
            residual_epsilon: 1e-4,
            colorspace: ColorSpace::None,
            edge: EdgeBehavior::Clamp,
            min_level_size: 1,
        }
    }
}

/// Outcome of a [`solve`] call (spec.md §7, kind 5: "solver returns
/// best-so-far, caller told").
#[derive(Debug, Clone, Copy)]
pub struct ConvergenceInfo {
    /// `true` if the residual dropped below `residual_epsilon` before
    /// `max_vcycles` was reached.
    pub converged: bool,
    /// Final residual L2 norm (worst band, if multi-band).
    pub residual: f32,
    /// V-cycles actually run (worst band, if multi-band).
    pub vcycles: u32,
}

impl ConvergenceInfo {
    fn worse(self, other: Self) -> Self {
        Self {
            converged: self.converged && other.converged,
            residual: self.residual.max(other.residual),
            vcycles: self.vcycles.max(other.vcycles),
        }
    }
}

/// Runs the DMG multigrid blend.
///
/// `composite` is the `B`-band input image `I`. `region` is the per-texel
/// region index `J`, either `1` band (shared across all of `composite`'s
/// bands) or exactly `B` bands. `flags`, if given, follows the same
/// broadcasting rule. Composite pixels the caller marked invalid are
/// treated as `NO_DATA | HOLD_CONSTANT` regardless of any explicit flags.
///
/// # Errors
///
/// Returns [`DmgError`] if `region`/`flags` dimensions or band counts don't
/// match `composite`, or if `composite` is empty.
pub fn solve(
    composite: &Image,
    region: &Image,
    flags: Option<&Image>,
    config: &DmgConfig,
    cancel: Option<&CancellationToken>,
) -> Result<(Image, ConvergenceInfo)> {
    if composite.is_empty() {
        return Err(DmgError::EmptyImage);
    }
    let (w, h) = composite.dimensions();
    if region.dimensions() != (w, h) {
        let (rw, rh) = region.dimensions();
        return Err(DmgError::DimensionMismatch { cw: w, ch: h, rw, rh });
    }
    if let Some(f) = flags {
        if f.dimensions() != (w, h) {
            let (rw, rh) = f.dimensions();
            return Err(DmgError::DimensionMismatch { cw: w, ch: h, rw, rh });
        }
        if f.bands() != 1 && f.bands() != composite.bands() {
            return Err(DmgError::FlagsBandMismatch { got: f.bands(), expected: composite.bands() });
        }
    }
    if region.bands() != 1 && region.bands() != composite.bands() {
        return Err(DmgError::RegionBandMismatch { got: region.bands(), expected: composite.bands() });
    }

    let bands = composite.bands();
    let use_lab = bands == 3 && config.colorspace != ColorSpace::None;

    // Extract per-pixel scalar grids, applying the color space transform
    // up front so every band below is solved as an independent scalar field.
    let mut band_values: Vec<Vec<f32>> = (0..bands).map(|_| vec![0.0f32; (w * h) as usize]).collect();
    let mut valid = vec![false; (w * h) as usize];
    for y in 0..h {
        for x in 0..w {
            let idx = (y * w + x) as usize;
            let ok = composite.is_valid(x, y);
            valid[idx] = ok;
            if !ok {
                continue;
            }
            let px = composite.pixel(x, y);
            if use_lab {
                let converted = config.colorspace.forward([px[0], px[1], px[2]]);
                for b in 0..3 {
                    band_values[b][idx] = converted[b];
                }
            } else {
                for (b, slot) in band_values.iter_mut().enumerate() {
                    slot[idx] = px[b];
                }
            }
        }
    }

    let region_bands = region.bands();
    let flag_bands = flags.map(|f| f.bands()).unwrap_or(1);

    let outcomes: Vec<(Vec<f32>, ConvergenceInfo)> = (0..bands)
        .into_par_iter()
        .map(|b| {
            let region_band = if region_bands == 1 { 0 } else { b };
            let flag_band = if flag_bands == 1 { 0 } else { b };
            let region_grid = extract_region(region, region_band);
            let flags_grid = extract_flags(flags, flag_band, &valid, w, h);
            solve_band(w, h, &band_values[b], &region_grid, &flags_grid, &valid, config, cancel)
        })
        .collect();

    let mut out = Image::new_empty(w, h, bands);
    let mut info = ConvergenceInfo { converged: true, residual: 0.0, vcycles: 0 };
    let solved: Vec<Vec<f32>> = outcomes
        .into_iter()
        .map(|(values, band_info)| {
            info = info.worse(band_info);
            values
        })
        .collect();

    for y in 0..h {
        for x in 0..w {
            let idx = (y * w + x) as usize;
            if !valid[idx] {
                continue;
            }
            let mut px = vec![0.0f32; bands];
            if use_lab {
                let lab = [solved[0][idx], solved[1][idx], solved[2][idx]];
                let rgb = config.colorspace.inverse(lab);
                px[..3].copy_from_slice(&rgb);
            } else {
                for (b, slot) in px.iter_mut().enumerate() {
                    *slot = solved[b][idx];
                }
            }
            out.set_pixel(x, y, &px);
        }
    }
    Ok((out, info))
}

fn extract_region(region: &Image, band: usize) -> Vec<u32> {
    let (w, h) = region.dimensions();
    let mut out = vec![0u32; (w * h) as usize];
    for y in 0..h {
        for x in 0..w {
            let idx = (y * w + x) as usize;
            if region.is_valid(x, y) {
                out[idx] = region.pixel(x, y)[band].round() as u32;
            }
        }
    }
    out
}

fn extract_flags(flags: Option<&Image>, band: usize, valid: &[bool], w: u32, h: u32) -> Vec<u8> {
    let mut out = vec![0u8; (w * h) as usize];
    if let Some(flags_img) = flags {
        for y in 0..h {
            for x in 0..w {
                let idx = (y * w + x) as usize;
                if flags_img.is_valid(x, y) {
                    out[idx] = flags::decode(flags_img.pixel(x, y)[band]);
                }
            }
        }
    }
    for (idx, v) in valid.iter().enumerate() {
        if !v {
            out[idx] |= HOLD_CONSTANT | NO_DATA;
        }
    }
    out
}

/// Solves one scalar band end to end: pads to a power-of-two domain, runs
/// V-cycles until convergence or `max_vcycles`, crops back.
fn solve_band(
    w: u32,
    h: u32,
    input: &[f32],
    region: &[u32],
    flags_grid: &[u8],
    valid: &[bool],
    config: &DmgConfig,
    cancel: Option<&CancellationToken>,
) -> (Vec<f32>, ConvergenceInfo) {
    if !valid.iter().any(|&v| v) {
        return (input.to_vec(), ConvergenceInfo { converged: true, residual: 0.0, vcycles: 0 });
    }

    let pw = next_power_of_two(w);
    let ph = next_power_of_two(h);
    let padded_valid = pad_bool(valid, w, h, pw, ph, false);
    let padded_region = pad_u32(region, w, h, pw, ph, 0);
    let mut padded_flags = pad_u8(flags_grid, w, h, pw, ph, NO_DATA | HOLD_CONSTANT);
    for (idx, v) in padded_valid.iter().enumerate() {
        if !v {
            padded_flags[idx] |= NO_DATA | HOLD_CONSTANT;
        }
    }
    let padded_input = pad_f32(input, w, h, pw, ph, 0.0);

    let levels = build_geometry_pyramid(pw, ph, padded_region, padded_flags, padded_valid, config.min_level_size);

    let mut o = padded_input.clone();
    // HOLD_CONSTANT / invalid pixels are pinned at I(p) for the life of the solve.
    pin_holds(&levels[0], &padded_input, &mut o);

    let mut info = ConvergenceInfo { converged: false, residual: f32::INFINITY, vcycles: 0 };
    for cycle in 0..config.max_vcycles {
        if cancel.is_some_and(CancellationToken::is_cancelled) {
            break;
        }
        v_cycle(&levels, 0, &padded_input, &mut o, config);
        let residual = residual_norm(&levels[0], &padded_input, &o, config.lambda, config.edge);
        info.vcycles = cycle + 1;
        info.residual = residual;
        if residual < config.residual_epsilon {
            info.converged = true;
            break;
        }
    }

    let cropped = crop_f32(&o, pw, w, h);
    (cropped, info)
}

fn pad_f32(src: &[f32], w: u32, h: u32, pw: u32, ph: u32, fill: f32) -> Vec<f32> {
    let mut out = vec![fill; (pw * ph) as usize];
    for y in 0..h {
        for x in 0..w {
            out[(y * pw + x) as usize] = src[(y * w + x) as usize];
        }
    }
    out
}

fn pad_u32(src: &[u32], w: u32, h: u32, pw: u32, ph: u32, fill: u32) -> Vec<u32> {
    let mut out = vec![fill; (pw * ph) as usize];
    for y in 0..h {
        for x in 0..w {
            out[(y * pw + x) as usize] = src[(y * w + x) as usize];
        }
    }
    out
}

fn pad_u8(src: &[u8], w: u32, h: u32, pw: u32, ph: u32, fill: u8) -> Vec<u8> {
    let mut out = vec![fill; (pw * ph) as usize];
    for y in 0..h {
        for x in 0..w {
            out[(y * pw + x) as usize] = src[(y * w + x) as usize];
        }
    }
    out
}

fn pad_bool(src: &[bool], w: u32, h: u32, pw: u32, ph: u32, fill: bool) -> Vec<bool> {
    let mut out = vec![fill; (pw * ph) as usize];
    for y in 0..h {
        for x in 0..w {
            out[(y * pw + x) as usize] = src[(y * w + x) as usize];
        }
    }
    out
}

fn crop_f32(src: &[f32], pw: u32, w: u32, h: u32) -> Vec<f32> {
    let mut out = vec![0.0f32; (w * h) as usize];
    for y in 0..h {
        for x in 0..w {
            out[(y * w + x) as usize] = src[(y * pw + x) as usize];
        }
    }
    out
}

#[inline]
fn fidelity_weight(f: u8) -> f32 {
    if f & GRADIENT_ONLY != 0 {
        0.0
    } else {
        1.0
    }
}

/// For every pixel flagged `HOLD_CONSTANT`, pins `x(p) = pin_value(p)` and
/// leaves every other pixel in `x` alone.
fn pin_holds(level: &GeomLevel, pin_value: &[f32], x: &mut [f32]) {
    for (idx, &f) in level.flags.iter().enumerate() {
        if flags::is_hold_constant(f) {
            x[idx] = pin_value[idx];
        }
    }
}

/// One Gauss-Seidel pass solving `A*x = b` with red-black ordering, where
/// `A` is the normal-equations operator built from `level`'s region/flags.
fn relax(level: &GeomLevel, b: &[f32], x: &mut [f32], lambda: f32, edge: EdgeBehavior, sweeps: u32) {
    let (w, h) = (level.width, level.height);
    for _ in 0..sweeps {
        for color in 0..2u32 {
            for y in 0..h {
                for sx in 0..w {
                    if (sx + y) % 2 != color {
                        continue;
                    }
                    let idx = level.idx(sx, y);
                    if !level.valid[idx] || flags::is_hold_constant(level.flags[idx]) {
                        continue;
                    }
                    let wf = fidelity_weight(level.flags[idx]);
                    let region_p = level.region[idx];
                    let mut deg = 0u32;
                    let mut neighbor_sum = 0.0f32;
                    for (dx, dy) in DIRECTIONS {
                        let Some((nx, ny)) = neighbor(sx, y, dx, dy, w, h, edge) else {
                            continue;
                        };
                        let nidx = level.idx(nx, ny);
                        if !level.valid[nidx] || level.region[nidx] != region_p {
                            continue;
                        }
                        deg += 1;
                        neighbor_sum += x[nidx];
                    }
                    let denom = wf + lambda * deg as f32;
                    if denom > 1e-12 {
                        x[idx] = (b[idx] + lambda * neighbor_sum) / denom;
                    }
                }
            }
        }
    }
}

/// Residual `r = b - A*x` for the finest level's actual objective (not a
/// correction), used both for the L2 convergence check and as the coarse
/// grid's right-hand side.
fn residual(level: &GeomLevel, input: &[f32], o: &[f32], lambda: f32, edge: EdgeBehavior) -> Vec<f32> {
    let (w, h) = (level.width, level.height);
    let mut r = vec![0.0f32; (w * h) as usize];
    for y in 0..h {
        for x in 0..w {
            let idx = level.idx(x, y);
            if !level.valid[idx] || flags::is_hold_constant(level.flags[idx]) {
                continue;
            }
            let wf = fidelity_weight(level.flags[idx]);
            let region_p = level.region[idx];
            let mut grad_term = 0.0f32;
            for (dx, dy) in DIRECTIONS {
                let Some((nx, ny)) = neighbor(x, y, dx, dy, w, h, edge) else {
                    continue;
                };
                let nidx = level.idx(nx, ny);
                if !level.valid[nidx] || level.region[nidx] != region_p {
                    continue;
                }
                grad_term += (o[idx] - o[nidx]) - (input[idx] - input[nidx]);
            }
            r[idx] = wf * (input[idx] - o[idx]) - lambda * grad_term;
        }
    }
    r
}

fn residual_norm(level: &GeomLevel, input: &[f32], o: &[f32], lambda: f32, edge: EdgeBehavior) -> f32 {
    let r = residual(level, input, o, lambda, edge);
    let sum_sq: f64 = r.iter().map(|&v| (v as f64) * (v as f64)).sum();
    (sum_sq.sqrt() as f32) / (r.len().max(1) as f32).sqrt()
}

/// The right-hand side `b` for the finest level's actual objective:
/// `w_f(p)*I(p) + lambda * sum_q (I(p) - I(q))`.
fn finest_rhs(level: &GeomLevel, input: &[f32], lambda: f32, edge: EdgeBehavior) -> Vec<f32> {
    let (w, h) = (level.width, level.height);
    let mut b = vec![0.0f32; (w * h) as usize];
    for y in 0..h {
        for x in 0..w {
            let idx = level.idx(x, y);
            if !level.valid[idx] {
                continue;
            }
            if flags::is_hold_constant(level.flags[idx]) {
                b[idx] = input[idx];
                continue;
            }
            let wf = fidelity_weight(level.flags[idx]);
            let region_p = level.region[idx];
            let mut grad_term = 0.0f32;
            for (dx, dy) in DIRECTIONS {
                let Some((nx, ny)) = neighbor(x, y, dx, dy, w, h, edge) else {
                    continue;
                };
                let nidx = level.idx(nx, ny);
                if !level.valid[nidx] || level.region[nidx] != region_p {
                    continue;
                }
                grad_term += input[idx] - input[nidx];
            }
            b[idx] = wf * input[idx] + lambda * grad_term;
        }
    }
    b
}

/// Recursive correction-scheme V-cycle. `level` 0 solves the real variable
/// `o` against `input`; deeper levels solve a zero-initialized correction
/// `e` against the residual restricted from their parent.
fn v_cycle(levels: &[GeomLevel], level: usize, input: &[f32], o: &mut Vec<f32>, config: &DmgConfig) {
    let geom = &levels[level];
    let b = finest_rhs(geom, input, config.lambda, config.edge);
    relax(geom, &b, o, config.lambda, config.edge, config.relax_steps);

    if level + 1 >= levels.len() {
        // Coarsest level: a handful of extra sweeps stands in for a direct solve.
        relax(geom, &b, o, config.lambda, config.edge, config.relax_steps * 4);
        return;
    }

    let r = residual(geom, input, o, config.lambda, config.edge);
    let r_coarse = restrict_values(geom, &r);
    let coarse = &levels[level + 1];
    let mut e = vec![0.0f32; (coarse.width * coarse.height) as usize];
    v_cycle_correction(levels, level + 1, &r_coarse, &mut e, config);

    let prolonged = prolong_values(coarse.width, coarse.height, &e, geom.width, geom.height);
    for (idx, correction) in prolonged.iter().enumerate() {
        if geom.valid[idx] && !flags::is_hold_constant(geom.flags[idx]) {
            o[idx] += correction;
        }
    }
    pin_holds(geom, input, o);
    relax(geom, &b, o, config.lambda, config.edge, config.relax_steps);
}

/// Like [`v_cycle`], but every level (including the coarsest) solves for a
/// correction `e` against an externally supplied residual `b`, rather than
/// the finest level's `I`-derived right-hand side.
fn v_cycle_correction(levels: &[GeomLevel], level: usize, b: &[f32], e: &mut Vec<f32>, config: &DmgConfig) {
    let geom = &levels[level];
    relax(geom, b, e, config.lambda, config.edge, config.relax_steps);

    if level + 1 >= levels.len() {
        relax(geom, b, e, config.lambda, config.edge, config.relax_steps * 4);
        return;
    }

    // Residual of the correction equation A*e = b is b - A*e; reuse
    // `residual` by treating `e` as both "input" and "solution" so its
    // fidelity/gradient terms cancel, leaving exactly b - A*e.
    let ae = apply_operator(geom, e, config.lambda, config.edge);
    let mut r = vec![0.0f32; b.len()];
    for (idx, slot) in r.iter_mut().enumerate() {
        if geom.valid[idx] && !flags::is_hold_constant(geom.flags[idx]) {
            *slot = b[idx] - ae[idx];
        }
    }
    let r_coarse = restrict_values(geom, &r);
    let coarse = &levels[level + 1];
    let mut e_coarse = vec![0.0f32; (coarse.width * coarse.height) as usize];
    v_cycle_correction(levels, level + 1, &r_coarse, &mut e_coarse, config);

    let prolonged = prolong_values(coarse.width, coarse.height, &e_coarse, geom.width, geom.height);
    for (idx, correction) in prolonged.iter().enumerate() {
        if geom.valid[idx] && !flags::is_hold_constant(geom.flags[idx]) {
            e[idx] += correction;
        }
    }
    relax(geom, b, e, config.lambda, config.edge, config.relax_steps);
}

/// `A*x` for the normal-equations operator: `w_f(p)*x(p) + lambda*(deg(p)*x(p) - sum_q x(q))`.
fn apply_operator(level: &GeomLevel, x: &[f32], lambda: f32, edge: EdgeBehavior) -> Vec<f32> {
    let (w, h) = (level.width, level.height);
    let mut out = vec![0.0f32; (w * h) as usize];
    for y in 0..h {
        for sx in 0..w {
            let idx = level.idx(sx, y);
            if !level.valid[idx] || flags::is_hold_constant(level.flags[idx]) {
                out[idx] = x[idx];
                continue;
            }
            let wf = fidelity_weight(level.flags[idx]);
            let region_p = level.region[idx];
            let mut deg = 0u32;
            let mut neighbor_sum = 0.0f32;
            for (dx, dy) in DIRECTIONS {
                let Some((nx, ny)) = neighbor(sx, y, dx, dy, w, h, edge) else {
                    continue;
                };
                let nidx = level.idx(nx, ny);
                if !level.valid[nidx] || level.region[nidx] != region_p {
                    continue;
                }
                deg += 1;
                neighbor_sum += x[nidx];
            }
            out[idx] = wf * x[idx] + lambda * (deg as f32 * x[idx] - neighbor_sum);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid_region(w: u32, h: u32, id: f32) -> Image {
        let mut img = Image::new(w, h, 1);
        img.fill(&[id]);
        img
    }

    #[test]
    fn test_hold_constant_pixels_are_exact() {
        let mut composite = Image::new(4, 4, 1);
        for y in 0..4 {
            for x in 0..4 {
                composite.set_pixel(x, y, &[(x + y) as f32 / 6.0]);
            }
        }
        let region = solid_region(4, 4, 0.0);
        let mut flag_img = Image::new(4, 4, 1);
        flag_img.fill(&[0.0]);
        flag_img.set_pixel(0, 0, &[HOLD_CONSTANT as f32]);
        flag_img.set_pixel(3, 3, &[HOLD_CONSTANT as f32]);

        let config = DmgConfig { max_vcycles: 5, ..Default::default() };
        let (out, _) = solve(&composite, &region, Some(&flag_img), &config, None).unwrap();
        assert!((out.pixel(0, 0)[0] - composite.pixel(0, 0)[0]).abs() < 1e-6);
        assert!((out.pixel(3, 3)[0] - composite.pixel(3, 3)[0]).abs() < 1e-6);
    }

    #[test]
    fn test_single_region_idempotence() {
        let mut composite = Image::new(8, 8, 1);
        for y in 0..8 {
            for x in 0..8 {
                composite.set_pixel(x, y, &[((x * 7 + y * 3) % 11) as f32 / 10.0]);
            }
        }
        let region = solid_region(8, 8, 0.0);
        let config = DmgConfig { max_vcycles: 20, residual_epsilon: 1e-6, ..Default::default() };
        let (out, _) = solve(&composite, &region, None, &config, None).unwrap();
        for y in 0..8 {
            for x in 0..8 {
                assert!((out.pixel(x, y)[0] - composite.pixel(x, y)[0]).abs() < 1e-3);
            }
        }
    }

    #[test]
    fn test_two_patch_checker_smooths_the_seam() {
        let mut composite = Image::new(16, 16, 1);
        let mut region = Image::new(16, 16, 1);
        for y in 0..16 {
            for x in 0..16 {
                let (value, reg) = if x < 8 { (0.2, 2.0) } else { (0.8, 3.0) };
                composite.set_pixel(x, y, &[value]);
                region.set_pixel(x, y, &[reg]);
            }
        }
        let config = DmgConfig { lambda: 1.0, max_vcycles: 30, residual_epsilon: 1e-6, ..Default::default() };
        let (out, _) = solve(&composite, &region, None, &config, None).unwrap();

        let input_edge_grad = (composite.pixel(8, 8)[0] - composite.pixel(7, 8)[0]).abs();
        let output_edge_grad = (out.pixel(8, 8)[0] - out.pixel(7, 8)[0]).abs();
        assert!(output_edge_grad <= input_edge_grad * 0.2);

        let left_mean: f32 = (0..8).map(|x| out.pixel(x, 8)[0]).sum::<f32>() / 8.0;
        let right_mean: f32 = (8..16).map(|x| out.pixel(x, 8)[0]).sum::<f32>() / 8.0;
        assert!((left_mean - 0.2).abs() <= 0.3);
        assert!((right_mean - 0.8).abs() <= 0.3);
    }

    #[test]
    fn test_wrap_cylinder_is_shift_invariant() {
        let w = 8;
        let h = 8;
        let make = |shift: u32| {
            let mut composite = Image::new(w, h, 1);
            let mut region = Image::new(w, h, 1);
            for y in 0..h {
                for x in 0..w {
                    let sx = (x + shift) % w;
                    let value = if sx < w / 2 { 0.1 } else { 0.9 };
                    let reg = if sx < w / 2 { 1.0 } else { 2.0 };
                    composite.set_pixel(x, y, &[value]);
                    region.set_pixel(x, y, &[reg]);
                }
            }
            (composite, region)
        };
        let config = DmgConfig {
            lambda: 1.0,
            max_vcycles: 15,
            residual_epsilon: 1e-6,
            edge: EdgeBehavior::WrapCylinder,
            ..Default::default()
        };
        let (base_composite, base_region) = make(0);
        let (shifted_composite, shifted_region) = make(3);
        let (out_base, _) = solve(&base_composite, &base_region, None, &config, None).unwrap();
        let (out_shifted, _) = solve(&shifted_composite, &shifted_region, None, &config, None).unwrap();
        for y in 0..h {
            for x in 0..w {
                let sx = (x + 3) % w;
                assert!((out_base.pixel(x, y)[0] - out_shifted.pixel(sx, y)[0]).abs() < 1e-3);
            }
        }
    }

    #[test]
    fn test_empty_image_errors() {
        let composite = Image::new(0, 0, 1);
        let region = Image::new(0, 0, 1);
        let config = DmgConfig::default();
        assert!(matches!(solve(&composite, &region, None, &config, None), Err(DmgError::EmptyImage)));
    }

    #[test]
    fn test_no_valid_pixels_copies_input() {
        let mut composite = Image::new_empty(4, 4, 1);
        composite.data_mut().iter_mut().for_each(|v| *v = 0.42);
        let region = solid_region(4, 4, 0.0);
        let config = DmgConfig::default();
        let (out, info) = solve(&composite, &region, None, &config, None).unwrap();
        assert!(info.converged);
        assert_eq!(out.dimensions(), (4, 4));
    }
}
