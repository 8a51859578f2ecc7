//! Power-of-two restriction pyramid feeding the V-cycle solver.
//!
//! Region ids and flags are categorical — averaging them would invent
//! nonsensical intermediate ids — so they restrict by picking one
//! representative sample per 2x2 block (mirroring
//! `seamweld_core::Image::decimate`'s `DecimateMode::Pick`, generalized to
//! plain `u32`/`u8`/`bool` grids since the solver doesn't route flags and
//! region ids through `Image` itself). Sample values restrict by averaging
//! valid entries, the `DecimateMode::Mean` idiom.

/// One level of the geometry pyramid: region ids, flags, and a validity
/// mask, all at the same resolution.
#[derive(Debug, Clone)]
pub struct GeomLevel {
    /// Level width in pixels.
    pub width: u32,
    /// Level height in pixels.
    pub height: u32,
    /// Region id per pixel (row-major).
    pub region: Vec<u32>,
    /// Flag bits per pixel (row-major).
    pub flags: Vec<u8>,
    /// `true` where the pixel is part of the solve domain.
    pub valid: Vec<bool>,
}

impl GeomLevel {
    /// Row-major flat index of `(x, y)` into this level's per-pixel arrays.
    #[inline]
    pub fn idx(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }
}

/// Rounds `n` up to the next power of two (`1` stays `1`, `0` becomes `1`).
pub fn next_power_of_two(n: u32) -> u32 {
    n.max(1).next_power_of_two()
}

/// Picks one representative index out of a 2x2 source block for categorical
/// restriction: prefers a valid sample, falling back to the top-left one.
fn pick_representative(valid: &[bool; 4]) -> usize {
    valid.iter().position(|&v| v).unwrap_or(0)
}

fn restrict_categorical_u32(level: &GeomLevel, field: &[u32]) -> (u32, u32, Vec<u32>) {
    let (dw, dh) = ((level.width + 1) / 2, (level.height + 1) / 2);
    let mut out = vec![0u32; (dw * dh) as usize];
    for dy in 0..dh {
        for dx in 0..dw {
            let (x0, y0) = (dx * 2, dy * 2);
            let coords = block_coords(level.width, level.height, x0, y0);
            let valids = coords.map(|(x, y)| level.valid[level.idx(x, y)]);
            let pick = pick_representative(&valids);
            let (px, py) = coords[pick];
            out[(dy * dw + dx) as usize] = field[level.idx(px, py)];
        }
    }
    (dw, dh, out)
}

fn restrict_categorical_u8(level: &GeomLevel, field: &[u8]) -> Vec<u8> {
    let (dw, dh) = ((level.width + 1) / 2, (level.height + 1) / 2);
    let mut out = vec![0u8; (dw * dh) as usize];
    for dy in 0..dh {
        for dx in 0..dw {
            let (x0, y0) = (dx * 2, dy * 2);
            let coords = block_coords(level.width, level.height, x0, y0);
            let valids = coords.map(|(x, y)| level.valid[level.idx(x, y)]);
            let pick = pick_representative(&valids);
            let (px, py) = coords[pick];
            out[(dy * dw + dx) as usize] = field[level.idx(px, py)];
        }
    }
    out
}

fn restrict_valid(level: &GeomLevel) -> Vec<bool> {
    let (dw, dh) = ((level.width + 1) / 2, (level.height + 1) / 2);
    let mut out = vec![false; (dw * dh) as usize];
    for dy in 0..dh {
        for dx in 0..dw {
            let (x0, y0) = (dx * 2, dy * 2);
            let coords = block_coords(level.width, level.height, x0, y0);
            out[(dy * dw + dx) as usize] = coords.iter().any(|&(x, y)| level.valid[level.idx(x, y)]);
        }
    }
    out
}

/// Clamps a 2x2 source block's corner coordinates to the level's bounds
/// (the last row/column of an odd-sized level repeats its own pixel).
fn block_coords(width: u32, height: u32, x0: u32, y0: u32) -> [(u32, u32); 4] {
    let x1 = (x0 + 1).min(width - 1);
    let y1 = (y0 + 1).min(height - 1);
    [(x0, y0), (x1, y0), (x0, y1), (x1, y1)]
}

/// Builds the full geometry pyramid from a finest level down to a level no
/// larger than `min_size` along either axis.
pub fn build_geometry_pyramid(
    width: u32,
    height: u32,
    region: Vec<u32>,
    flags: Vec<u8>,
    valid: Vec<bool>,
    min_size: u32,
) -> Vec<GeomLevel> {
    let mut levels = vec![GeomLevel { width, height, region, flags, valid }];
    loop {
        let top = levels.last().unwrap();
        if top.width.max(top.height) <= min_size.max(1) {
            break;
        }
        let (dw, dh, region) = restrict_categorical_u32(top, &top.region);
        let flags = restrict_categorical_u8(top, &top.flags);
        let valid = restrict_valid(top);
        levels.push(GeomLevel { width: dw, height: dh, region, flags, valid });
    }
    levels
}

/// Restricts a value grid (e.g. a residual) by averaging valid samples in
/// each 2x2 block; blocks with no valid sample restrict to `0`.
pub fn restrict_values(fine: &GeomLevel, values: &[f32]) -> Vec<f32> {
    let (dw, dh) = ((fine.width + 1) / 2, (fine.height + 1) / 2);
    let mut out = vec![0.0f32; (dw * dh) as usize];
    for dy in 0..dh {
        for dx in 0..dw {
            let (x0, y0) = (dx * 2, dy * 2);
            let coords = block_coords(fine.width, fine.height, x0, y0);
            let mut acc = 0.0f32;
            let mut count = 0u32;
            for &(x, y) in &coords {
                let i = fine.idx(x, y);
                if fine.valid[i] {
                    acc += values[i];
                    count += 1;
                }
            }
            if count > 0 {
                out[(dy * dw + dx) as usize] = acc / count as f32;
            }
        }
    }
    out
}

/// Bilinearly prolongs a coarse value grid (`cw x ch`) up to `(fw, fh)`.
pub fn prolong_values(cw: u32, ch: u32, values: &[f32], fw: u32, fh: u32) -> Vec<f32> {
    let mut out = vec![0.0f32; (fw * fh) as usize];
    if cw == 0 || ch == 0 {
        return out;
    }
    for fy in 0..fh {
        // Coarse levels are built at half resolution (rounding up), so a
        // fine pixel's coarse-space coordinate is just its own halved.
        let sy = fy as f32 / 2.0;
        let y0 = (sy.floor() as i64).clamp(0, ch as i64 - 1) as u32;
        let y1 = (y0 + 1).min(ch - 1);
        let ty = sy - y0 as f32;
        for fx in 0..fw {
            let sx = fx as f32 / 2.0;
            let x0 = (sx.floor() as i64).clamp(0, cw as i64 - 1) as u32;
            let x1 = (x0 + 1).min(cw - 1);
            let tx = sx - x0 as f32;
            let v00 = values[(y0 * cw + x0) as usize];
            let v10 = values[(y0 * cw + x1) as usize];
            let v01 = values[(y1 * cw + x0) as usize];
            let v11 = values[(y1 * cw + x1) as usize];
            let top = v00 * (1.0 - tx) + v10 * tx;
            let bot = v01 * (1.0 - tx) + v11 * tx;
            out[(fy * fw + fx) as usize] = top * (1.0 - ty) + bot * ty;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_power_of_two() {
        assert_eq!(next_power_of_two(0), 1);
        assert_eq!(next_power_of_two(5), 8);
        assert_eq!(next_power_of_two(8), 8);
    }

    #[test]
    fn test_pyramid_shrinks_to_min_size() {
        let levels = build_geometry_pyramid(8, 8, vec![0; 64], vec![0; 64], vec![true; 64], 1);
        assert_eq!(levels.first().unwrap().width, 8);
        assert_eq!(levels.last().unwrap().width, 1);
        assert_eq!(levels.last().unwrap().height, 1);
    }

    #[test]
    fn test_restrict_values_averages_valid_only() {
        let level = GeomLevel {
            width: 2,
            height: 2,
            region: vec![0; 4],
            flags: vec![0; 4],
            valid: vec![true, false, true, true],
        };
        let values = [2.0, 100.0, 4.0, 6.0];
        let restricted = restrict_values(&level, &values);
        assert_eq!(restricted.len(), 1);
        assert!((restricted[0] - 4.0).abs() < 1e-6);
    }

    #[test]
    fn test_prolong_constant_stays_constant() {
        let out = prolong_values(2, 2, &[5.0; 4], 4, 4);
        for v in out {
            assert!((v - 5.0).abs() < 1e-5);
        }
    }
}
