//! Tile-to-composite blit and wrap-aware guard columns (spec.md §4.6, step
//! 3): "Blit all tile indices into one large composite image of width
//! Cols·T ... if a power of two, LimberDMG is configured with
//! WrapCylinder; else with Clamp and the guard columns are replicated from
//! the opposite side before solving and discarded after."

use seamweld_core::{DecimateMode, Image};
use seamweld_dmg::EdgeBehavior;

/// Default maximum composite long-axis size (spec.md §4.6: "≈ 8K").
pub const MAX_COMPOSITE_LONG_AXIS: u32 = 8192;

/// Number of guard columns added on each side when `cols * t` isn't a
/// power of two.
pub const GUARD_COLUMNS: u32 = 8;

/// The outcome of laying tiles into one panorama composite.
pub struct PanoramaComposite {
    /// The assembled composite image, `guard_columns` wider on each side
    /// than `cols * tile_resolution` if guards were needed.
    pub image: Image,
    /// Columns of guard padding added to each side (`0` if the unguarded
    /// width was already a power of two).
    pub guard_columns: u32,
    /// The edge behavior the solver should use for this composite.
    pub edge: EdgeBehavior,
    /// Decimation factor applied to every tile before blit, to keep the
    /// composite within [`MAX_COMPOSITE_LONG_AXIS`] (`1` = no decimation).
    pub decimation: u32,
}

/// Computes the decimation factor needed to keep `rows * t` and `cols * t`
/// (after any prior decimation) within `max_long_axis`.
pub fn required_decimation(rows: u32, cols: u32, tile_resolution: u32, max_long_axis: u32) -> u32 {
    let long_axis = (rows.max(cols) as u64) * tile_resolution as u64;
    let mut factor = 1u32;
    while (long_axis / factor as u64) > max_long_axis as u64 {
        factor *= 2;
    }
    factor
}

fn is_power_of_two(n: u32) -> bool {
    n != 0 && (n & (n - 1)) == 0
}

/// Lays `rows * cols` tile index images (already decimated to
/// `tile_resolution`, row-major) into one composite, adding guard columns
/// and picking `WrapCylinder` vs `Clamp` per spec.md §4.6.
///
/// `tiles[row * cols + col]` must each be `tile_resolution` square.
pub fn assemble_composite(
    tiles: &[Image],
    rows: u32,
    cols: u32,
    tile_resolution: u32,
    decimation: u32,
) -> PanoramaComposite {
    let unguarded_width = cols * tile_resolution;
    let height = rows * tile_resolution;
    let power_of_two = is_power_of_two(unguarded_width);
    let guard_columns = if power_of_two { 0 } else { GUARD_COLUMNS };
    let width = unguarded_width + 2 * guard_columns;
    let bands = tiles.first().map(|t| t.bands()).unwrap_or(3);

    let mut composite = Image::new_empty(width, height, bands);
    for row in 0..rows {
        for col in 0..cols {
            let tile = &tiles[(row * cols + col) as usize];
            let dst_x = guard_columns as i64 + (col * tile_resolution) as i64;
            let dst_y = (row * tile_resolution) as i64;
            composite.blit(tile, dst_x, dst_y);
        }
    }

    if guard_columns > 0 {
        replicate_guard_columns(&mut composite, guard_columns, unguarded_width);
    }

    PanoramaComposite {
        image: composite,
        guard_columns,
        edge: if power_of_two { EdgeBehavior::WrapCylinder } else { EdgeBehavior::Clamp },
        decimation,
    }
}

/// Copies the rightmost `guard_columns` real columns into the left guard
/// band, and the leftmost real columns into the right guard band, so the
/// solver sees continuous data across the seam without requiring a true
/// cylindrical wrap (used when `Cols·T` isn't a power of two).
fn replicate_guard_columns(composite: &mut Image, guard_columns: u32, unguarded_width: u32) {
    let height = composite.height();
    for y in 0..height {
        for g in 0..guard_columns {
            // Left guard band <- rightmost real columns.
            let src_x = guard_columns + unguarded_width - guard_columns + g;
            let px = composite.pixel(src_x, y).to_vec();
            let valid = composite.is_valid(src_x, y);
            composite.set_pixel(g, y, &px);
            composite.set_valid(g, y, valid);

            // Right guard band <- leftmost real columns.
            let src_x2 = guard_columns + g;
            let px2 = composite.pixel(src_x2, y).to_vec();
            let valid2 = composite.is_valid(src_x2, y);
            let dst_x2 = guard_columns + unguarded_width + g;
            composite.set_pixel(dst_x2, y, &px2);
            composite.set_valid(dst_x2, y, valid2);
        }
    }
}

/// Strips the guard columns back off a blended composite, returning the
/// real `Cols·T`-wide image (spec.md §4.6: "discarded after").
pub fn strip_guard_columns(composite: &Image, guard_columns: u32) -> Image {
    if guard_columns == 0 {
        return composite.clone();
    }
    let height = composite.height();
    let unguarded_width = composite.width() - 2 * guard_columns;
    composite.crop(seamweld_core::Rect::from_corners(guard_columns, 0, guard_columns + unguarded_width, height))
}

/// Decimates a tile image by `factor` (mean of each block), used to keep
/// the composite within the ≈8K long-axis cap before blit.
pub fn decimate_tile(tile: &Image, factor: u32) -> Image {
    if factor <= 1 {
        return tile.clone();
    }
    tile.decimate(factor, DecimateMode::Mean)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn power_of_two_width_uses_wrap_cylinder_and_no_guards() {
        let tiles: Vec<Image> = (0..32).map(|_| Image::new(64, 64, 1)).collect();
        let result = assemble_composite(&tiles, 1, 32, 64, 1);
        assert_eq!(result.guard_columns, 0);
        assert_eq!(result.edge, EdgeBehavior::WrapCylinder);
        assert_eq!(result.image.dimensions(), (32 * 64, 64));
    }

    #[test]
    fn non_power_of_two_width_gets_guard_columns() {
        let tiles: Vec<Image> = (0..30).map(|_| Image::new(64, 64, 1)).collect();
        let result = assemble_composite(&tiles, 1, 30, 64, 1);
        assert_eq!(result.guard_columns, GUARD_COLUMNS);
        assert_eq!(result.edge, EdgeBehavior::Clamp);
        assert_eq!(result.image.width(), 30 * 64 + 2 * GUARD_COLUMNS);
    }

    #[test]
    fn strip_guard_columns_restores_unguarded_width() {
        let tiles: Vec<Image> = (0..30).map(|_| Image::new(64, 64, 1)).collect();
        let result = assemble_composite(&tiles, 1, 30, 64, 1);
        let stripped = strip_guard_columns(&result.image, result.guard_columns);
        assert_eq!(stripped.width(), 30 * 64);
    }

    #[test]
    fn required_decimation_halves_until_within_cap() {
        assert_eq!(required_decimation(1, 32, 512, 8192), 2);
        assert_eq!(required_decimation(1, 8, 512, 8192), 1);
    }
}
