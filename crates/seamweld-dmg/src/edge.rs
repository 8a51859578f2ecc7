//! Domain edge behavior for the multigrid stencil (spec.md §4.4, §6).
//!
//! Wrapping is implemented as an index-remapping function consulted by the
//! relaxation stencil, not by padding the pixel buffer itself — that is what
//! makes the wrap-identity property (a horizontal shift under
//! [`EdgeBehavior::WrapCylinder`] leaves the result unchanged) hold exactly:
//! the solver's view of pixel `(0, y)`'s left neighbor is genuinely
//! `(w - 1, y)`, not a copy of it.

/// How the stencil treats neighbors that fall outside the image bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EdgeBehavior {
    /// Out-of-bounds neighbors simply don't exist; border pixels have fewer
    /// than four neighbors.
    #[default]
    Clamp,
    /// Horizontal wrap only: `x` wraps modulo width, `y` is clamped as in
    /// [`EdgeBehavior::Clamp`].
    WrapCylinder,
    /// Horizontal wrap, and vertical "wrap over the pole": stepping past
    /// `y = 0` or `y = height - 1` re-enters the image at the same row,
    /// reading across the opposite meridian (`x + width / 2`).
    WrapSphere,
    /// Both axes wrap modulo their extent.
    WrapTorus,
}

/// Resolves the 4-connected neighbor of `(x, y)` in direction `(dx, dy)`
/// (`dx, dy` each one of `-1, 0, 1`, with exactly one nonzero), returning
/// `None` if the neighbor falls outside the domain under `edge`.
#[inline]
pub fn neighbor(
    x: u32,
    y: u32,
    dx: i32,
    dy: i32,
    width: u32,
    height: u32,
    edge: EdgeBehavior,
) -> Option<(u32, u32)> {
    if width == 0 || height == 0 {
        return None;
    }
    let nx = x as i64 + dx as i64;
    let ny = y as i64 + dy as i64;
    let w = width as i64;
    let h = height as i64;

    match edge {
        EdgeBehavior::Clamp => {
            if nx < 0 || nx >= w || ny < 0 || ny >= h {
                None
            } else {
                Some((nx as u32, ny as u32))
            }
        }
        EdgeBehavior::WrapCylinder => {
            if ny < 0 || ny >= h {
                None
            } else {
                Some((nx.rem_euclid(w) as u32, ny as u32))
            }
        }
        EdgeBehavior::WrapTorus => Some((nx.rem_euclid(w) as u32, ny.rem_euclid(h) as u32)),
        EdgeBehavior::WrapSphere => {
            let (fx, fy) = if ny < 0 {
                (nx + w / 2, -ny - 1)
            } else if ny >= h {
                (nx + w / 2, 2 * h - 1 - ny)
            } else {
                (nx, ny)
            };
            Some((fx.rem_euclid(w) as u32, fy.rem_euclid(h) as u32))
        }
    }
}

/// The four axis-aligned directions consulted by the 5-point stencil.
pub const DIRECTIONS: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_drops_border_neighbors() {
        assert_eq!(neighbor(0, 0, -1, 0, 4, 4, EdgeBehavior::Clamp), None);
        assert_eq!(neighbor(0, 0, 1, 0, 4, 4, EdgeBehavior::Clamp), Some((1, 0)));
    }

    #[test]
    fn test_wrap_cylinder_wraps_x_only() {
        assert_eq!(neighbor(0, 0, -1, 0, 4, 4, EdgeBehavior::WrapCylinder), Some((3, 0)));
        assert_eq!(neighbor(0, 0, 0, -1, 4, 4, EdgeBehavior::WrapCylinder), None);
    }

    #[test]
    fn test_wrap_torus_wraps_both_axes() {
        assert_eq!(neighbor(0, 0, -1, 0, 4, 4, EdgeBehavior::WrapTorus), Some((3, 0)));
        assert_eq!(neighbor(0, 0, 0, -1, 4, 4, EdgeBehavior::WrapTorus), Some((0, 3)));
    }

    #[test]
    fn test_wrap_sphere_crosses_pole() {
        // Stepping above row 0 re-enters row 0 on the opposite meridian.
        let (nx, ny) = neighbor(0, 0, 0, -1, 4, 4, EdgeBehavior::WrapSphere).unwrap();
        assert_eq!(ny, 0);
        assert_eq!(nx, 2);
    }
}
