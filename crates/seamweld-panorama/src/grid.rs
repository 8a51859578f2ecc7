//! The panorama grid and its per-tile backproject results (spec.md §3 "Sky
//! Tile", §4.6 step 2).

use seamweld_core::{CancellationToken, Image};
use seamweld_index::Backproject;
use seamweld_mesh::Mesh;
use rayon::prelude::*;

use crate::error::Result;
use crate::tile::{build_tile_mesh, tile_name, OrbitalDem, PanoramaGeometry};

/// One element of the `Rows` × `Cols` panorama grid: its mesh and the
/// index image its backproject produced, at `tile_resolution` square.
pub struct SkyTile {
    /// Row-major deterministic name (spec.md §3).
    pub name: u32,
    /// Grid row.
    pub row: u32,
    /// Grid column.
    pub col: u32,
    /// The tile's quadrilateral mesh.
    pub mesh: Mesh,
    /// The tile's backproject result: a `tile_resolution`² coherent index.
    pub index: Image,
}

/// Builds every tile's mesh and runs `backproject` over each, in parallel
/// across tiles (spec.md §5 "Across tiles / observations", §4.6 step 2).
/// Results are returned in deterministic row-major order regardless of
/// completion order (spec.md §5(b)).
pub fn build_and_backproject_tiles(
    geometry: &PanoramaGeometry,
    tile_resolution: u32,
    backproject: &(dyn Backproject + Sync),
    dem: Option<&(dyn OrbitalDem)>,
    cancel: Option<&CancellationToken>,
) -> Result<Vec<SkyTile>> {
    let coords: Vec<(u32, u32)> = (0..geometry.rows).flat_map(|r| (0..geometry.cols).map(move |c| (r, c))).collect();

    let tiles: Vec<Result<SkyTile>> = coords
        .into_par_iter()
        .map(|(row, col)| build_tile(geometry, row, col, tile_resolution, backproject, dem, cancel))
        .collect();

    tiles.into_iter().collect()
}

fn build_tile(
    geometry: &PanoramaGeometry,
    row: u32,
    col: u32,
    tile_resolution: u32,
    backproject: &(dyn Backproject + Sync),
    dem: Option<&(dyn OrbitalDem)>,
    cancel: Option<&CancellationToken>,
) -> Result<SkyTile> {
    let mesh = build_tile_mesh(geometry, row, col, dem)?;
    let index = backproject.backproject(&mesh, tile_resolution, tile_resolution, cancel);
    Ok(SkyTile { name: tile_name(row, col, geometry.cols), row, col, mesh, index })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::TileMeshMode;

    struct ConstantBackproject;
    impl Backproject for ConstantBackproject {
        fn backproject(&self, _proxy: &Mesh, width: u32, height: u32, _cancel: Option<&CancellationToken>) -> Image {
            Image::new(width, height, 3)
        }
    }

    #[test]
    fn builds_tiles_in_row_major_order() {
        let geometry = PanoramaGeometry { rows: 1, cols: 8, mode: TileMeshMode::Box, ..Default::default() };
        let tiles = build_and_backproject_tiles(&geometry, 16, &ConstantBackproject, None, None).unwrap();
        assert_eq!(tiles.len(), 8);
        let mut names: Vec<u32> = tiles.iter().map(|t| t.name).collect();
        names.sort_unstable();
        assert_eq!(names, (0..8).collect::<Vec<_>>());
    }
}
