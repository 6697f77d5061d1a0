//! Distance-to-obstacle field.
//!
//! For every free cell, the field holds the exact Euclidean distance (in
//! grid-cell units) to the nearest obstacle cell. The repulsive potential
//! is sensitive to small distance errors near its clamp boundary, so the
//! transform is exact, not a chamfer or brushfire approximation.

use log::debug;
use rstar::RTree;

use crate::core::{GridCoord, WorldPoint};
use crate::error::{Result, SetupError};
use crate::grid::OccupancyGrid;

/// Distance reported for cells when the map contains no obstacle at all.
pub const NO_OBSTACLE: f32 = f32::MAX;

/// Finite squared-distance sentinel used inside the transform. Kept finite
/// so parabola intersections in the envelope pass stay well defined.
const FAR: f32 = 1.0e12;

/// Euclidean distance to the nearest obstacle, per cell.
///
/// Carries the same geometry metadata as the grid it was derived from, so
/// downstream stages (and external visualization) can interpret it without
/// holding the grid. Distances are in grid-cell units; obstacle cells hold
/// 0.0 and cells of an obstacle-free map hold [`NO_OBSTACLE`].
#[derive(Clone, Debug)]
pub struct DistanceField {
    /// Distances in grid-cell units, row-major
    values: Vec<f32>,
    /// Field width in cells
    width: usize,
    /// Field height in cells
    height: usize,
    /// Resolution in world units per cell
    resolution: f32,
    /// World coordinates of cell (0, 0)
    origin: WorldPoint,
}

impl DistanceField {
    /// Compute the exact Euclidean distance transform of an occupancy grid.
    ///
    /// Uses the two-pass parabolic envelope transform (columns of squared
    /// distances, then rows), which is exact for every cell. Pure function
    /// of the grid.
    pub fn from_grid(grid: &OccupancyGrid) -> Self {
        let width = grid.width();
        let height = grid.height();

        let mut sq = vec![FAR; width * height];
        let mut obstacle_cells = 0usize;
        for (i, &occ) in grid.cells().iter().enumerate() {
            if occ {
                sq[i] = 0.0;
                obstacle_cells += 1;
            }
        }

        let n = width.max(height);
        let mut f = vec![0.0f32; n];
        let mut d = vec![0.0f32; n];
        let mut v = vec![0usize; n];
        let mut z = vec![0.0f32; n + 1];

        // Pass 1: transform each column
        for x in 0..width {
            for y in 0..height {
                f[y] = sq[y * width + x];
            }
            squared_edt_1d(&f[..height], &mut d[..height], &mut v[..height], &mut z[..height + 1]);
            for y in 0..height {
                sq[y * width + x] = d[y];
            }
        }

        // Pass 2: transform each row of the column result
        for y in 0..height {
            let row = y * width;
            f[..width].copy_from_slice(&sq[row..row + width]);
            squared_edt_1d(&f[..width], &mut d[..width], &mut v[..width], &mut z[..width + 1]);
            sq[row..row + width].copy_from_slice(&d[..width]);
        }

        let values = sq
            .into_iter()
            .map(|s| if s >= FAR * 0.5 { NO_OBSTACLE } else { s.sqrt() })
            .collect();

        debug!(
            "[DistanceField] exact EDT over {}x{} grid ({} obstacle cells)",
            width, height, obstacle_cells
        );

        Self {
            values,
            width,
            height,
            resolution: grid.resolution(),
            origin: grid.origin(),
        }
    }

    /// Build the field from a continuous obstacle point list.
    ///
    /// Each cell's distance is the Euclidean distance from its sample
    /// point to the nearest obstacle point, converted to grid-cell units.
    /// Obstacle points are indexed in an R-tree so every cell lookup is a
    /// logarithmic nearest-neighbor query.
    pub fn from_points(
        obstacles: &[WorldPoint],
        width: usize,
        height: usize,
        resolution: f32,
        origin: WorldPoint,
    ) -> Result<Self> {
        if !(resolution.is_finite() && resolution > 0.0) {
            return Err(SetupError::InvalidResolution { resolution });
        }

        let tree: RTree<[f32; 2]> =
            RTree::bulk_load(obstacles.iter().map(|p| [p.x, p.y]).collect());

        let mut values = vec![NO_OBSTACLE; width * height];
        for y in 0..height {
            for x in 0..width {
                let world = WorldPoint::new(
                    origin.x + x as f32 * resolution,
                    origin.y + y as f32 * resolution,
                );
                if let Some(nearest) = tree.nearest_neighbor(&[world.x, world.y]) {
                    let obstacle = WorldPoint::new(nearest[0], nearest[1]);
                    values[y * width + x] = world.distance(&obstacle) / resolution;
                }
            }
        }

        debug!(
            "[DistanceField] nearest-obstacle field over {}x{} cells ({} obstacle points)",
            width,
            height,
            obstacles.len()
        );

        Ok(Self {
            values,
            width,
            height,
            resolution,
            origin,
        })
    }

    /// Field width in cells
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Field height in cells
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Resolution in world units per cell
    #[inline]
    pub fn resolution(&self) -> f32 {
        self.resolution
    }

    /// World coordinates of cell (0, 0)
    #[inline]
    pub fn origin(&self) -> WorldPoint {
        self.origin
    }

    /// Distance to the nearest obstacle at grid coordinates, in grid-cell
    /// units. Out-of-bounds coordinates report 0.0 (treated as blocked).
    #[inline]
    pub fn get(&self, coord: GridCoord) -> f32 {
        if coord.x < 0 || coord.y < 0 {
            return 0.0;
        }
        let (x, y) = (coord.x as usize, coord.y as usize);
        if x >= self.width || y >= self.height {
            return 0.0;
        }
        self.values[y * self.width + x]
    }

    /// Raw distance values, row-major (for visualization consumers)
    #[inline]
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Convert grid coordinates to world coordinates (cell sample point)
    #[inline]
    pub fn grid_to_world(&self, coord: GridCoord) -> WorldPoint {
        WorldPoint::new(
            self.origin.x + coord.x as f32 * self.resolution,
            self.origin.y + coord.y as f32 * self.resolution,
        )
    }
}

/// One-dimensional squared-distance transform via the lower envelope of
/// parabolas. `f` holds input squared distances, `out` receives the
/// result; `v` and `z` are caller-provided scratch (parabola apexes and
/// envelope boundaries).
fn squared_edt_1d(f: &[f32], out: &mut [f32], v: &mut [usize], z: &mut [f32]) {
    let n = f.len();
    if n == 0 {
        return;
    }

    let mut k = 0usize;
    v[0] = 0;
    z[0] = f32::NEG_INFINITY;
    z[1] = f32::INFINITY;

    for q in 1..n {
        let fq = f[q] + (q * q) as f32;
        let s = loop {
            let p = v[k];
            let s = (fq - (f[p] + (p * p) as f32)) / (2.0 * (q - p) as f32);
            if s <= z[k] {
                // Parabola at q dominates the one at v[k]
                k -= 1;
            } else {
                break s;
            }
        };
        k += 1;
        v[k] = q;
        z[k] = s;
        z[k + 1] = f32::INFINITY;
    }

    k = 0;
    for q in 0..n {
        while z[k + 1] < q as f32 {
            k += 1;
        }
        let dq = q as f32 - v[k] as f32;
        out[q] = dq * dq + f[v[k]];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Reference implementation: minimum over all obstacle cells.
    fn brute_force(grid: &OccupancyGrid) -> Vec<f32> {
        let (w, h) = (grid.width(), grid.height());
        let obstacles: Vec<GridCoord> = (0..h as i32)
            .flat_map(|y| (0..w as i32).map(move |x| GridCoord::new(x, y)))
            .filter(|&c| grid.is_occupied(c))
            .collect();

        (0..h as i32)
            .flat_map(|y| (0..w as i32).map(move |x| GridCoord::new(x, y)))
            .map(|c| {
                obstacles
                    .iter()
                    .map(|o| {
                        let dx = (c.x - o.x) as f32;
                        let dy = (c.y - o.y) as f32;
                        (dx * dx + dy * dy).sqrt()
                    })
                    .fold(NO_OBSTACLE, f32::min)
            })
            .collect()
    }

    #[test]
    fn test_single_obstacle_distances() {
        let mut grid = OccupancyGrid::new(5, 5, 1.0).unwrap();
        grid.set_occupied(GridCoord::new(2, 2), true);
        let field = DistanceField::from_grid(&grid);

        assert_eq!(field.get(GridCoord::new(2, 2)), 0.0);
        assert!((field.get(GridCoord::new(3, 2)) - 1.0).abs() < 1e-5);
        assert!((field.get(GridCoord::new(3, 3)) - std::f32::consts::SQRT_2).abs() < 1e-5);
        assert!((field.get(GridCoord::new(4, 3)) - 5.0f32.sqrt()).abs() < 1e-5);
        assert!((field.get(GridCoord::new(0, 0)) - 8.0f32.sqrt()).abs() < 1e-5);
    }

    #[test]
    fn test_matches_brute_force() {
        let mut grid = OccupancyGrid::new(13, 9, 1.0).unwrap();
        // Scattered obstacles, including a short wall
        for x in 3..8 {
            grid.set_occupied(GridCoord::new(x, 4), true);
        }
        grid.set_occupied(GridCoord::new(0, 0), true);
        grid.set_occupied(GridCoord::new(12, 8), true);
        grid.set_occupied(GridCoord::new(10, 1), true);

        let field = DistanceField::from_grid(&grid);
        let expected = brute_force(&grid);

        for (i, (&got, &want)) in field.values().iter().zip(expected.iter()).enumerate() {
            assert!(
                (got - want).abs() < 1e-4,
                "cell {}: got {}, want {}",
                i,
                got,
                want
            );
        }
    }

    #[test]
    fn test_empty_grid_has_no_obstacle_sentinel() {
        let grid = OccupancyGrid::new(8, 8, 0.5).unwrap();
        let field = DistanceField::from_grid(&grid);
        assert!(field.values().iter().all(|&d| d == NO_OBSTACLE));
    }

    #[test]
    fn test_all_obstacle_grid_is_zero() {
        let grid =
            OccupancyGrid::from_cells(4, 4, 1.0, vec![true; 16]).unwrap();
        let field = DistanceField::from_grid(&grid);
        assert!(field.values().iter().all(|&d| d == 0.0));
    }

    #[test]
    fn test_out_of_bounds_reads_blocked() {
        let grid = OccupancyGrid::new(4, 4, 1.0).unwrap();
        let field = DistanceField::from_grid(&grid);
        assert_eq!(field.get(GridCoord::new(-1, 0)), 0.0);
        assert_eq!(field.get(GridCoord::new(0, 4)), 0.0);
    }

    #[test]
    fn test_from_points_matches_grid_on_lattice() {
        // Obstacle points placed exactly on cell sample points must give
        // the same distances as the grid transform.
        let resolution = 0.5;
        let mut grid = OccupancyGrid::new(7, 7, resolution).unwrap();
        grid.set_occupied(GridCoord::new(3, 3), true);
        grid.set_occupied(GridCoord::new(6, 0), true);
        let from_grid = DistanceField::from_grid(&grid);

        let points = vec![
            WorldPoint::new(3.0 * resolution, 3.0 * resolution),
            WorldPoint::new(6.0 * resolution, 0.0),
        ];
        let from_points =
            DistanceField::from_points(&points, 7, 7, resolution, WorldPoint::ZERO).unwrap();

        for (a, b) in from_grid.values().iter().zip(from_points.values().iter()) {
            assert!((a - b).abs() < 1e-4, "grid {} vs points {}", a, b);
        }
    }

    #[test]
    fn test_from_points_empty_list() {
        let field =
            DistanceField::from_points(&[], 3, 3, 1.0, WorldPoint::ZERO).unwrap();
        assert!(field.values().iter().all(|&d| d == NO_OBSTACLE));
    }

    #[test]
    fn test_from_points_invalid_resolution() {
        assert!(matches!(
            DistanceField::from_points(&[], 3, 3, 0.0, WorldPoint::ZERO),
            Err(SetupError::InvalidResolution { .. })
        ));
    }
}
