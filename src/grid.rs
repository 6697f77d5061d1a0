//! Binary occupancy grid.
//!
//! The grid is the planner's only view of the world: a rectangular mask of
//! free and obstacle cells plus the spatial resolution tying cell indices
//! to real-world coordinates. Callers build it up front (typically from an
//! image or a map export) and hand it to the planner read-only.

use crate::core::{GridCoord, WorldPoint};
use crate::error::{Result, SetupError};

/// Binary occupancy mask over a regular 2D grid.
///
/// The grid uses a coordinate system where:
/// - Cell (0, 0) sits at `origin` in world coordinates
/// - Positive X is to the right, positive Y is up
/// - Cell (x, y) is the sample point at `origin + (x, y) * resolution`
///
/// Cells are sample points rather than areas: converting a cell index back
/// to world coordinates yields the lattice point itself, not a cell
/// center. Goal-distance thresholds in the searcher rely on this.
#[derive(Clone, Debug, PartialEq)]
pub struct OccupancyGrid {
    /// Obstacle flags, row-major (index = y * width + x)
    occupied: Vec<bool>,
    /// Grid width in cells
    width: usize,
    /// Grid height in cells
    height: usize,
    /// Resolution in world units per cell
    resolution: f32,
    /// World coordinates of cell (0, 0)
    origin: WorldPoint,
}

impl OccupancyGrid {
    /// Create an all-free grid with the given dimensions.
    ///
    /// Fails with [`SetupError::InvalidResolution`] unless `resolution`
    /// is positive and finite.
    pub fn new(width: usize, height: usize, resolution: f32) -> Result<Self> {
        Self::with_origin(width, height, resolution, WorldPoint::ZERO)
    }

    /// Create an all-free grid whose cell (0, 0) sits at `origin`.
    pub fn with_origin(
        width: usize,
        height: usize,
        resolution: f32,
        origin: WorldPoint,
    ) -> Result<Self> {
        if !(resolution.is_finite() && resolution > 0.0) {
            return Err(SetupError::InvalidResolution { resolution });
        }
        Ok(Self {
            occupied: vec![false; width * height],
            width,
            height,
            resolution,
            origin,
        })
    }

    /// Create a grid from an existing row-major obstacle mask.
    ///
    /// `occupied[y * width + x]` is true for obstacle cells. Fails if the
    /// buffer length does not match the dimensions.
    pub fn from_cells(
        width: usize,
        height: usize,
        resolution: f32,
        occupied: Vec<bool>,
    ) -> Result<Self> {
        let mut grid = Self::new(width, height, resolution)?;
        if occupied.len() != width * height {
            return Err(SetupError::CellCountMismatch {
                expected: width * height,
                actual: occupied.len(),
            });
        }
        grid.occupied = occupied;
        Ok(grid)
    }

    /// Grid width in cells
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Grid height in cells
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

    /// Total number of cells
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.width * self.height
    }

    /// Check if grid coordinates are within bounds
    #[inline]
    pub fn is_valid_coord(&self, coord: GridCoord) -> bool {
        coord.x >= 0
            && coord.y >= 0
            && (coord.x as usize) < self.width
            && (coord.y as usize) < self.height
    }

    /// Convert grid coordinates to flat array index
    #[inline]
    pub fn coord_to_index(&self, coord: GridCoord) -> Option<usize> {
        if self.is_valid_coord(coord) {
            Some(coord.y as usize * self.width + coord.x as usize)
        } else {
            None
        }
    }

    /// Check whether a cell is an obstacle.
    ///
    /// Out-of-bounds coordinates report occupied, so that code probing
    /// past the edge of the map treats the outside as blocked.
    #[inline]
    pub fn is_occupied(&self, coord: GridCoord) -> bool {
        self.coord_to_index(coord)
            .map(|i| self.occupied[i])
            .unwrap_or(true)
    }

    /// Mark a cell as obstacle or free.
    ///
    /// Returns false if the coordinate is out of bounds. Intended for the
    /// construction phase only; the planner never mutates the grid.
    pub fn set_occupied(&mut self, coord: GridCoord, occupied: bool) -> bool {
        match self.coord_to_index(coord) {
            Some(i) => {
                self.occupied[i] = occupied;
                true
            }
            None => false,
        }
    }

    /// Raw obstacle mask, row-major
    #[inline]
    pub fn cells(&self) -> &[bool] {
        &self.occupied
    }

    /// Convert world coordinates to grid coordinates
    #[inline]
    pub fn world_to_grid(&self, point: WorldPoint) -> GridCoord {
        let x = ((point.x - self.origin.x) / self.resolution).floor() as i32;
        let y = ((point.y - self.origin.y) / self.resolution).floor() as i32;
        GridCoord::new(x, y)
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
