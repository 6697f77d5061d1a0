//! Point and coordinate types for the planning grid.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

/// Grid coordinates (integer cell indices)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct GridCoord {
    /// X coordinate (column index)
    pub x: i32,
    /// Y coordinate (row index)
    pub y: i32,
}

impl GridCoord {
    /// Create a new grid coordinate
    #[inline]
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl Add for GridCoord {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        GridCoord::new(self.x + other.x, self.y + other.y)
    }
}

impl Sub for GridCoord {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        GridCoord::new(self.x - other.x, self.y - other.y)
    }
}

/// World coordinates (real-world units, f32)
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct WorldPoint {
    /// X coordinate in world units
    pub x: f32,
    /// Y coordinate in world units
    pub y: f32,
}

impl WorldPoint {
    /// Create a new world point
    #[inline]
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Zero point (origin)
    pub const ZERO: WorldPoint = WorldPoint { x: 0.0, y: 0.0 };

    /// Euclidean distance to another point
    #[inline]
    pub fn distance(&self, other: &WorldPoint) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Squared distance (faster, avoids sqrt)
    #[inline]
    pub fn distance_squared(&self, other: &WorldPoint) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }
}

impl Add for WorldPoint {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        WorldPoint::new(self.x + other.x, self.y + other.y)
    }
}

impl Sub for WorldPoint {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        WorldPoint::new(self.x - other.x, self.y - other.y)
    }
}
