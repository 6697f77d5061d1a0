//! Combined potential field and its builder.
//!
//! The potential field is the scalar energy surface the searcher descends:
//! high near obstacles, low near the goal. It is the elementwise sum of up
//! to three terms, each independently toggleable:
//!
//! - obstacle repulsion: piecewise function of the distance field, clamped
//! - goal attraction: linear in real-world distance to the goal
//! - start repulsion: inverse-distance push away from the start position

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::config::PotentialConfig;
use crate::core::{GridCoord, WorldPoint};
use crate::field::distance::DistanceField;

/// Which potential terms contribute to the combined field.
///
/// Disabling all three yields a degenerate all-zero field; the builder
/// logs a warning but does not treat it as an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermSelection {
    /// Attractive pull toward the goal
    pub goal_attraction: bool,
    /// Repulsive push away from the start position
    pub start_repulsion: bool,
    /// Repulsive push away from obstacles
    pub obstacle_repulsion: bool,
}

impl TermSelection {
    /// Goal attraction and obstacle repulsion, no start term. This is the
    /// standard hybrid configuration.
    pub fn hybrid() -> Self {
        Self {
            goal_attraction: true,
            start_repulsion: false,
            obstacle_repulsion: true,
        }
    }

    /// Goal attraction only (pure-attractive field).
    pub fn attractive_only() -> Self {
        Self {
            goal_attraction: true,
            start_repulsion: false,
            obstacle_repulsion: false,
        }
    }

    /// True if no term is enabled.
    pub fn is_empty(&self) -> bool {
        !(self.goal_attraction || self.start_repulsion || self.obstacle_repulsion)
    }
}

impl Default for TermSelection {
    fn default() -> Self {
        Self::hybrid()
    }
}

/// Scalar energy surface over the grid.
///
/// Values at obstacle-clamped cells never exceed the configured
/// `max_potential`; the attractive term is intentionally unclamped, so the
/// field keeps a useful gradient toward the goal even far from obstacles.
#[derive(Clone, Debug)]
pub struct PotentialField {
    /// Potential values, row-major
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

impl PotentialField {
    fn zeros(width: usize, height: usize, resolution: f32, origin: WorldPoint) -> Self {
        Self {
            values: vec![0.0; width * height],
            width,
            height,
            resolution,
            origin,
        }
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

    /// Potential at grid coordinates, or `None` if out of bounds.
    #[inline]
    pub fn get(&self, coord: GridCoord) -> Option<f32> {
        if coord.x < 0 || coord.y < 0 {
            return None;
        }
        let (x, y) = (coord.x as usize, coord.y as usize);
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.values[y * self.width + x])
    }

    /// Potential at grid coordinates, with out-of-range coordinates
    /// reading as infinite. This is the lookup rule the searcher uses for
    /// motion candidates: an off-grid cell is never preferred over any
    /// on-grid cell.
    #[inline]
    pub fn potential(&self, coord: GridCoord) -> f32 {
        self.get(coord).unwrap_or(f32::INFINITY)
    }

    /// Raw potential values, row-major (for visualization consumers)
    #[inline]
    pub fn values(&self) -> &[f32] {
        &self.values
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

    /// Build a field directly from raw values. Intended for synthetic
    /// fields in tests and benchmarks; regular callers go through
    /// [`FieldBuilder`].
    pub(crate) fn from_values(
        width: usize,
        height: usize,
        resolution: f32,
        origin: WorldPoint,
        values: Vec<f32>,
    ) -> Self {
        debug_assert_eq!(values.len(), width * height);
        Self {
            values,
            width,
            height,
            resolution,
            origin,
        }
    }
}

/// Combines distance, goal and start terms into one [`PotentialField`].
///
/// All tuning lives in the [`PotentialConfig`] passed at construction, so
/// planners with different tunings can coexist in one process.
#[derive(Clone, Debug)]
pub struct FieldBuilder {
    config: PotentialConfig,
}

impl FieldBuilder {
    /// Create a builder with the given tuning.
    pub fn new(config: PotentialConfig) -> Self {
        Self { config }
    }

    /// The tuning this builder applies.
    pub fn config(&self) -> &PotentialConfig {
        &self.config
    }

    /// Compose the combined field over the geometry of `distance`.
    ///
    /// `start` and `goal` are real-world positions; each enabled term is
    /// evaluated at every cell's sample point and summed elementwise.
    pub fn build(
        &self,
        distance: &DistanceField,
        start: WorldPoint,
        goal: WorldPoint,
        terms: TermSelection,
    ) -> PotentialField {
        let width = distance.width();
        let height = distance.height();
        let mut field =
            PotentialField::zeros(width, height, distance.resolution(), distance.origin());

        if terms.is_empty() {
            warn!(
                "[FieldBuilder] all potential terms disabled, field is all zeros \
                 and descent will wander arbitrarily"
            );
            return field;
        }

        if terms.obstacle_repulsion {
            for (value, &d) in field.values.iter_mut().zip(distance.values().iter()) {
                *value += self.repulsive_potential(d);
            }
        }

        if terms.goal_attraction || terms.start_repulsion {
            for y in 0..height {
                for x in 0..width {
                    let p = distance.grid_to_world(GridCoord::new(x as i32, y as i32));
                    let value = &mut field.values[y * width + x];
                    if terms.goal_attraction {
                        *value += self.attractive_potential(p, goal);
                    }
                    if terms.start_repulsion {
                        *value += self.start_repulsive_potential(p, start);
                    }
                }
            }
        }

        debug!(
            "[FieldBuilder] built {}x{} field (obstacle={}, goal={}, start={})",
            width, height, terms.obstacle_repulsion, terms.goal_attraction, terms.start_repulsion
        );

        field
    }

    /// Repulsive potential for a distance `d` (grid units) to the nearest
    /// obstacle.
    ///
    /// Piecewise, with the breakpoints applied in order and a final outer
    /// clamp: the middle branch can slightly exceed `max_potential` just
    /// above the lower breakpoint.
    pub fn repulsive_potential(&self, d: f32) -> f32 {
        let c = &self.config;
        let u = if d <= c.min_obstacle_distance {
            c.max_potential
        } else if d <= c.max_obstacle_distance {
            let gap = 1.0 / d - 1.0 / c.desired_distance;
            0.5 * c.repulsive_gain * gap * gap
        } else {
            0.0
        };
        u.min(c.max_potential)
    }

    /// Attractive potential at world position `p`, linear in the distance
    /// to the goal.
    pub fn attractive_potential(&self, p: WorldPoint, goal: WorldPoint) -> f32 {
        0.5 * self.config.attractive_gain * p.distance(&goal)
    }

    /// Start-repulsive potential at world position `p`. The distance is
    /// floored at `min_start_distance` to guard the singularity at the
    /// start cell itself.
    pub fn start_repulsive_potential(&self, p: WorldPoint, start: WorldPoint) -> f32 {
        let d = p.distance(&start).max(self.config.min_start_distance);
        0.5 * self.config.attractive_gain / d
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::OccupancyGrid;

    fn builder() -> FieldBuilder {
        FieldBuilder::new(PotentialConfig::default())
    }

    #[test]
    fn test_repulsive_clamped_inside_min_distance() {
        let b = builder();
        for d in [0.0, 1.0, 2.5, 5.0] {
            assert_eq!(b.repulsive_potential(d), 5.0, "d = {}", d);
        }
    }

    #[test]
    fn test_repulsive_bounded_everywhere() {
        let b = builder();
        let mut d = 0.0f32;
        while d <= 120.0 {
            let u = b.repulsive_potential(d);
            assert!((0.0..=5.0).contains(&u), "u({}) = {}", d, u);
            d += 0.05;
        }
    }

    #[test]
    fn test_repulsive_monotone_up_to_desired_distance() {
        let b = builder();
        let mut prev = b.repulsive_potential(5.01);
        let mut d = 5.1f32;
        while d <= 10.0 {
            let u = b.repulsive_potential(d);
            assert!(u <= prev, "u({}) = {} rose above {}", d, u, prev);
            prev = u;
            d += 0.1;
        }
        // Exactly zero at the desired distance
        assert!(b.repulsive_potential(10.0).abs() < 1e-6);
    }

    #[test]
    fn test_repulsive_band_edges() {
        let b = builder();
        // 0.5 * 1000 * (1/50 - 1/10)^2 = 3.2 at the outer edge of the band
        assert!((b.repulsive_potential(50.0) - 3.2).abs() < 1e-4);
        // Beyond the band the term vanishes
        assert_eq!(b.repulsive_potential(50.1), 0.0);
        assert_eq!(b.repulsive_potential(crate::field::distance::NO_OBSTACLE), 0.0);
    }

    #[test]
    fn test_attractive_zero_at_goal_and_linear() {
        let b = builder();
        let goal = WorldPoint::new(3.0, 4.0);
        assert_eq!(b.attractive_potential(goal, goal), 0.0);
        assert!((b.attractive_potential(WorldPoint::ZERO, goal) - 2.5).abs() < 1e-6);

        // Equidistant points see the same attraction
        let a = b.attractive_potential(WorldPoint::new(3.0, 0.0), goal);
        let c = b.attractive_potential(WorldPoint::new(3.0, 8.0), goal);
        assert!((a - c).abs() < 1e-6);
    }

    #[test]
    fn test_start_repulsion_guards_singularity() {
        let b = builder();
        let start = WorldPoint::new(1.0, 1.0);
        // At the start itself the distance floor applies: 0.5 * 1 / 0.1
        assert!((b.start_repulsive_potential(start, start) - 5.0).abs() < 1e-5);
        // Further out the term decays
        let far = b.start_repulsive_potential(WorldPoint::new(11.0, 1.0), start);
        assert!((far - 0.05).abs() < 1e-6);
    }

    #[test]
    fn test_build_sums_enabled_terms() {
        let mut grid = OccupancyGrid::new(12, 12, 1.0).unwrap();
        grid.set_occupied(GridCoord::new(0, 0), true);
        let distance = DistanceField::from_grid(&grid);

        let b = builder();
        let start = WorldPoint::new(2.0, 2.0);
        let goal = WorldPoint::new(9.0, 9.0);
        let all = TermSelection {
            goal_attraction: true,
            start_repulsion: true,
            obstacle_repulsion: true,
        };
        let field = b.build(&distance, start, goal, all);

        let probe = GridCoord::new(6, 3);
        let p = field.grid_to_world(probe);
        let expected = b.repulsive_potential(distance.get(probe))
            + b.attractive_potential(p, goal)
            + b.start_repulsive_potential(p, start);
        assert!((field.potential(probe) - expected).abs() < 1e-5);
    }

    #[test]
    fn test_build_obstacle_cells_hit_the_clamp() {
        let mut grid = OccupancyGrid::new(8, 8, 1.0).unwrap();
        for x in 0..8 {
            grid.set_occupied(GridCoord::new(x, 4), true);
        }
        let distance = DistanceField::from_grid(&grid);
        let field = builder().build(
            &distance,
            WorldPoint::ZERO,
            WorldPoint::ZERO,
            TermSelection {
                goal_attraction: false,
                start_repulsion: false,
                obstacle_repulsion: true,
            },
        );

        // Every cell of this small map is within the clamp band
        for &v in field.values() {
            assert_eq!(v, 5.0);
        }
    }

    #[test]
    fn test_build_all_terms_disabled_is_zero_field() {
        let grid = OccupancyGrid::new(6, 6, 1.0).unwrap();
        let distance = DistanceField::from_grid(&grid);
        let off = TermSelection {
            goal_attraction: false,
            start_repulsion: false,
            obstacle_repulsion: false,
        };
        let field = builder().build(&distance, WorldPoint::ZERO, WorldPoint::ZERO, off);
        assert!(field.values().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_potential_out_of_bounds_is_infinite() {
        let grid = OccupancyGrid::new(4, 4, 1.0).unwrap();
        let distance = DistanceField::from_grid(&grid);
        let field = builder().build(
            &distance,
            WorldPoint::ZERO,
            WorldPoint::new(2.0, 2.0),
            TermSelection::attractive_only(),
        );

        assert!(field.get(GridCoord::new(4, 0)).is_none());
        assert_eq!(field.potential(GridCoord::new(4, 0)), f32::INFINITY);
        assert_eq!(field.potential(GridCoord::new(0, -1)), f32::INFINITY);
        assert!(field.potential(GridCoord::new(3, 3)).is_finite());
    }
}
