//! Obstacle-point-list potential planner.
//!
//! Same planning interface as [`GridPlanner`](crate::planner::GridPlanner),
//! but the problem domain is a continuous list of obstacle points instead
//! of a rasterized mask. The distance field comes from nearest-neighbor
//! queries against the point set; everything downstream (builder,
//! searcher) is shared with the grid variant.

use log::{debug, warn};

use crate::config::PotentialConfig;
use crate::core::{GridCoord, WorldPoint};
use crate::error::{Result, SetupError};
use crate::field::{DistanceField, FieldBuilder, PotentialField};
use crate::planner::descent::GreedyDescent;
use crate::planner::motion::MotionModel;
use crate::planner::types::{Problem, SearchResult};
use crate::planner::PotentialPlanner;

/// Potential-field planner over a continuous obstacle point list.
///
/// The field is still discretized: `width`, `height` and `resolution`
/// define the planning lattice, and obstacle distances are measured from
/// each cell's sample point to the nearest obstacle point.
pub struct ObstacleListPlanner {
    obstacles: Vec<WorldPoint>,
    width: usize,
    height: usize,
    resolution: f32,
    origin: WorldPoint,
    config: PotentialConfig,
    motion: MotionModel,
    problem: Option<Problem>,
    distance: Option<DistanceField>,
    potential: Option<PotentialField>,
}

impl ObstacleListPlanner {
    /// Create a planner over `obstacles` with a `width` x `height` lattice
    /// at `resolution` world units per cell, origin at (0, 0).
    pub fn new(
        obstacles: Vec<WorldPoint>,
        width: usize,
        height: usize,
        resolution: f32,
        config: PotentialConfig,
    ) -> Result<Self> {
        if !(resolution.is_finite() && resolution > 0.0) {
            return Err(SetupError::InvalidResolution { resolution });
        }
        Ok(Self {
            obstacles,
            width,
            height,
            resolution,
            origin: WorldPoint::ZERO,
            config,
            motion: MotionModel::default(),
            problem: None,
            distance: None,
            potential: None,
        })
    }

    /// Move the lattice origin (world position of cell (0, 0)).
    pub fn with_origin(mut self, origin: WorldPoint) -> Self {
        self.origin = origin;
        self
    }

    /// Replace the motion model.
    pub fn with_motion_model(mut self, motion: MotionModel) -> Self {
        self.motion = motion;
        self
    }

    /// The planner's tuning.
    pub fn config(&self) -> &PotentialConfig {
        &self.config
    }

    /// The potential field for the current problem, if computed.
    pub fn potential_field(&self) -> Option<&PotentialField> {
        self.potential.as_ref()
    }

    fn world_to_grid(&self, point: WorldPoint) -> GridCoord {
        let x = ((point.x - self.origin.x) / self.resolution).floor() as i32;
        let y = ((point.y - self.origin.y) / self.resolution).floor() as i32;
        GridCoord::new(x, y)
    }

    fn is_valid_coord(&self, coord: GridCoord) -> bool {
        coord.x >= 0
            && coord.y >= 0
            && (coord.x as usize) < self.width
            && (coord.y as usize) < self.height
    }
}

impl PotentialPlanner for ObstacleListPlanner {
    fn set_problem(&mut self, problem: Problem) -> Result<()> {
        self.config.validate()?;

        let start_cell = self.world_to_grid(problem.start);
        let goal_cell = self.world_to_grid(problem.goal);

        if !self.is_valid_coord(start_cell) {
            return Err(SetupError::StartOutOfBounds {
                cell: start_cell,
                width: self.width,
                height: self.height,
            });
        }
        if !self.is_valid_coord(goal_cell) {
            return Err(SetupError::GoalOutOfBounds {
                cell: goal_cell,
                width: self.width,
                height: self.height,
            });
        }
        if problem.terms.is_empty() {
            warn!("[ObstacleListPlanner] problem accepted with all potential terms disabled");
        }

        debug!(
            "[ObstacleListPlanner] problem set: start cell ({},{}), goal cell ({},{}), {} obstacle points",
            start_cell.x,
            start_cell.y,
            goal_cell.x,
            goal_cell.y,
            self.obstacles.len()
        );

        self.problem = Some(problem);
        self.potential = None;
        Ok(())
    }

    fn calc_potential_field(&mut self) -> Result<&PotentialField> {
        let problem = self.problem.ok_or(SetupError::ProblemNotSet)?;

        let distance = match self.distance.take() {
            Some(d) => d,
            None => DistanceField::from_points(
                &self.obstacles,
                self.width,
                self.height,
                self.resolution,
                self.origin,
            )?,
        };

        let builder = FieldBuilder::new(self.config.clone());
        let field = builder.build(&distance, problem.start, problem.goal, problem.terms);
        self.distance = Some(distance);
        Ok(self.potential.insert(field))
    }

    fn search_path(&self) -> Result<SearchResult> {
        let problem = self.problem.ok_or(SetupError::ProblemNotSet)?;
        let field = self.potential.as_ref().ok_or(SetupError::FieldNotComputed)?;

        let searcher = GreedyDescent::new(field, &self.motion, self.config.max_steps);
        Ok(searcher.search(problem.start, problem.goal))
    }
}
