//! Occupancy-grid-backed potential planner.

use log::{debug, warn};

use crate::config::PotentialConfig;
use crate::error::{Result, SetupError};
use crate::field::{DistanceField, FieldBuilder, PotentialField};
use crate::grid::OccupancyGrid;
use crate::planner::descent::GreedyDescent;
use crate::planner::motion::MotionModel;
use crate::planner::types::{Problem, SearchResult};
use crate::planner::PotentialPlanner;

/// Potential-field planner over a binary occupancy grid.
///
/// Borrows the grid read-only; the distance field is computed once and
/// reused across problems on the same grid, while the potential field is
/// rebuilt per problem (it depends on start, goal and term selection).
pub struct GridPlanner<'a> {
    grid: &'a OccupancyGrid,
    config: PotentialConfig,
    motion: MotionModel,
    problem: Option<Problem>,
    distance: Option<DistanceField>,
    potential: Option<PotentialField>,
}

impl<'a> GridPlanner<'a> {
    /// Create a planner over `grid` with the default 8-connected motion
    /// model.
    pub fn new(grid: &'a OccupancyGrid, config: PotentialConfig) -> Self {
        Self {
            grid,
            config,
            motion: MotionModel::default(),
            problem: None,
            distance: None,
            potential: None,
        }
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

    /// The candidate step set used by the searcher.
    pub fn motion_model(&self) -> &MotionModel {
        &self.motion
    }

    /// The distance field, if one has been computed.
    pub fn distance_field(&self) -> Option<&DistanceField> {
        self.distance.as_ref()
    }

    /// The potential field for the current problem, if computed.
    pub fn potential_field(&self) -> Option<&PotentialField> {
        self.potential.as_ref()
    }
}

impl PotentialPlanner for GridPlanner<'_> {
    fn set_problem(&mut self, problem: Problem) -> Result<()> {
        self.config.validate()?;

        let (width, height) = (self.grid.width(), self.grid.height());
        let start_cell = self.grid.world_to_grid(problem.start);
        let goal_cell = self.grid.world_to_grid(problem.goal);

        if !self.grid.is_valid_coord(start_cell) {
            return Err(SetupError::StartOutOfBounds {
                cell: start_cell,
                width,
                height,
            });
        }
        if !self.grid.is_valid_coord(goal_cell) {
            return Err(SetupError::GoalOutOfBounds {
                cell: goal_cell,
                width,
                height,
            });
        }
        if problem.terms.is_empty() {
            warn!("[GridPlanner] problem accepted with all potential terms disabled");
        }

        debug!(
            "[GridPlanner] problem set: start cell ({},{}), goal cell ({},{})",
            start_cell.x, start_cell.y, goal_cell.x, goal_cell.y
        );

        self.problem = Some(problem);
        // A new problem invalidates the field but not the grid-derived
        // distance transform
        self.potential = None;
        Ok(())
    }

    fn calc_potential_field(&mut self) -> Result<&PotentialField> {
        let problem = self.problem.ok_or(SetupError::ProblemNotSet)?;

        let distance = self
            .distance
            .get_or_insert_with(|| DistanceField::from_grid(self.grid));

        let builder = FieldBuilder::new(self.config.clone());
        let field = builder.build(distance, problem.start, problem.goal, problem.terms);
        Ok(self.potential.insert(field))
    }

    fn search_path(&self) -> Result<SearchResult> {
        let problem = self.problem.ok_or(SetupError::ProblemNotSet)?;
        let field = self.potential.as_ref().ok_or(SetupError::FieldNotComputed)?;

        let searcher = GreedyDescent::new(field, &self.motion, self.config.max_steps);
        Ok(searcher.search(problem.start, problem.goal))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{GridCoord, WorldPoint};
    use crate::field::TermSelection;
    use crate::planner::types::SearchState;

    #[test]
    fn test_rejects_start_one_past_last_index() {
        let grid = OccupancyGrid::new(10, 10, 1.0).unwrap();
        let mut planner = GridPlanner::new(&grid, PotentialConfig::default());

        // x index == width is out of range by exactly one cell
        let err = planner
            .set_problem(Problem::new(
                WorldPoint::new(10.0, 5.0),
                WorldPoint::new(5.0, 5.0),
            ))
            .unwrap_err();
        assert_eq!(
            err,
            SetupError::StartOutOfBounds {
                cell: GridCoord::new(10, 5),
                width: 10,
                height: 10,
            }
        );
    }

    #[test]
    fn test_rejects_goal_out_of_bounds() {
        let grid = OccupancyGrid::new(10, 10, 1.0).unwrap();
        let mut planner = GridPlanner::new(&grid, PotentialConfig::default());

        let err = planner
            .set_problem(Problem::new(
                WorldPoint::new(5.0, 5.0),
                WorldPoint::new(5.0, -0.5),
            ))
            .unwrap_err();
        assert!(matches!(err, SetupError::GoalOutOfBounds { .. }));
    }

    #[test]
    fn test_rejects_insufficient_clearance_before_fields() {
        let grid = OccupancyGrid::new(10, 10, 1.0).unwrap();
        let config = PotentialConfig {
            robot_radius: 12.0,
            ..PotentialConfig::default()
        };
        let mut planner = GridPlanner::new(&grid, config);

        let err = planner
            .set_problem(Problem::new(
                WorldPoint::new(1.0, 1.0),
                WorldPoint::new(8.0, 8.0),
            ))
            .unwrap_err();
        assert!(matches!(err, SetupError::InsufficientClearance { .. }));
        assert!(planner.distance_field().is_none());
    }

    #[test]
    fn test_operations_out_of_order() {
        let grid = OccupancyGrid::new(10, 10, 1.0).unwrap();
        let mut planner = GridPlanner::new(&grid, PotentialConfig::default());

        assert_eq!(
            planner.calc_potential_field().unwrap_err(),
            SetupError::ProblemNotSet
        );
        assert_eq!(planner.search_path().unwrap_err(), SetupError::ProblemNotSet);

        planner
            .set_problem(Problem::new(
                WorldPoint::new(1.0, 1.0),
                WorldPoint::new(8.0, 8.0),
            ))
            .unwrap();
        assert_eq!(
            planner.search_path().unwrap_err(),
            SetupError::FieldNotComputed
        );
    }

    #[test]
    fn test_full_pipeline_reaches_goal() {
        // Open 60x60 map with a single obstacle tucked in a corner; the
        // straight run from start to goal stays far enough away that the
        // attractive slope dominates everywhere along it.
        let mut grid = OccupancyGrid::new(60, 60, 1.0).unwrap();
        grid.set_occupied(GridCoord::new(0, 0), true);

        let mut planner = GridPlanner::new(&grid, PotentialConfig::default());
        planner
            .set_problem(Problem::new(
                WorldPoint::new(30.0, 30.0),
                WorldPoint::new(50.0, 50.0),
            ))
            .unwrap();
        planner.calc_potential_field().unwrap();

        let result = planner.search_path().unwrap();
        assert_eq!(result.state, SearchState::GoalReached);
        assert_eq!(result.path_world[0], WorldPoint::new(30.0, 30.0));
        assert!(result.last_position().unwrap().distance(&WorldPoint::new(50.0, 50.0)) < 1.0);
    }

    #[test]
    fn test_distance_field_reused_across_problems() {
        let mut grid = OccupancyGrid::new(40, 40, 1.0).unwrap();
        grid.set_occupied(GridCoord::new(0, 39), true);
        let mut planner = GridPlanner::new(&grid, PotentialConfig::default());

        planner
            .set_problem(Problem::with_terms(
                WorldPoint::new(5.0, 5.0),
                WorldPoint::new(30.0, 5.0),
                TermSelection::attractive_only(),
            ))
            .unwrap();
        planner.calc_potential_field().unwrap();
        let first = planner.search_path().unwrap();
        assert_eq!(first.state, SearchState::GoalReached);

        let distance_ptr = planner.distance_field().unwrap().values().as_ptr();

        // Second problem on the same grid: the transform is not redone
        planner
            .set_problem(Problem::with_terms(
                WorldPoint::new(30.0, 30.0),
                WorldPoint::new(5.0, 30.0),
                TermSelection::attractive_only(),
            ))
            .unwrap();
        assert!(planner.potential_field().is_none());
        planner.calc_potential_field().unwrap();
        let second = planner.search_path().unwrap();
        assert_eq!(second.state, SearchState::GoalReached);

        assert_eq!(
            planner.distance_field().unwrap().values().as_ptr(),
            distance_ptr
        );
    }
}
