//! Error types for problem setup and configuration.
//!
//! Search termination (oscillation, walking off the grid) is not an error;
//! it is reported through [`SearchState`](crate::planner::SearchState)
//! together with the partial path accumulated so far.

use thiserror::Error;

use crate::core::GridCoord;

/// Errors surfaced while validating a configuration or setting up a
/// planning problem. All of these fire before any field computation or
/// search begins.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SetupError {
    /// Start cell index lies outside the grid.
    #[error("start cell ({},{}) outside {width}x{height} grid", .cell.x, .cell.y)]
    StartOutOfBounds {
        /// Offending cell index.
        cell: GridCoord,
        /// Grid width in cells.
        width: usize,
        /// Grid height in cells.
        height: usize,
    },

    /// Goal cell index lies outside the grid.
    #[error("goal cell ({},{}) outside {width}x{height} grid", .cell.x, .cell.y)]
    GoalOutOfBounds {
        /// Offending cell index.
        cell: GridCoord,
        /// Grid width in cells.
        width: usize,
        /// Grid height in cells.
        height: usize,
    },

    /// The configured robot clearance cannot be honored by the repulsive
    /// band: the desired obstacle distance must cover the robot radius.
    #[error("robot radius {robot_radius} exceeds desired obstacle distance {desired_distance}")]
    InsufficientClearance {
        /// Configured robot radius in grid-cell units.
        robot_radius: f32,
        /// Configured desired obstacle distance in grid-cell units.
        desired_distance: f32,
    },

    /// Grid resolution must be a positive, finite number of world units
    /// per cell.
    #[error("grid resolution must be positive, got {resolution}")]
    InvalidResolution {
        /// Offending resolution value.
        resolution: f32,
    },

    /// A cell buffer did not match the declared grid dimensions.
    #[error("cell buffer holds {actual} cells, grid dimensions require {expected}")]
    CellCountMismatch {
        /// Cells required by width * height.
        expected: usize,
        /// Cells actually supplied.
        actual: usize,
    },

    /// A tuning parameter that must be strictly positive was not.
    #[error("{name} must be positive, got {value}")]
    NonPositiveParameter {
        /// Parameter name as it appears in the configuration.
        name: &'static str,
        /// Offending value.
        value: f32,
    },

    /// The repulsive distance band is inverted.
    #[error(
        "min_obstacle_distance {min_obstacle_distance} exceeds max_obstacle_distance {max_obstacle_distance}"
    )]
    InvalidDistanceBand {
        /// Lower edge of the repulsive band.
        min_obstacle_distance: f32,
        /// Upper edge of the repulsive band.
        max_obstacle_distance: f32,
    },

    /// An operation that requires a configured problem was called before
    /// `set_problem` succeeded.
    #[error("no planning problem has been set")]
    ProblemNotSet,

    /// `search_path` was called before `calc_potential_field`.
    #[error("potential field has not been computed for the current problem")]
    FieldNotComputed,
}

/// Convenience alias for setup-phase results.
pub type Result<T> = std::result::Result<T, SetupError>;
