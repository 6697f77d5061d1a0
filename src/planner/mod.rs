//! Potential-field planners.
//!
//! The [`PotentialPlanner`] trait fixes the planning life cycle:
//!
//! 1. [`set_problem`](PotentialPlanner::set_problem) validates start and
//!    goal against the problem domain (a configuration error halts here,
//!    before any field computation),
//! 2. [`calc_potential_field`](PotentialPlanner::calc_potential_field)
//!    derives the energy surface,
//! 3. [`search_path`](PotentialPlanner::search_path) runs greedy descent
//!    and always yields a best-effort path plus a terminal state tag.
//!
//! Two variants implement it: [`GridPlanner`] over a binary occupancy
//! grid, and [`ObstacleListPlanner`] over a continuous obstacle point
//! list. Both share the [`GreedyDescent`] searcher; they differ only in
//! how the distance field is derived.
//!
//! ## Example
//!
//! ```rust,no_run
//! use kshetra_nav::core::WorldPoint;
//! use kshetra_nav::grid::OccupancyGrid;
//! use kshetra_nav::config::PotentialConfig;
//! use kshetra_nav::planner::{GridPlanner, PotentialPlanner, Problem};
//!
//! # fn main() -> Result<(), kshetra_nav::error::SetupError> {
//! let grid = OccupancyGrid::new(200, 200, 0.05)?;
//! let mut planner = GridPlanner::new(&grid, PotentialConfig::default());
//!
//! planner.set_problem(Problem::new(
//!     WorldPoint::new(0.5, 0.5),
//!     WorldPoint::new(8.0, 6.0),
//! ))?;
//! planner.calc_potential_field()?;
//!
//! let result = planner.search_path()?;
//! if result.is_goal_reached() {
//!     println!("reached goal in {} steps", result.steps);
//! }
//! # Ok(())
//! # }
//! ```

pub mod descent;
pub mod grid;
pub mod motion;
pub mod obstacles;
pub mod types;

pub use descent::GreedyDescent;
pub use grid::GridPlanner;
pub use motion::MotionModel;
pub use obstacles::ObstacleListPlanner;
pub use types::{Problem, SearchResult, SearchState};

use crate::error::Result;
use crate::field::PotentialField;

/// Common interface over the planner variants.
///
/// Implementations keep no shared mutable state beyond their read-only
/// problem-domain handle; the field computed in step 2 may back any
/// number of searches.
pub trait PotentialPlanner {
    /// Validate and store a planning problem.
    ///
    /// Fails without side effects if the start or goal cell falls outside
    /// the domain, or if the configuration is inconsistent. A previously
    /// computed potential field is invalidated on success.
    fn set_problem(&mut self, problem: Problem) -> Result<()>;

    /// Compute the combined potential field for the current problem.
    fn calc_potential_field(&mut self) -> Result<&PotentialField>;

    /// Run greedy descent over the computed field.
    ///
    /// Always returns the accumulated path together with the terminal
    /// [`SearchState`]; a trapped search is an expected outcome, not an
    /// error.
    fn search_path(&self) -> Result<SearchResult>;
}
