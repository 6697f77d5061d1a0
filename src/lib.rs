//! # Kshetra-Nav: Potential-Field Path Planning
//!
//! A local path planner for indoor robot navigation over 2D occupancy
//! grids. The planner turns the map into a scalar energy surface (high
//! near obstacles, low near the goal) and follows it downhill with a
//! bounded greedy walk.
//!
//! ## Features
//!
//! - **Exact distance transform**: Euclidean distance to the nearest
//!   obstacle for every free cell, not a chamfer approximation
//! - **Composable field terms**: obstacle repulsion, goal attraction and
//!   start repulsion, each independently toggleable
//! - **Trap detection**: greedy descent aborts on local-minimum
//!   oscillation instead of spinning forever
//! - **Two problem domains**: rasterized occupancy grids and continuous
//!   obstacle point lists behind one planner interface
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use kshetra_nav::config::PotentialConfig;
//! use kshetra_nav::core::{GridCoord, WorldPoint};
//! use kshetra_nav::grid::OccupancyGrid;
//! use kshetra_nav::planner::{GridPlanner, PotentialPlanner, Problem};
//!
//! # fn main() -> Result<(), kshetra_nav::error::SetupError> {
//! let mut grid = OccupancyGrid::new(120, 120, 0.05)?;
//! for x in 40..80 {
//!     grid.set_occupied(GridCoord::new(x, 60), true);
//! }
//!
//! let mut planner = GridPlanner::new(&grid, PotentialConfig::default());
//! planner.set_problem(Problem::new(
//!     WorldPoint::new(1.0, 1.0),
//!     WorldPoint::new(4.5, 5.0),
//! ))?;
//! planner.calc_potential_field()?;
//!
//! let result = planner.search_path()?;
//! println!("state: {:?}, {} waypoints", result.state, result.path_world.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## Data Flow
//!
//! Each stage is a pure function of the previous one; nothing is mutated
//! after construction, so fields can back any number of searches.
//!
//! ```text
//! ┌───────────────┐   exact EDT   ┌───────────────┐
//! │ OccupancyGrid │──────────────►│ DistanceField │
//! └───────────────┘               └───────┬───────┘
//!                                         │ FieldBuilder
//!                                         │ (+ goal / start terms)
//!                                         ▼
//!                                 ┌────────────────┐
//!                                 │ PotentialField │
//!                                 └───────┬────────┘
//!                                         │ GreedyDescent
//!                                         ▼
//!                                 ┌────────────────┐
//!                                 │  SearchResult  │
//!                                 │ (path + state) │
//!                                 └────────────────┘
//! ```
//!
//! ## Limits
//!
//! Potential-field descent is a local method: it offers no guarantee of
//! reaching the goal, and a trapped search ends in
//! [`SearchState::OscillationAborted`](planner::SearchState) with the
//! partial path. Escaping local minima (random walks, replanning with a
//! perturbed field) is the caller's concern.

pub mod config;
pub mod core;
pub mod error;
pub mod field;
pub mod grid;
pub mod planner;

pub use crate::config::{ConfigFileError, PotentialConfig};
pub use crate::core::{GridCoord, WorldPoint};
pub use crate::error::SetupError;
pub use crate::field::{DistanceField, FieldBuilder, PotentialField, TermSelection};
pub use crate::grid::OccupancyGrid;
pub use crate::planner::{
    GreedyDescent, GridPlanner, MotionModel, ObstacleListPlanner, PotentialPlanner, Problem,
    SearchResult, SearchState,
};
