//! Scalar fields derived from the occupancy grid.
//!
//! Two stages, computed strictly forward from the grid:
//!
//! - [`DistanceField`]: exact Euclidean distance to the nearest obstacle
//! - [`PotentialField`]: combined repulsive/attractive energy surface,
//!   composed by [`FieldBuilder`]

pub mod distance;
pub mod potential;

pub use distance::{DistanceField, NO_OBSTACLE};
pub use potential::{FieldBuilder, PotentialField, TermSelection};
