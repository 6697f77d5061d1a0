//! Fundamental coordinate types shared by every planning stage.

pub mod point;

pub use point::{GridCoord, WorldPoint};
