//! Planner configuration.
//!
//! All tuning constants of the potential field and the descent loop live
//! in one explicit struct passed to the planner at construction, so
//! several problems with different tunings can coexist in one process.
//! Distances are expressed in grid-cell units.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::{Result, SetupError};

mod defaults {
    pub(super) fn attractive_gain() -> f32 {
        1.0
    }
    pub(super) fn repulsive_gain() -> f32 {
        1000.0
    }
    pub(super) fn min_obstacle_distance() -> f32 {
        5.0
    }
    pub(super) fn desired_distance() -> f32 {
        10.0
    }
    pub(super) fn max_obstacle_distance() -> f32 {
        50.0
    }
    pub(super) fn max_potential() -> f32 {
        5.0
    }
    pub(super) fn min_start_distance() -> f32 {
        0.1
    }
    pub(super) fn max_steps() -> usize {
        100_000
    }
}

/// Tuning for the potential field terms and the descent loop.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PotentialConfig {
    /// Gain of the attractive (goal) term, also reused by the
    /// start-repulsive term
    #[serde(default = "defaults::attractive_gain")]
    pub attractive_gain: f32,

    /// Gain of the obstacle-repulsive term
    #[serde(default = "defaults::repulsive_gain")]
    pub repulsive_gain: f32,

    /// At or below this obstacle distance (cells) the repulsive term is
    /// clamped to `max_potential`
    #[serde(default = "defaults::min_obstacle_distance")]
    pub min_obstacle_distance: f32,

    /// Obstacle distance (cells) at which the repulsive term crosses zero
    #[serde(default = "defaults::desired_distance")]
    pub desired_distance: f32,

    /// Beyond this obstacle distance (cells) the repulsive term vanishes
    #[serde(default = "defaults::max_obstacle_distance")]
    pub max_obstacle_distance: f32,

    /// Upper clamp of the repulsive term
    #[serde(default = "defaults::max_potential")]
    pub max_potential: f32,

    /// Distance floor (world units) guarding the start-repulsive
    /// singularity
    #[serde(default = "defaults::min_start_distance")]
    pub min_start_distance: f32,

    /// Robot radius / clearance requirement (cells). Must not exceed
    /// `desired_distance`; checked at problem setup
    #[serde(default)]
    pub robot_radius: f32,

    /// Defensive cap on descent steps, guaranteeing termination even on a
    /// field that evades the oscillation detector
    #[serde(default = "defaults::max_steps")]
    pub max_steps: usize,
}

impl Default for PotentialConfig {
    fn default() -> Self {
        Self {
            attractive_gain: defaults::attractive_gain(),
            repulsive_gain: defaults::repulsive_gain(),
            min_obstacle_distance: defaults::min_obstacle_distance(),
            desired_distance: defaults::desired_distance(),
            max_obstacle_distance: defaults::max_obstacle_distance(),
            max_potential: defaults::max_potential(),
            min_start_distance: defaults::min_start_distance(),
            robot_radius: 0.0,
            max_steps: defaults::max_steps(),
        }
    }
}

impl PotentialConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check the configuration for inconsistencies.
    ///
    /// Planners call this from `set_problem`, before any field is built.
    pub fn validate(&self) -> Result<()> {
        let positive: [(&'static str, f32); 6] = [
            ("attractive_gain", self.attractive_gain),
            ("repulsive_gain", self.repulsive_gain),
            ("min_obstacle_distance", self.min_obstacle_distance),
            ("desired_distance", self.desired_distance),
            ("max_potential", self.max_potential),
            ("min_start_distance", self.min_start_distance),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(SetupError::NonPositiveParameter { name, value });
            }
        }
        if self.max_obstacle_distance < self.min_obstacle_distance {
            return Err(SetupError::InvalidDistanceBand {
                min_obstacle_distance: self.min_obstacle_distance,
                max_obstacle_distance: self.max_obstacle_distance,
            });
        }
        if self.robot_radius > self.desired_distance {
            return Err(SetupError::InsufficientClearance {
                robot_radius: self.robot_radius,
                desired_distance: self.desired_distance,
            });
        }
        if self.max_steps == 0 {
            return Err(SetupError::NonPositiveParameter {
                name: "max_steps",
                value: 0.0,
            });
        }
        Ok(())
    }

    /// Load configuration from a YAML file.
    ///
    /// Parses the file and validates the configuration. Missing keys fall
    /// back to their defaults.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> std::result::Result<Self, ConfigFileError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Load configuration from a YAML string.
    pub fn from_yaml_str(yaml: &str) -> std::result::Result<Self, ConfigFileError> {
        let config: PotentialConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }
}

/// Errors that can occur when loading a YAML configuration.
#[derive(Error, Debug)]
pub enum ConfigFileError {
    /// IO error reading the file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// YAML parsing error.
    #[error("YAML parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
    /// Configuration validation failed.
    #[error("config validation error: {0}")]
    Validation(#[from] SetupError),
}
