//! Problem description and search result types.

use serde::{Deserialize, Serialize};

use crate::core::{GridCoord, WorldPoint};
use crate::field::TermSelection;

/// One planning problem: where to start, where to go, and which potential
/// terms shape the field.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Problem {
    /// Start position in world coordinates
    pub start: WorldPoint,
    /// Goal position in world coordinates
    pub goal: WorldPoint,
    /// Which potential terms are enabled
    pub terms: TermSelection,
}

impl Problem {
    /// Create a problem with the standard hybrid term selection.
    pub fn new(start: WorldPoint, goal: WorldPoint) -> Self {
        Self {
            start,
            goal,
            terms: TermSelection::default(),
        }
    }

    /// Create a problem with an explicit term selection.
    pub fn with_terms(start: WorldPoint, goal: WorldPoint, terms: TermSelection) -> Self {
        Self { start, goal, terms }
    }
}

/// State of the greedy descent state machine.
///
/// `Searching` is the transient state; every returned
/// [`SearchResult`] carries one of the terminal states.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchState {
    /// Descent in progress (never returned to callers)
    Searching,
    /// The path reached within one resolution unit of the goal
    GoalReached,
    /// The trailing window detected a revisited cell: the search is
    /// trapped in a local minimum
    OscillationAborted,
    /// Every motion candidate fell outside the grid
    OutOfBoundsStuck,
    /// The defensive step cap fired before any other terminal condition
    StepLimitExceeded,
}

impl SearchState {
    /// True for every state except `Searching`.
    pub fn is_terminal(self) -> bool {
        self != SearchState::Searching
    }
}

/// Outcome of one greedy descent.
///
/// The accumulated path is the result regardless of how the search ended;
/// callers distinguish success from a trapped search by inspecting
/// [`state`](Self::state).
#[derive(Clone, Debug)]
pub struct SearchResult {
    /// Visited positions in world coordinates, starting exactly at the
    /// start position handed to `set_problem`
    pub path_world: Vec<WorldPoint>,
    /// Visited cells in grid coordinates, parallel to `path_world`
    pub path_grid: Vec<GridCoord>,
    /// Terminal state of the search
    pub state: SearchState,
    /// Number of descent steps taken
    pub steps: usize,
}

impl SearchResult {
    /// True if the search ended at the goal.
    pub fn is_goal_reached(&self) -> bool {
        self.state == SearchState::GoalReached
    }

    /// Path length in cells visited.
    pub fn length_cells(&self) -> usize {
        self.path_grid.len()
    }

    /// Path length in world units (sum of segment lengths).
    pub fn length_world(&self) -> f32 {
        if self.path_world.len() < 2 {
            return 0.0;
        }
        let mut total = 0.0;
        for i in 1..self.path_world.len() {
            total += self.path_world[i - 1].distance(&self.path_world[i]);
        }
        total
    }

    /// The last visited position, if any.
    pub fn last_position(&self) -> Option<WorldPoint> {
        self.path_world.last().copied()
    }
}
