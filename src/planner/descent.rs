//! Greedy descent over the potential field.
//!
//! The searcher repeatedly moves to the lowest-potential motion candidate,
//! accumulating the visited positions. It terminates when the goal is
//! within one resolution unit, when a 3-slot trailing window of visited
//! cells detects a revisit (the local-minimum trap inherent to potential
//! fields), when every candidate falls off the grid, or when the
//! defensive step cap fires.

use log::{debug, trace};

use crate::core::{GridCoord, WorldPoint};
use crate::field::PotentialField;
use crate::planner::motion::MotionModel;
use crate::planner::types::{SearchResult, SearchState};

/// Trailing window of the last three visited cells.
///
/// Slots start unset and the cycle test only fires once all three are
/// filled, so the detector cannot produce a false positive during the
/// first steps of a search. A cell enters the window one step after it is
/// visited: the check runs against the window before the current cell is
/// pushed.
#[derive(Clone, Copy, Debug, Default)]
struct OscillationWindow {
    slots: [Option<GridCoord>; 3],
}

impl OscillationWindow {
    fn new() -> Self {
        Self::default()
    }

    /// True once all three slots are set and any two of them match.
    ///
    /// Matching any pair, not just consecutive slots, catches both
    /// period-1 (stuck) and period-2 (back-and-forth) cycles.
    fn detects_cycle(&self) -> bool {
        match self.slots {
            [Some(a), Some(b), Some(c)] => a == b || b == c || a == c,
            _ => false,
        }
    }

    /// Roll the window, dropping the oldest cell.
    fn push(&mut self, cell: GridCoord) {
        self.slots[0] = self.slots[1];
        self.slots[1] = self.slots[2];
        self.slots[2] = Some(cell);
    }
}

/// Greedy descent searcher over a prepared potential field.
///
/// Holds only read-only references; one field can back any number of
/// searches with different start and goal pairs.
pub struct GreedyDescent<'a> {
    field: &'a PotentialField,
    motion: &'a MotionModel,
    max_steps: usize,
}

impl<'a> GreedyDescent<'a> {
    /// Create a searcher over `field` using `motion` as the candidate set.
    pub fn new(field: &'a PotentialField, motion: &'a MotionModel, max_steps: usize) -> Self {
        Self {
            field,
            motion,
            max_steps,
        }
    }

    /// Walk downhill from `start` toward `goal`.
    ///
    /// The returned path begins exactly at `start` (the caller's position,
    /// not its cell-quantized sample point) and ends wherever the descent
    /// terminated. Inspect [`SearchResult::state`] to tell a reached goal
    /// from a trapped search.
    pub fn search(&self, start: WorldPoint, goal: WorldPoint) -> SearchResult {
        let resolution = self.field.resolution();
        let mut current = self.field.world_to_grid(start);
        let mut path_world = vec![start];
        let mut path_grid = vec![current];
        let mut window = OscillationWindow::new();
        let mut state = SearchState::Searching;
        let mut steps = 0usize;

        let mut goal_distance = start.distance(&goal);
        if goal_distance < resolution {
            trace!("[Descent] start already within one cell of goal");
            state = SearchState::GoalReached;
        }

        while state == SearchState::Searching {
            if steps >= self.max_steps {
                debug!("[Descent] step cap {} reached", self.max_steps);
                state = SearchState::StepLimitExceeded;
                break;
            }
            steps += 1;

            // Pick the lowest-potential candidate; first listed wins ties.
            // Off-grid candidates read as infinite and are never chosen
            // over an on-grid cell.
            let mut best: Option<GridCoord> = None;
            let mut best_potential = f32::INFINITY;
            for &step in self.motion.steps() {
                let candidate = current + step;
                let p = self.field.potential(candidate);
                if p < best_potential {
                    best_potential = p;
                    best = Some(candidate);
                }
            }

            let next = match best {
                Some(cell) => cell,
                None => {
                    // Every candidate was off the grid
                    debug!(
                        "[Descent] stuck at ({},{}): no in-bounds candidate",
                        current.x, current.y
                    );
                    state = SearchState::OutOfBoundsStuck;
                    break;
                }
            };

            current = next;
            let position = self.field.grid_to_world(current);
            goal_distance = position.distance(&goal);
            path_world.push(position);
            path_grid.push(current);

            if goal_distance < resolution {
                state = SearchState::GoalReached;
            } else if window.detects_cycle() {
                trace!("[Descent] oscillation window hit at ({},{})", current.x, current.y);
                state = SearchState::OscillationAborted;
            } else {
                window.push(current);
            }
        }

        debug!(
            "[Descent] finished: state={:?}, steps={}, path={} cells",
            state,
            steps,
            path_grid.len()
        );

        SearchResult {
            path_world,
            path_grid,
            state,
            steps,
        }
    }
}
