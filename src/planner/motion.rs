//! Motion model: the candidate steps the searcher may take.

use serde::{Deserialize, Serialize};

use crate::core::GridCoord;

/// Ordered set of candidate relative steps, in cell units.
///
/// Order matters: when several candidates share the minimal potential, the
/// first one listed wins. Swapping the order changes which of two equally
/// good cells a search visits, and with it where a trapped search ends up.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MotionModel {
    steps: Vec<GridCoord>,
}

impl MotionModel {
    /// The 8-connected neighborhood: cardinal steps first, then diagonals.
    pub fn eight_connected() -> Self {
        Self {
            steps: vec![
                GridCoord::new(1, 0),
                GridCoord::new(0, 1),
                GridCoord::new(-1, 0),
                GridCoord::new(0, -1),
                GridCoord::new(-1, -1),
                GridCoord::new(-1, 1),
                GridCoord::new(1, -1),
                GridCoord::new(1, 1),
            ],
        }
    }

    /// The 4-connected neighborhood (no diagonals).
    pub fn four_connected() -> Self {
        Self {
            steps: vec![
                GridCoord::new(1, 0),
                GridCoord::new(0, 1),
                GridCoord::new(-1, 0),
                GridCoord::new(0, -1),
            ],
        }
    }

    /// A custom candidate set. The given order is the tie-break order.
    pub fn custom(steps: Vec<GridCoord>) -> Self {
        Self { steps }
    }

    /// Candidate steps, in tie-break order.
    #[inline]
    pub fn steps(&self) -> &[GridCoord] {
        &self.steps
    }

    /// Number of candidate steps.
    #[inline]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// True if the model has no candidates.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl Default for MotionModel {
    fn default() -> Self {
        Self::eight_connected()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eight_connected_order() {
        let model = MotionModel::eight_connected();
        assert_eq!(model.len(), 8);
        // Tie-break order starts with the +X cardinal step
        assert_eq!(model.steps()[0], GridCoord::new(1, 0));
        assert_eq!(model.steps()[7], GridCoord::new(1, 1));
    }

    #[test]
    fn test_four_connected() {
        let model = MotionModel::four_connected();
        assert_eq!(model.len(), 4);
        assert!(model.steps().iter().all(|s| s.x.abs() + s.y.abs() == 1));
    }

    #[test]
    fn test_custom() {
        let model = MotionModel::custom(vec![GridCoord::new(-1, 0)]);
        assert_eq!(model.len(), 1);
        assert!(!model.is_empty());
    }
}
