use crate::common::Position;
use crate::map::Map;

/// Estimated remaining cost from a state to the goal.
///
/// A* only returns shortest paths when the estimate never exceeds the true
/// remaining distance.
pub trait Heuristic {
    fn estimate(&self, state: Position, goal: Position) -> usize;
}

/// Manhattan distance, admissible for unit-cost four-way movement.
#[derive(Debug, Clone, Copy, Default)]
pub struct Manhattan;

impl Heuristic for Manhattan {
    fn estimate(&self, state: Position, goal: Position) -> usize {
        state.0.abs_diff(goal.0) + state.1.abs_diff(goal.1)
    }
}

/// Exact remaining distance, precomputed for one goal.
#[derive(Debug, Clone)]
pub struct DistanceMap {
    goal: Position,
    distance: Vec<Vec<usize>>,
}

impl DistanceMap {
    pub fn new(map: &Map) -> Self {
        DistanceMap {
            goal: map.goal,
            distance: map.distance_map(map.goal),
        }
    }
}

impl Heuristic for DistanceMap {
    fn estimate(&self, state: Position, goal: Position) -> usize {
        debug_assert_eq!(goal, self.goal, "distance map built for another goal");
        self.distance[state.0][state.1]
    }
}

impl<H: Heuristic + ?Sized> Heuristic for &H {
    fn estimate(&self, state: Position, goal: Position) -> usize {
        (**self).estimate(state, goal)
    }
}

impl<H: Heuristic + ?Sized> Heuristic for Box<H> {
    fn estimate(&self, state: Position, goal: Position) -> usize {
        (**self).estimate(state, goal)
    }
}
