use std::collections::HashSet;
use std::fmt;

use crate::map::Map;

/// A cell coordinate, `(row, col)`.
pub type Position = (usize, usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Up,
    Down,
    Left,
    Right,
}

impl Action {
    /// Expansion order. Frontier insertion order, and with it every tie-break,
    /// depends on this.
    pub const ALL: [Action; 4] = [Action::Up, Action::Down, Action::Left, Action::Right];

    /// Cell reached by taking this action from `from`, or `None` when it would
    /// leave the non-negative quadrant.
    pub fn apply(self, from: Position) -> Option<Position> {
        let (row, col) = from;
        match self {
            Action::Up => Some((row.checked_sub(1)?, col)),
            Action::Down => Some((row + 1, col)),
            Action::Left => Some((row, col.checked_sub(1)?)),
            Action::Right => Some((row, col + 1)),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::Up => "up",
            Action::Down => "down",
            Action::Left => "left",
            Action::Right => "right",
        };
        f.write_str(name)
    }
}

/// Actions and the cells they lead to, ordered start to goal.
/// The start cell itself is not part of `path`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    pub actions: Vec<Action>,
    pub path: Vec<Position>,
}

impl Solution {
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn contains(&self, position: Position) -> bool {
        self.path.contains(&position)
    }

    /// Check the solution is a legal walk from the map's start to its goal.
    pub fn verify(&self, map: &Map) -> bool {
        if self.actions.len() != self.path.len() {
            return false;
        }

        let mut seen = HashSet::new();
        let mut current = map.start;
        for (&action, &next) in self.actions.iter().zip(&self.path) {
            if action.apply(current) != Some(next) || !map.in_bounds(next) || map.is_wall(next) {
                return false;
            }
            // A path revisiting a cell is never produced by the solver.
            if next == map.start || !seen.insert(next) {
                return false;
            }
            current = next;
        }

        current == map.goal
    }
}
