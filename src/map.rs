use std::collections::VecDeque;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use tracing::debug;

use crate::common::{Action, Position};
use crate::error::{Error, Result};

#[derive(Debug, Clone)]
pub struct Tile {
    passable: bool,
    pub neighbors: Vec<(Action, Position)>, // Accessible neighbors, in expansion order
}

impl Tile {
    pub fn is_passable(&self) -> bool {
        self.passable
    }
}

/// Immutable maze grid: wall bitmap plus the unique start and goal cells.
#[derive(Debug, Clone)]
pub struct Map {
    pub height: usize,
    pub width: usize,
    pub grid: Vec<Vec<Tile>>,
    pub start: Position,
    pub goal: Position,
}

impl Map {
    /// Build a map from a wall bitmap (`true` is a wall).
    ///
    /// Rows must share one width, and both start and goal must be free,
    /// in-bounds cells. Start and goal may coincide.
    pub fn new(walls: Vec<Vec<bool>>, start: Position, goal: Position) -> Result<Self> {
        let height = walls.len();
        let width = walls.first().map_or(0, Vec::len);
        if height == 0 || width == 0 {
            return Err(Error::InvalidMaze("maze has no cells".to_string()));
        }
        if let Some(row) = walls.iter().position(|row| row.len() != width) {
            return Err(Error::InvalidMaze(format!(
                "row {row} has width {}, expected {width}",
                walls[row].len()
            )));
        }

        let grid: Vec<Vec<Tile>> = walls
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|wall| Tile {
                        passable: !wall,
                        neighbors: Vec::new(),
                    })
                    .collect()
            })
            .collect();

        let mut map = Map {
            height,
            width,
            grid,
            start,
            goal,
        };

        for (name, cell) in [("start", start), ("goal", goal)] {
            if !map.in_bounds(cell) {
                return Err(Error::InvalidMaze(format!(
                    "{name} {cell:?} lies outside the {height}x{width} grid"
                )));
            }
            if !map.is_passable(cell) {
                return Err(Error::InvalidMaze(format!("{name} {cell:?} is a wall")));
            }
        }

        map.initialize_neighbors();
        Ok(map)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let map: Map = contents.parse()?;
        debug!(
            "loaded {}x{} maze from {}",
            map.height,
            map.width,
            path.display()
        );
        Ok(map)
    }

    fn initialize_neighbors(&mut self) {
        for x in 0..self.height {
            for y in 0..self.width {
                if self.grid[x][y].passable {
                    self.grid[x][y].neighbors = self.get_neighbors((x, y));
                }
            }
        }
    }

    /// Valid moves from `position`: up, down, left, right, skipping walls
    /// and cells outside the grid.
    pub fn get_neighbors(&self, position: Position) -> Vec<(Action, Position)> {
        Action::ALL
            .iter()
            .filter_map(|&action| {
                let next = action.apply(position)?;
                (self.in_bounds(next) && self.is_passable(next)).then_some((action, next))
            })
            .collect()
    }

    /// Precomputed neighbors of a free cell. Walls have none.
    pub fn neighbors(&self, position: Position) -> &[(Action, Position)] {
        &self.grid[position.0][position.1].neighbors
    }

    pub fn in_bounds(&self, position: Position) -> bool {
        position.0 < self.height && position.1 < self.width
    }

    pub fn is_passable(&self, position: Position) -> bool {
        self.grid[position.0][position.1].is_passable()
    }

    pub fn is_wall(&self, position: Position) -> bool {
        !self.is_passable(position)
    }

    /// Exact step distance from every cell to `goal`; `usize::MAX` where unreachable.
    pub fn distance_map(&self, goal: Position) -> Vec<Vec<usize>> {
        let mut distance = vec![vec![usize::MAX; self.width]; self.height];
        let mut queue = VecDeque::new();

        distance[goal.0][goal.1] = 0;
        queue.push_back(goal);

        // Unit step costs: cells leave the queue in nondecreasing distance.
        while let Some((x, y)) = queue.pop_front() {
            let next_cost = distance[x][y] + 1;
            for &(_, (new_x, new_y)) in &self.grid[x][y].neighbors {
                if distance[new_x][new_y] == usize::MAX {
                    distance[new_x][new_y] = next_cost;
                    queue.push_back((new_x, new_y));
                }
            }
        }

        distance
    }
}

impl FromStr for Map {
    type Err = Error;

    /// Parse a text layout: `A` start, `B` goal, space free, anything else wall.
    fn from_str(contents: &str) -> Result<Self> {
        let starts = contents.matches('A').count();
        if starts != 1 {
            return Err(Error::InvalidMaze(format!(
                "maze must have exactly one start point, found {starts}"
            )));
        }
        let goals = contents.matches('B').count();
        if goals != 1 {
            return Err(Error::InvalidMaze(format!(
                "maze must have exactly one goal, found {goals}"
            )));
        }

        let lines: Vec<Vec<char>> = contents.lines().map(|line| line.chars().collect()).collect();
        let width = lines.iter().map(Vec::len).max().unwrap_or(0);

        let mut start = (0, 0);
        let mut goal = (0, 0);
        let mut walls = Vec::with_capacity(lines.len());
        for (i, line) in lines.iter().enumerate() {
            // Short lines are padded with free space.
            let row: Vec<bool> = (0..width)
                .map(|j| match line.get(j).copied().unwrap_or(' ') {
                    'A' => {
                        start = (i, j);
                        false
                    }
                    'B' => {
                        goal = (i, j);
                        false
                    }
                    ' ' => false,
                    _ => true,
                })
                .collect();
            walls.push(row);
        }

        Map::new(walls, start, goal)
    }
}

impl fmt::Display for Map {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::render::text(self, None))
    }
}
