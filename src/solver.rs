mod frontier;
mod heuristic;
mod node;

pub use frontier::{
    AStarFrontier, ByEstimatedTotal, ByHeuristic, Frontier, GreedyFrontier, Priority,
    PriorityFrontier, QueueFrontier, StackFrontier,
};
pub use heuristic::{DistanceMap, Heuristic, Manhattan};
pub use node::{Arena, Node, NodeId};

use crate::common::{Position, Solution};
use crate::error::{Error, Result};
use crate::map::Map;
use crate::stat::Stats;

use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use std::time::Instant;
use tracing::{debug, instrument, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    Dfs,
    Bfs,
    Greedy,
    AStar,
}

impl Strategy {
    pub const ALL: [Strategy; 4] = [
        Strategy::Dfs,
        Strategy::Bfs,
        Strategy::Greedy,
        Strategy::AStar,
    ];

    /// Whether the strategy orders its frontier by the heuristic.
    pub fn is_informed(self) -> bool {
        matches!(self, Strategy::Greedy | Strategy::AStar)
    }

    pub fn frontier(self) -> Box<dyn Frontier> {
        match self {
            Strategy::Dfs => Box::new(StackFrontier::default()),
            Strategy::Bfs => Box::new(QueueFrontier::default()),
            Strategy::Greedy => Box::new(GreedyFrontier::default()),
            Strategy::AStar => Box::new(AStarFrontier::default()),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Strategy::Dfs => "dfs",
            Strategy::Bfs => "bfs",
            Strategy::Greedy => "greedy",
            Strategy::AStar => "astar",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Strategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Strategy::ALL
            .into_iter()
            .find(|strategy| strategy.name() == s)
            .ok_or_else(|| Error::InvalidStrategy(s.to_string()))
    }
}

/// Search engine over a read-only map.
///
/// Every `solve` call starts from scratch; the explored set, statistics and
/// solution of the last call stay readable afterwards, including after a
/// failed search.
pub struct Solver<'a, H = Manhattan> {
    map: &'a Map,
    heuristic: H,
    budget: Option<usize>,
    explored: HashSet<Position>,
    solution: Option<Solution>,
    stats: Stats,
}

impl<'a> Solver<'a, Manhattan> {
    pub fn new(map: &'a Map) -> Self {
        Solver {
            map,
            heuristic: Manhattan,
            budget: None,
            explored: HashSet::new(),
            solution: None,
            stats: Stats::default(),
        }
    }
}

impl<'a, H: Heuristic> Solver<'a, H> {
    pub fn with_heuristic<G: Heuristic>(self, heuristic: G) -> Solver<'a, G> {
        Solver {
            map: self.map,
            heuristic,
            budget: self.budget,
            explored: self.explored,
            solution: self.solution,
            stats: self.stats,
        }
    }

    /// Stop once this many nodes have been expanded without reaching the goal.
    pub fn with_budget(mut self, max_expansions: Option<usize>) -> Self {
        self.budget = max_expansions;
        self
    }

    pub fn explored(&self) -> &HashSet<Position> {
        &self.explored
    }

    pub fn num_explored(&self) -> usize {
        self.stats.num_explored
    }

    pub fn solution(&self) -> Option<&Solution> {
        self.solution.as_ref()
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    #[instrument(skip_all, name = "solve", fields(strategy = %strategy), level = "debug")]
    pub fn solve(&mut self, strategy: Strategy) -> Result<Solution> {
        let solve_start_time = Instant::now();

        self.explored.clear();
        self.solution = None;
        self.stats = Stats::new(strategy);

        let result = self.search(strategy);

        self.stats.time_us = solve_start_time.elapsed().as_micros() as usize;
        if let Ok(solution) = &result {
            self.stats.path_len = Some(solution.len());
            self.solution = Some(solution.clone());
        }
        self.stats.print();

        result
    }

    fn estimate(&self, strategy: Strategy, state: Position) -> usize {
        if strategy.is_informed() {
            self.heuristic.estimate(state, self.map.goal)
        } else {
            0
        }
    }

    fn search(&mut self, strategy: Strategy) -> Result<Solution> {
        let map = self.map;
        let mut frontier = strategy.frontier();
        let mut arena = Arena::default();

        frontier.add(Node::root(map.start, self.estimate(strategy, map.start)));

        loop {
            if frontier.is_empty() {
                return Err(Error::Unsolvable {
                    num_explored: self.stats.num_explored,
                });
            }

            let current = frontier.remove()?;
            self.stats.num_explored += 1;
            debug!("expand node: {current:?}");

            if current.state == map.goal {
                let (actions, path) = arena.construct_path(&current);
                return Ok(Solution { actions, path });
            }

            if self
                .budget
                .is_some_and(|budget| self.stats.num_explored >= budget)
            {
                return Err(Error::BudgetExhausted {
                    num_explored: self.stats.num_explored,
                });
            }

            self.explored.insert(current.state);
            let current_id = arena.push(current);
            let current = arena.get(current_id);

            for &(action, state) in map.neighbors(current.state) {
                if self.explored.contains(&state) || frontier.contains_state(state) {
                    continue;
                }
                let heuristic = self.estimate(strategy, state);
                frontier.add(Node::child(current, current_id, action, state, heuristic));
            }
            trace!("frontier {frontier:#?}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Action;

    fn detour_map() -> Map {
        "A  \n # \n  B".parse().unwrap()
    }

    #[test]
    fn test_strategy_from_str() {
        assert_eq!("dfs".parse::<Strategy>().unwrap(), Strategy::Dfs);
        assert_eq!("bfs".parse::<Strategy>().unwrap(), Strategy::Bfs);
        assert_eq!("greedy".parse::<Strategy>().unwrap(), Strategy::Greedy);
        assert_eq!("astar".parse::<Strategy>().unwrap(), Strategy::AStar);
        assert!(matches!(
            "dijkstra".parse::<Strategy>(),
            Err(Error::InvalidStrategy(s)) if s == "dijkstra"
        ));
    }

    #[test]
    fn test_bfs_detour() {
        let map = detour_map();
        let mut solver = Solver::new(&map);
        let solution = solver.solve(Strategy::Bfs).unwrap();

        assert_eq!(
            solution.actions,
            vec![Action::Down, Action::Down, Action::Right, Action::Right]
        );
        assert_eq!(solution.path, vec![(1, 0), (2, 0), (2, 1), (2, 2)]);
        assert_eq!(solver.num_explored(), 8);
        assert!(solution.verify(&map));
    }

    #[test]
    fn test_dfs_detour() {
        let map = detour_map();
        let mut solver = Solver::new(&map);
        let solution = solver.solve(Strategy::Dfs).unwrap();

        assert_eq!(
            solution.actions,
            vec![Action::Right, Action::Right, Action::Down, Action::Down]
        );
        assert_eq!(solution.path, vec![(0, 1), (0, 2), (1, 2), (2, 2)]);
        assert_eq!(solver.num_explored(), 5);
    }

    #[test]
    fn test_greedy_detour() {
        let map = detour_map();
        let mut solver = Solver::new(&map);
        let solution = solver.solve(Strategy::Greedy).unwrap();

        assert_eq!(
            solution.actions,
            vec![Action::Down, Action::Down, Action::Right, Action::Right]
        );
        assert_eq!(solver.num_explored(), 5);
    }

    #[test]
    fn test_a_star_detour() {
        let map = detour_map();
        let mut solver = Solver::new(&map);
        let solution = solver.solve(Strategy::AStar).unwrap();

        assert_eq!(
            solution.actions,
            vec![Action::Down, Action::Down, Action::Right, Action::Right]
        );
        assert_eq!(solver.num_explored(), 8);
    }

    #[test]
    fn test_a_star_exact_heuristic() {
        let map = detour_map();
        let mut solver = Solver::new(&map).with_heuristic(DistanceMap::new(&map));
        let solution = solver.solve(Strategy::AStar).unwrap();

        assert_eq!(solution.len(), 4);
        assert!(solution.verify(&map));
        assert!(solver.num_explored() <= 8);
    }

    #[test]
    fn test_a_star_keeps_first_discovered_parent() {
        // A state already in the frontier is never re-parented, so A* with
        // Manhattan distance can settle for a longer route here.
        let map: Map = "    # \n  #   \n ##   \n   ##B\n #   #\n A #  ".parse().unwrap();

        let mut solver = Solver::new(&map);
        let manhattan = solver.solve(Strategy::AStar).unwrap();
        assert!(manhattan.verify(&map));
        assert_eq!(manhattan.len(), 16);

        let bfs = solver.solve(Strategy::Bfs).unwrap();
        assert_eq!(bfs.len(), 14);

        let mut solver = Solver::new(&map).with_heuristic(DistanceMap::new(&map));
        let exact = solver.solve(Strategy::AStar).unwrap();
        assert!(exact.verify(&map));
        assert_eq!(exact.len(), 14);
    }

    #[test]
    fn test_enclosed_start() {
        let map: Map = "#####\n#A# #\n### #\n#  B#\n#####".parse().unwrap();
        for strategy in Strategy::ALL {
            let mut solver = Solver::new(&map);
            let result = solver.solve(strategy);
            assert!(matches!(
                result,
                Err(Error::Unsolvable { num_explored: 1 })
            ));
            assert_eq!(solver.num_explored(), 1);
            assert!(solver.solution().is_none());
            assert_eq!(solver.explored().len(), 1);
            assert!(solver.explored().contains(&map.start));
        }
    }

    #[test]
    fn test_adjacent_goal() {
        let map: Map = "AB".parse().unwrap();
        for strategy in Strategy::ALL {
            let mut solver = Solver::new(&map);
            let solution = solver.solve(strategy).unwrap();
            assert_eq!(solution.actions, vec![Action::Right]);
            assert_eq!(solution.path, vec![(0, 1)]);
        }
    }

    #[test]
    fn test_coincident_start_goal() {
        let map = Map::new(vec![vec![false, false]], (0, 1), (0, 1)).unwrap();
        let mut solver = Solver::new(&map);
        let solution = solver.solve(Strategy::Bfs).unwrap();
        assert!(solution.is_empty());
        assert!(solution.path.is_empty());
        assert_eq!(solver.num_explored(), 1);
    }

    #[test]
    fn test_resolve_resets_state() {
        let map = detour_map();
        let mut solver = Solver::new(&map);

        let bfs = solver.solve(Strategy::Bfs).unwrap();
        let bfs_explored = solver.explored().clone();

        solver.solve(Strategy::Dfs).unwrap();
        assert_eq!(solver.num_explored(), 5);
        assert_eq!(solver.stats().strategy, Some(Strategy::Dfs));

        let again = solver.solve(Strategy::Bfs).unwrap();
        assert_eq!(again, bfs);
        assert_eq!(solver.explored(), &bfs_explored);
        assert_eq!(solver.solution(), Some(&bfs));
    }

    #[test]
    fn test_budget() {
        let map = detour_map();
        let mut solver = Solver::new(&map).with_budget(Some(3));
        assert!(matches!(
            solver.solve(Strategy::Bfs),
            Err(Error::BudgetExhausted { num_explored: 3 })
        ));

        // The goal is found on the fifth removal, within a budget of five.
        let mut solver = Solver::new(&map).with_budget(Some(5));
        assert!(solver.solve(Strategy::Dfs).is_ok());
    }
}
