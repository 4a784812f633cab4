use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::solver::Strategy;

#[derive(Debug, Clone, Default, Serialize)]
pub struct Stats {
    pub strategy: Option<Strategy>,
    pub num_explored: usize,
    pub path_len: Option<usize>,
    pub time_us: usize,
}

impl Stats {
    pub fn new(strategy: Strategy) -> Self {
        Stats {
            strategy: Some(strategy),
            ..Stats::default()
        }
    }

    pub(crate) fn print(&self) {
        info!(
            "Strategy {:?} Path length {:?} Time(microseconds) {:?} Explored nodes number: {:?}",
            self.strategy, self.path_len, self.time_us, self.num_explored
        );
    }

    /// Append this record as one JSON line.
    pub fn append_json<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        let line = serde_json::to_string(self)?;
        writeln!(file, "{line}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_json() {
        let path = std::env::temp_dir()
            .join(format!("maze_search_stats_{}.jsonl", std::process::id()));
        let _ = std::fs::remove_file(&path);

        let mut stats = Stats::new(Strategy::AStar);
        stats.num_explored = 7;
        stats.path_len = Some(4);
        stats.append_json(&path).unwrap();
        Stats::new(Strategy::Dfs).append_json(&path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<serde_json::Value> = contents
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["strategy"], "astar");
        assert_eq!(lines[0]["num_explored"], 7);
        assert_eq!(lines[0]["path_len"], 4);
        assert_eq!(lines[1]["strategy"], "dfs");
        assert!(lines[1]["path_len"].is_null());

        std::fs::remove_file(&path).unwrap();
    }
}
