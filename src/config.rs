use anyhow::ensure;
use clap::{Parser, ValueEnum};
use serde::Deserialize;

use crate::error::Error;
use crate::map::Map;
use crate::solver::{DistanceMap, Heuristic, Manhattan, Strategy};

#[derive(Parser, Debug)]
#[command(
    name = "Maze Search",
    about = "Solve a text maze with depth-first, breadth-first, greedy best-first or A* search.",
    version = "1.0"
)]
pub struct Cli {
    #[arg(help = "Path to the maze file ('A' start, 'B' goal, ' ' free, anything else wall)")]
    pub maze_path: String,

    #[arg(long, help = "Path to a YAML config file")]
    pub config: Option<String>,

    #[arg(long, help = "Solver to use: dfs, bfs, greedy, astar or all")]
    pub solver: Option<String>,

    #[arg(long, value_enum, help = "Heuristic for greedy and A* search")]
    pub heuristic: Option<HeuristicKind>,

    #[arg(long, help = "Path to the output image")]
    pub image_path: Option<String>,

    #[arg(long, help = "Do not write an image", default_value_t = false)]
    pub no_image: bool,

    #[arg(
        long,
        help = "Leave the solution path and heuristic values out of the image",
        default_value_t = false
    )]
    pub hide_solution: bool,

    #[arg(
        long,
        help = "Leave explored cells out of the image",
        default_value_t = false
    )]
    pub hide_explored: bool,

    #[arg(long, help = "Give up after expanding this many states")]
    pub max_expansions: Option<usize>,

    #[arg(long, help = "Append per-run statistics as JSON lines to this file")]
    pub output_path: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum HeuristicKind {
    /// Manhattan distance to the goal.
    #[default]
    Manhattan,
    /// Exact walking distance, precomputed from the goal.
    Exact,
}

impl HeuristicKind {
    pub fn build(self, map: &Map) -> Box<dyn Heuristic> {
        match self {
            HeuristicKind::Manhattan => Box::new(Manhattan),
            HeuristicKind::Exact => Box::new(DistanceMap::new(map)),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub maze_path: String,
    pub solver: String,
    pub heuristic: HeuristicKind,
    pub image_path: Option<String>,
    pub show_solution: bool,
    pub show_explored: bool,
    pub max_expansions: Option<usize>,
    pub output_path: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            maze_path: String::new(),
            solver: "greedy".to_string(),
            heuristic: HeuristicKind::Manhattan,
            image_path: Some("maze.png".to_string()),
            show_solution: true,
            show_explored: true,
            max_expansions: None,
            output_path: None,
        }
    }
}

impl Config {
    pub fn from_yaml_str(yaml: &str) -> anyhow::Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Command-line flags win over whatever the config file said.
    pub fn override_from_command_line(mut self, cli: &Cli) -> anyhow::Result<Self> {
        self.maze_path = cli.maze_path.clone();
        if let Some(solver) = &cli.solver {
            self.solver = solver.clone();
        }
        if let Some(heuristic) = cli.heuristic {
            self.heuristic = heuristic;
        }
        if let Some(image_path) = &cli.image_path {
            self.image_path = Some(image_path.clone());
        }
        if cli.no_image {
            self.image_path = None;
        }
        if cli.hide_solution {
            self.show_solution = false;
        }
        if cli.hide_explored {
            self.show_explored = false;
        }
        if cli.max_expansions.is_some() {
            self.max_expansions = cli.max_expansions;
        }
        if let Some(output_path) = &cli.output_path {
            self.output_path = Some(output_path.clone());
        }

        self.validate()?;
        Ok(self)
    }

    /// Strategies to run, in order. `all` expands to every strategy.
    pub fn strategies(&self) -> Result<Vec<Strategy>, Error> {
        match self.solver.as_str() {
            "all" => Ok(Strategy::ALL.to_vec()),
            name => Ok(vec![name.parse()?]),
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(!self.maze_path.is_empty(), "No maze file specified");
        self.strategies()?;
        if let Some(max_expansions) = self.max_expansions {
            ensure!(
                max_expansions > 0,
                "Expansion budget must be at least 1, got {max_expansions}"
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("maze_search").chain(args.iter().copied()))
    }

    #[test]
    fn test_defaults() {
        let config = Config::default()
            .override_from_command_line(&cli(&["maze_file/maze1.txt"]))
            .unwrap();
        assert_eq!(config.maze_path, "maze_file/maze1.txt");
        assert_eq!(config.strategies().unwrap(), vec![Strategy::Greedy]);
        assert_eq!(config.image_path.as_deref(), Some("maze.png"));
        assert!(config.show_explored);
    }

    #[test]
    fn test_yaml_then_command_line() {
        let yaml = "solver: bfs\nheuristic: exact\nmax_expansions: 100\nshow_explored: false\n";
        let config = Config::from_yaml_str(yaml).unwrap();
        assert_eq!(config.solver, "bfs");
        assert_eq!(config.heuristic, HeuristicKind::Exact);
        assert_eq!(config.max_expansions, Some(100));
        assert!(!config.show_explored);
        assert!(config.show_solution);

        let config = config
            .override_from_command_line(&cli(&[
                "maze.txt",
                "--solver",
                "all",
                "--no-image",
                "--max-expansions",
                "5",
            ]))
            .unwrap();
        assert_eq!(config.strategies().unwrap(), Strategy::ALL.to_vec());
        assert_eq!(config.image_path, None);
        assert_eq!(config.max_expansions, Some(5));
        assert_eq!(config.heuristic, HeuristicKind::Exact);
    }

    #[test]
    fn test_invalid_strategy() {
        let result =
            Config::default().override_from_command_line(&cli(&["maze.txt", "--solver", "ucs"]));
        assert!(result.is_err());

        let config = Config {
            solver: "ucs".to_string(),
            ..Config::default()
        };
        assert!(matches!(config.strategies(), Err(Error::InvalidStrategy(_))));
    }

    #[test]
    fn test_zero_budget() {
        let result = Config::default()
            .override_from_command_line(&cli(&["maze.txt", "--max-expansions", "0"]));
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_yaml_key() {
        assert!(Config::from_yaml_str("solvr: bfs\n").is_err());
    }

    #[test]
    fn test_missing_maze_argument() {
        assert!(Cli::try_parse_from(["maze_search"]).is_err());
        assert!(Cli::try_parse_from(["maze_search", "a.txt", "b.txt"]).is_err());
    }
}
