use maze_search::config::{Cli, Config};
use maze_search::map::Map;
use maze_search::render::{self, ImageOptions};
use maze_search::solver::{Solver, Strategy};

use anyhow::{bail, ensure, Context};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    let cli = Cli::parse();

    let config = if let Some(config_file) = cli.config.as_ref() {
        let config_str = std::fs::read_to_string(config_file)?;
        Config::from_yaml_str(&config_str)
            .with_context(|| format!("error with config file: {config_file}"))?
    } else {
        info!("No config file specified, using default config");
        Config::default()
    }
    .override_from_command_line(&cli)?;

    let map = Map::from_file(&config.maze_path)
        .with_context(|| format!("error loading maze: {}", config.maze_path))?;
    let heuristic = config.heuristic.build(&map);
    let strategies = config.strategies()?;
    let options = ImageOptions {
        show_solution: config.show_solution,
        show_explored: config.show_explored,
    };

    println!("Maze:");
    println!();
    println!("{map}");

    let mut failures = 0;
    for &strategy in &strategies {
        println!("Solving with {strategy}...");
        let mut solver = Solver::new(&map)
            .with_heuristic(heuristic.as_ref())
            .with_budget(config.max_expansions);
        let result = solver.solve(strategy);

        if let Some(output_path) = &config.output_path {
            solver
                .stats()
                .append_json(output_path)
                .with_context(|| format!("error writing stats to {output_path}"))?;
        }

        let solution = match result {
            Ok(solution) => solution,
            Err(err) if strategies.len() > 1 => {
                error!("{strategy} solve fails: {err}");
                failures += 1;
                continue;
            }
            Err(err) => return Err(err).context("search failed"),
        };
        ensure!(
            solution.verify(&map),
            "{strategy} produced an invalid path: {solution:?}"
        );

        println!("States Explored: {}", solver.num_explored());
        println!("Solution:");
        println!();
        println!("{}", render::text(&map, Some(&solution)));

        if let Some(image_path) = &config.image_path {
            let image_path = if strategies.len() > 1 {
                image_path_for(image_path, strategy)
            } else {
                PathBuf::from(image_path)
            };
            render::save_image(
                &map,
                Some(&solution),
                solver.explored(),
                heuristic.as_ref(),
                options,
                &image_path,
            )?;
        }
    }

    if failures > 0 {
        bail!("{failures} of {} strategies found no solution", strategies.len());
    }
    Ok(())
}

/// `maze.png` becomes `maze-bfs.png` when several strategies share one output path.
fn image_path_for(path: &str, strategy: Strategy) -> PathBuf {
    let path = Path::new(path);
    let stem = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "maze".to_string());
    let file_name = match path.extension() {
        Some(ext) => format!("{stem}-{strategy}.{}", ext.to_string_lossy()),
        None => format!("{stem}-{strategy}"),
    };
    path.with_file_name(file_name)
}
