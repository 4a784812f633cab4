use std::io;

/// Errors produced while building a maze or searching it.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The maze layout is malformed (start/goal count, empty layout, bad coordinates).
    #[error("invalid maze: {0}")]
    InvalidMaze(String),
    /// Failed to read the maze file.
    #[error("failed to read maze: {0}")]
    Io(#[from] io::Error),
    /// Removal attempted on an empty frontier.
    #[error("empty frontier")]
    EmptyFrontier,
    /// The frontier ran dry before the goal was reached.
    #[error("no solution, {num_explored} states explored")]
    Unsolvable { num_explored: usize },
    /// The expansion budget ran out before the goal was reached.
    #[error("expansion budget exhausted after {num_explored} states")]
    BudgetExhausted { num_explored: usize },
    /// Failed to encode or write a rendered image.
    #[error("failed to write image: {0}")]
    Image(#[from] image::ImageError),
    /// The embedded label font could not be parsed.
    #[error("invalid label font data")]
    InvalidFont,
    /// Unknown strategy identifier.
    #[error("invalid strategy {0:?}, expected one of dfs, bfs, greedy, astar")]
    InvalidStrategy(String),
}

pub type Result<T> = std::result::Result<T, Error>;
