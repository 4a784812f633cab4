pub mod common;
pub mod config;
pub mod error;
pub mod map;
pub mod render;
pub mod solver;
pub mod stat;

pub use common::{Action, Position, Solution};
pub use error::{Error, Result};
pub use map::Map;
pub use solver::{Solver, Strategy};
