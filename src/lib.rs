//! # maze_astar
//!
//! Generates random [perfect mazes](https://en.wikipedia.org/wiki/Maze_generation_algorithm)
//! (spanning trees over a grid, carved with the recursive backtracker) and solves them with
//! [A*](https://en.wikipedia.org/wiki/A*_search_algorithm). The search does not run to
//! completion on its own: [AstarEvents] is pulled step by step and reports every change to its
//! open and closed sets as an [Event], which makes it suitable for driving a visualization.
//!
//! ```
//! use grid_util::point::Point;
//! use maze_astar::{solve, MazeConfig};
//!
//! let setup = MazeConfig::new(10, 10).with_seed(3).build().unwrap();
//! let report = solve(&setup.maze, setup.start, setup.end).unwrap();
//! assert!(report.success);
//! assert_eq!(report.path.first(), Some(&Point::new(0, 0)));
//! ```
mod astar;
mod error;
mod generator;
mod maze;
mod path;

pub use crate::astar::{AstarEvents, Event, SearchState};
pub use crate::error::MazeError;
pub use crate::generator::{generate, MazeConfig, MazeSetup};
pub use crate::maze::{Direction, Maze, ALL_WALLS};
pub use crate::path::{is_valid_path, reconstruct, solve, SearchReport};

/// Side length used when no dimensions are configured.
pub const DEFAULT_SIZE: usize = 40;
/// Largest number of rows or columns a [MazeConfig] accepts by default.
pub const MAX_DIMENSION: usize = 200;
