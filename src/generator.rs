//! Perfect maze generation with the recursive backtracker: an iterative depth-first walk that
//! carves into a random unvisited neighbour and backtracks when there is none.
use crate::error::MazeError;
use crate::maze::{Direction, Maze};
use crate::{DEFAULT_SIZE, MAX_DIMENSION};
use grid_util::point::Point;
use log::{debug, info};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Carves a perfect maze of `rows`x`cols` cells starting from the top-left corner. Returns the
/// maze together with the conventional endpoints, the top-left and bottom-right corners.
///
/// The same `rng` state and dimensions always produce the same wall masks.
pub fn generate<R: Rng + ?Sized>(
    rows: usize,
    cols: usize,
    rng: &mut R,
) -> Result<(Maze, Point, Point), MazeError> {
    let mut maze = Maze::new(rows, cols)?;
    carve(&mut maze, rng);
    let end = corner(&maze);
    Ok((maze, Point::new(0, 0), end))
}

/// The bottom-right cell, the conventional end of a search.
fn corner(maze: &Maze) -> Point {
    maze.point(maze.len() - 1)
}

/// Runs the recursive backtracker over a freshly walled maze.
fn carve<R: Rng + ?Sized>(maze: &mut Maze, rng: &mut R) {
    info!("Generating {}x{} maze", maze.rows(), maze.cols());
    let mut visited = vec![false; maze.len()];
    let mut stack = vec![0];
    visited[0] = true;
    let mut candidates: Vec<(Direction, usize)> = Vec::with_capacity(4);
    while let Some(&current) = stack.last() {
        candidates.clear();
        candidates.extend(
            Direction::CARVE_ORDER
                .into_iter()
                .filter_map(|dir| maze.adjacent(current, dir).map(|n| (dir, n)))
                .filter(|&(_, n)| !visited[n]),
        );
        match candidates.choose(rng) {
            Some(&(dir, next)) => {
                maze.remove_wall(current, dir);
                visited[next] = true;
                stack.push(next);
            }
            None => {
                stack.pop();
            }
        }
    }
    debug!("Carved {} open edges", maze.open_edge_count());
}

/// Settings for building a maze and choosing its endpoints. Endpoints left as [None] default to
/// the opposite corners, and an unset seed draws one from entropy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MazeConfig {
    pub rows: usize,
    pub cols: usize,
    pub seed: Option<u64>,
    pub start: Option<Point>,
    pub end: Option<Point>,
    pub max_dimension: usize,
}

impl Default for MazeConfig {
    fn default() -> MazeConfig {
        MazeConfig {
            rows: DEFAULT_SIZE,
            cols: DEFAULT_SIZE,
            seed: None,
            start: None,
            end: None,
            max_dimension: MAX_DIMENSION,
        }
    }
}

/// A generated maze with the endpoints to search between and the seed that reproduces it.
#[derive(Clone, Debug)]
pub struct MazeSetup {
    pub maze: Maze,
    pub start: Point,
    pub end: Point,
    pub seed: u64,
}

impl MazeConfig {
    pub fn new(rows: usize, cols: usize) -> MazeConfig {
        MazeConfig {
            rows,
            cols,
            ..MazeConfig::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> MazeConfig {
        self.seed = Some(seed);
        self
    }

    pub fn with_endpoints(mut self, start: Point, end: Point) -> MazeConfig {
        self.start = Some(start);
        self.end = Some(end);
        self
    }

    /// Validates the settings and generates the maze. Dimensions are checked against
    /// `max_dimension` and endpoints against the grid before anything is carved.
    pub fn build(&self) -> Result<MazeSetup, MazeError> {
        if self.rows > self.max_dimension || self.cols > self.max_dimension {
            return Err(MazeError::InvalidDimensions {
                rows: self.rows,
                cols: self.cols,
            });
        }
        let mut maze = Maze::new(self.rows, self.cols)?;
        for point in [self.start, self.end].iter().flatten() {
            maze.endpoint_index(point)?;
        }
        let seed = self.seed.unwrap_or_else(|| rand::thread_rng().gen());
        let mut rng = StdRng::seed_from_u64(seed);
        carve(&mut maze, &mut rng);
        let (start, end) = (Point::new(0, 0), corner(&maze));
        Ok(MazeSetup {
            start: self.start.unwrap_or(start),
            end: self.end.unwrap_or(end),
            maze,
            seed,
        })
    }
}
