use crate::astar::{AstarEvents, Event};
use crate::error::MazeError;
use crate::maze::{Direction, Maze};
use grid_util::point::Point;
use itertools::Itertools;
use log::info;

/// Walks the predecessor table back from `end` and returns the cells from the first cell of the
/// chain to `end`. After a failed search the chain does not reach the start, so callers have to
/// rely on the `success` flag of [Event::Finished] rather than on the returned cells.
pub fn reconstruct(parents: &[Option<usize>], end: usize) -> Vec<usize> {
    let mut path: Vec<usize> =
        std::iter::successors(Some(end), |&cell| parents.get(cell).copied().flatten()).collect();
    path.reverse();
    path
}

/// The outcome of a search: the path as points, the number of moves along it and the number of
/// expansions it took to find.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchReport {
    pub path: Vec<Point>,
    pub moves: usize,
    pub expansions: usize,
    pub success: bool,
}

impl SearchReport {
    /// Builds the report from a terminal [Event::Finished]. Other events yield [None].
    pub fn from_event(maze: &Maze, event: &Event) -> Option<SearchReport> {
        match event {
            Event::Finished {
                parents,
                goal,
                expansions,
                success,
            } => {
                let path = if *success {
                    reconstruct(parents, *goal)
                        .into_iter()
                        .map(|cell| maze.point(cell))
                        .collect::<Vec<Point>>()
                } else {
                    Vec::new()
                };
                Some(SearchReport {
                    moves: path.len().saturating_sub(1),
                    path,
                    expansions: *expansions,
                    success: *success,
                })
            }
            _ => None,
        }
    }
}

/// Drives a search from `start` to `end` to completion and reports the result.
pub fn solve(maze: &Maze, start: Point, end: Point) -> Result<SearchReport, MazeError> {
    let mut engine = AstarEvents::new(maze, start, end)?;
    let mut report = None;
    while let Some(event) = engine.step() {
        report = SearchReport::from_event(maze, &event).or(report);
    }
    let report = report.unwrap_or(SearchReport {
        path: Vec::new(),
        moves: 0,
        expansions: engine.expansions(),
        success: false,
    });
    info!(
        "Search from {} to {} took {} expansions, path of {} moves",
        start, end, report.expansions, report.moves
    );
    Ok(report)
}

/// Checks that `path` visits no cell twice and that consecutive cells share an open edge.
pub fn is_valid_path(maze: &Maze, path: &[Point]) -> bool {
    let cells = match path.iter().map(|p| maze.index(p)).collect::<Option<Vec<usize>>>() {
        Some(cells) => cells,
        None => return false,
    };
    cells.iter().all_unique()
        && cells.iter().tuple_windows().all(|(&a, &b)| {
            Direction::SEARCH_ORDER
                .into_iter()
                .any(|dir| maze.open_edge(a, dir) && maze.adjacent(a, dir) == Some(b))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reconstruct_follows_parents() {
        let parents = vec![None, Some(0), Some(1), Some(4), Some(5), Some(2)];
        assert_eq!(reconstruct(&parents, 3), vec![0, 1, 2, 5, 4, 3]);
        assert_eq!(reconstruct(&parents, 0), vec![0]);
    }

    #[test]
    fn reconstruct_partial_chain() {
        let parents = vec![None, Some(0), None, Some(2)];
        assert_eq!(reconstruct(&parents, 3), vec![2, 3]);
    }

    /// A ring of open cells around a walled-off centre: either way round takes 4 moves.
    #[test]
    fn solve_simple_problem() {
        // |S  |
        // | # |
        // |  G|
        let mut maze = Maze::new(3, 3).unwrap();
        for cell in [0, 1, 3, 5, 6, 7] {
            for dir in Direction::SEARCH_ORDER {
                if maze.adjacent(cell, dir).is_some_and(|n| n != 4) {
                    maze.remove_wall(cell, dir);
                }
            }
        }
        let report = solve(&maze, Point::new(0, 0), Point::new(2, 2)).unwrap();
        assert!(report.success);
        assert_eq!(report.moves, 4);
        assert_eq!(report.path.len(), 5);
        assert!(is_valid_path(&maze, &report.path));
    }

    #[test]
    fn failed_search_has_no_path() {
        let maze = Maze::new(1, 2).unwrap();
        let report = solve(&maze, Point::new(0, 0), Point::new(1, 0)).unwrap();
        assert!(!report.success);
        assert!(report.path.is_empty());
        assert_eq!(report.moves, 0);
        assert_eq!(report.expansions, 1);
    }

    #[test]
    fn solve_rejects_outside_endpoints() {
        let maze = Maze::new(2, 2).unwrap();
        assert!(solve(&maze, Point::new(0, 0), Point::new(0, 5)).is_err());
    }

    #[test]
    fn invalid_paths() {
        let mut maze = Maze::new(1, 3).unwrap();
        maze.remove_wall(0, Direction::East);
        let a = Point::new(0, 0);
        let b = Point::new(1, 0);
        let c = Point::new(2, 0);
        assert!(is_valid_path(&maze, &[a, b]));
        assert!(!is_valid_path(&maze, &[a, b, c]));
        assert!(!is_valid_path(&maze, &[a, b, a]));
        assert!(!is_valid_path(&maze, &[a, c]));
        assert!(!is_valid_path(&maze, &[Point::new(-1, 0)]));
    }
}
