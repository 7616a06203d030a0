use crate::error::MazeError;
use core::fmt;
use grid_util::grid::{Grid, SimpleGrid};
use grid_util::point::Point;
use petgraph::unionfind::UnionFind;
use std::collections::VecDeque;

/// Wall mask of a cell that has not been carved into yet.
pub const ALL_WALLS: u8 = 0b1111;

/// One of the four edges of a cell. Every direction owns one bit of a cell's wall mask.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    /// Order in which the generator lists unvisited cells before drawing one at random.
    pub const CARVE_ORDER: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];
    /// Order in which open neighbours are handed to the search. Changing it changes the event
    /// stream, so it is fixed.
    pub const SEARCH_ORDER: [Direction; 4] = [
        Direction::East,
        Direction::West,
        Direction::South,
        Direction::North,
    ];

    pub fn bit(self) -> u8 {
        match self {
            Direction::North => 1,
            Direction::South => 2,
            Direction::East => 4,
            Direction::West => 8,
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::East => Direction::West,
            Direction::West => Direction::East,
        }
    }

    /// Offset as (row, column) delta.
    pub fn offset(self) -> (i32, i32) {
        match self {
            Direction::North => (-1, 0),
            Direction::South => (1, 0),
            Direction::East => (0, 1),
            Direction::West => (0, -1),
        }
    }
}

/// A `rows`x`cols` lattice of cells, each storing a 4-bit wall mask where a set bit means the
/// edge in that [Direction] is walled. The masks live in a [SimpleGrid] with `x` the column and
/// `y` the row, so cells are addressed either by [Point] or by the row-wise grid index
/// `row * cols + col`.
#[derive(Clone, Debug)]
pub struct Maze {
    walls: SimpleGrid<u8>,
}

impl PartialEq for Maze {
    fn eq(&self, other: &Self) -> bool {
        self.walls.width == other.walls.width
            && self.walls.height == other.walls.height
            && self.walls.values == other.walls.values
    }
}

impl Eq for Maze {}

impl Maze {
    /// Creates a maze where every cell is closed off on all four sides. Both dimensions must be
    /// positive, fit a [Point] coordinate and give a cell count that fits in memory indices.
    pub fn new(rows: usize, cols: usize) -> Result<Maze, MazeError> {
        let fits_point = rows <= i32::MAX as usize && cols <= i32::MAX as usize;
        if rows == 0 || cols == 0 || !fits_point || rows.checked_mul(cols).is_none() {
            return Err(MazeError::InvalidDimensions { rows, cols });
        }
        Ok(Maze {
            walls: SimpleGrid::new(cols, rows, ALL_WALLS),
        })
    }

    pub fn rows(&self) -> usize {
        self.walls.height()
    }

    pub fn cols(&self) -> usize {
        self.walls.width()
    }

    pub fn len(&self) -> usize {
        self.walls.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.walls.values.is_empty()
    }

    /// The raw wall masks in index order.
    pub fn wall_masks(&self) -> &[u8] {
        &self.walls.values
    }

    pub fn walls(&self, cell: usize) -> u8 {
        self.walls.get_point(self.point(cell))
    }

    pub fn in_bounds(&self, point: &Point) -> bool {
        self.walls.point_in_bounds(*point)
    }

    pub fn index(&self, point: &Point) -> Option<usize> {
        if self.in_bounds(point) {
            Some(self.walls.get_ix_point(point))
        } else {
            None
        }
    }

    /// Like [index](Self::index), but reports an out of bounds point as an endpoint error.
    pub fn endpoint_index(&self, point: &Point) -> Result<usize, MazeError> {
        self.index(point).ok_or(MazeError::InvalidEndpoint {
            point: *point,
            rows: self.rows(),
            cols: self.cols(),
        })
    }

    pub fn point(&self, cell: usize) -> Point {
        let width = self.walls.width();
        Point::new((cell % width) as i32, (cell / width) as i32)
    }

    /// The cell geometrically adjacent in `dir`, regardless of walls.
    pub fn adjacent(&self, cell: usize, dir: Direction) -> Option<usize> {
        let (dr, dc) = dir.offset();
        self.index(&(self.point(cell) + Point::new(dc, dr)))
    }

    /// Whether the edge of `cell` in `dir` is open and leads to another cell.
    pub fn open_edge(&self, cell: usize, dir: Direction) -> bool {
        self.walls(cell) & dir.bit() == 0 && self.adjacent(cell, dir).is_some()
    }

    /// Neighbours reachable through an open edge, in [Direction::SEARCH_ORDER].
    pub fn neighbors(&self, cell: usize) -> impl Iterator<Item = (Direction, usize)> + '_ {
        Direction::SEARCH_ORDER
            .into_iter()
            .filter(move |&dir| self.walls(cell) & dir.bit() == 0)
            .filter_map(move |dir| self.adjacent(cell, dir).map(|n| (dir, n)))
    }

    /// Number of open edges leaving `cell`.
    pub fn exits(&self, cell: usize) -> usize {
        self.neighbors(cell).count()
    }

    /// A junction: three or more open edges.
    pub fn is_branch(&self, cell: usize) -> bool {
        self.exits(cell) >= 3
    }

    /// Opens the edge between `cell` and its neighbour in `dir` in both wall masks. Returns
    /// `false` and leaves the maze untouched if there is no neighbour in that direction.
    pub fn remove_wall(&mut self, cell: usize, dir: Direction) -> bool {
        match self.adjacent(cell, dir) {
            Some(other) => {
                let (here, there) = (self.point(cell), self.point(other));
                let here_walls = self.walls.get_point(here) & !dir.bit();
                let there_walls = self.walls.get_point(there) & !dir.opposite().bit();
                self.walls.set_point(here, here_walls);
                self.walls.set_point(there, there_walls);
                true
            }
            None => false,
        }
    }

    /// Open edges counted once each. Only east and south edges are inspected so that every
    /// interior edge is seen from exactly one side.
    pub fn open_edge_count(&self) -> usize {
        (0..self.len())
            .map(|cell| {
                [Direction::East, Direction::South]
                    .into_iter()
                    .filter(|&dir| self.open_edge(cell, dir))
                    .count()
            })
            .sum()
    }

    /// Generates a [UnionFind] structure in which cells joined by open edges share a component.
    pub fn components(&self) -> UnionFind<usize> {
        let mut components = UnionFind::new(self.len());
        for cell in 0..self.len() {
            for (_, n) in self.neighbors(cell) {
                components.union(cell, n);
            }
        }
        components
    }

    /// Checks if `a` and `b` are on the same component. Out of bounds points are unreachable.
    pub fn reachable(&self, a: &Point, b: &Point) -> bool {
        match (self.index(a), self.index(b)) {
            (Some(a_ix), Some(b_ix)) => self.components().equiv(a_ix, b_ix),
            _ => false,
        }
    }

    /// Checks the spanning tree invariant: `len - 1` open edges and no edge closing a cycle.
    /// Together these imply that the maze is connected.
    pub fn is_perfect(&self) -> bool {
        if self.open_edge_count() != self.len() - 1 {
            return false;
        }
        let mut components = UnionFind::new(self.len());
        for cell in 0..self.len() {
            for dir in [Direction::East, Direction::South] {
                if self.open_edge(cell, dir) {
                    if let Some(n) = self.adjacent(cell, dir) {
                        if !components.union(cell, n) {
                            return false;
                        }
                    }
                }
            }
        }
        true
    }

    /// Breadth-first move counts from `from` to every cell, [None] where unreachable.
    pub fn distances_from(&self, from: usize) -> Vec<Option<u32>> {
        let mut dist = vec![None; self.len()];
        let mut queue = VecDeque::new();
        dist[from] = Some(0);
        queue.push_back(from);
        while let Some(cell) = queue.pop_front() {
            let d = dist[cell].unwrap_or_default();
            for (_, n) in self.neighbors(cell) {
                if dist[n].is_none() {
                    dist[n] = Some(d + 1);
                    queue.push_back(n);
                }
            }
        }
        dist
    }

    /// Renders the maze with the cells of `path` marked.
    pub fn render_with_path(&self, path: &[Point]) -> String {
        let mut on_path = vec![false; self.len()];
        for ix in path.iter().filter_map(|p| self.index(p)) {
            on_path[ix] = true;
        }
        let mut out = String::new();
        // Writing to a String cannot fail
        let _ = self.draw(&mut out, &on_path);
        out
    }

    fn draw<W: fmt::Write>(&self, f: &mut W, marked: &[bool]) -> fmt::Result {
        let (width, height) = (self.walls.width(), self.walls.height());
        for _ in 0..width {
            write!(f, "+--")?;
        }
        writeln!(f, "+")?;
        for y in 0..height {
            write!(f, "|")?;
            for x in 0..width {
                let body = if marked.get(self.walls.get_ix(x, y)).copied().unwrap_or(false) {
                    "()"
                } else {
                    "  "
                };
                let side = if self.walls.get(x, y) & Direction::East.bit() != 0 {
                    "|"
                } else {
                    " "
                };
                write!(f, "{}{}", body, side)?;
            }
            writeln!(f)?;
            write!(f, "+")?;
            for x in 0..width {
                if self.walls.get(x, y) & Direction::South.bit() != 0 {
                    write!(f, "--+")?;
                } else {
                    write!(f, "  +")?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl fmt::Display for Maze {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.draw(f, &[])
    }
}
