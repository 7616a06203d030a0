//! This module implements A* over the open edges of a [Maze] as a pull-based state machine.
//! Rather than running to completion, every call to [AstarEvents::step] performs at most one
//! expansion and hands out the resulting [Event]s one at a time, so a driver can pace and
//! observe the search.
use crate::error::MazeError;
use crate::maze::Maze;
use grid_util::point::Point;
use log::{debug, info, warn};
use std::cmp::Ordering;
use std::collections::{BinaryHeap, VecDeque};
use std::iter::FusedIterator;

/// Cost of a cell that has not been reached yet.
const UNREACHED: u32 = u32::MAX;

/// Observable progress of a search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Cells that entered the open set.
    OpenAdded(Vec<usize>),
    /// Cells whose cost is final, with fewer than three open edges.
    ClosedFinalized(Vec<usize>),
    /// Cells whose cost is final, with three or more open edges.
    BranchFinalized(Vec<usize>),
    /// The cell popped from the open set that is about to be expanded.
    CurrentExpanding(usize),
    /// Terminal event. `parents` maps every cell to its predecessor on the best known route;
    /// only when `success` is set does the chain from `goal` lead back to the start.
    Finished {
        parents: Vec<Option<usize>>,
        goal: usize,
        expansions: usize,
        success: bool,
    },
}

/// Lifecycle of an [AstarEvents] engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchState {
    Initialized,
    Stepping,
    Finished,
}

struct SmallestCostHolder {
    estimated_cost: u32,
    sequence: usize,
    index: usize,
}

impl Eq for SmallestCostHolder {}

impl PartialEq for SmallestCostHolder {
    fn eq(&self, other: &Self) -> bool {
        self.estimated_cost == other.estimated_cost && self.sequence == other.sequence
    }
}

impl PartialOrd for SmallestCostHolder {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SmallestCostHolder {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap: the smallest estimate wins, then the earliest insertion
        match other.estimated_cost.cmp(&self.estimated_cost) {
            Ordering::Equal => other.sequence.cmp(&self.sequence),
            s => s,
        }
    }
}

/// A* search from a start cell to a goal cell of a borrowed [Maze], with unit edge costs and the
/// [Manhattan distance](https://en.wikipedia.org/wiki/Taxicab_geometry) as heuristic. The maze is
/// only read, so any number of engines can share one.
///
/// The first event is always `OpenAdded([start])`. Each following expansion yields
/// `CurrentExpanding`, then either the terminal `Finished` or an optional `OpenAdded` batch
/// followed by `ClosedFinalized` or `BranchFinalized` for the expanded cell. Once `Finished`
/// has been handed out, stepping returns [None].
pub struct AstarEvents<'a> {
    maze: &'a Maze,
    start: usize,
    goal: usize,
    goal_point: Point,
    costs: Vec<u32>,
    parents: Vec<Option<usize>>,
    to_see: BinaryHeap<SmallestCostHolder>,
    in_open: Vec<bool>,
    closed: Vec<bool>,
    sequence: usize,
    expansions: usize,
    pending: VecDeque<Event>,
    state: SearchState,
}

impl<'a> AstarEvents<'a> {
    /// Fails with [MazeError::InvalidEndpoint] if `start` or `goal` lies outside of the maze.
    /// `start == goal` is valid and finishes after a single expansion step.
    pub fn new(maze: &'a Maze, start: Point, goal: Point) -> Result<AstarEvents<'a>, MazeError> {
        let start_ix = maze.endpoint_index(&start)?;
        let goal_ix = maze.endpoint_index(&goal)?;
        let n = maze.len();
        let mut engine = AstarEvents {
            maze,
            start: start_ix,
            goal: goal_ix,
            goal_point: goal,
            costs: vec![UNREACHED; n],
            parents: vec![None; n],
            to_see: BinaryHeap::new(),
            in_open: vec![false; n],
            closed: vec![false; n],
            sequence: 0,
            expansions: 0,
            pending: VecDeque::new(),
            state: SearchState::Initialized,
        };
        engine.costs[start_ix] = 0;
        engine.in_open[start_ix] = true;
        let estimated_cost = engine.heuristic(start_ix);
        engine.to_see.push(SmallestCostHolder {
            estimated_cost,
            sequence: 0,
            index: start_ix,
        });
        Ok(engine)
    }

    fn heuristic(&self, cell: usize) -> u32 {
        self.maze.point(cell).manhattan_distance(&self.goal_point) as u32
    }

    /// Returns the next event, or [None] once the terminal event has been handed out.
    pub fn step(&mut self) -> Option<Event> {
        if let Some(event) = self.pending.pop_front() {
            return Some(event);
        }
        match self.state {
            SearchState::Initialized => {
                info!(
                    "Searching from {} to {}",
                    self.maze.point(self.start),
                    self.goal_point
                );
                self.state = SearchState::Stepping;
                Some(Event::OpenAdded(vec![self.start]))
            }
            SearchState::Stepping => {
                self.expand();
                self.pending.pop_front()
            }
            SearchState::Finished => None,
        }
    }

    /// Pops the best non-closed cell and expands it, queueing the resulting events.
    fn expand(&mut self) {
        let current = loop {
            match self.to_see.pop() {
                // Entries of cells that were closed in the meantime are outdated
                Some(SmallestCostHolder { index, .. }) if self.closed[index] => continue,
                Some(SmallestCostHolder { index, .. }) => break index,
                None => {
                    warn!(
                        "Open set exhausted after {} expansions without reaching {}",
                        self.expansions, self.goal_point
                    );
                    self.finish(false);
                    return;
                }
            }
        };
        self.pending.push_back(Event::CurrentExpanding(current));
        if current == self.goal {
            self.finish(true);
            return;
        }
        self.closed[current] = true;

        let maze = self.maze;
        let tentative = self.costs[current] + 1;
        let mut opened = Vec::new();
        for (_, neighbor) in maze.neighbors(current) {
            if tentative < self.costs[neighbor] {
                self.costs[neighbor] = tentative;
                self.parents[neighbor] = Some(current);
                if !self.in_open[neighbor] {
                    self.sequence += 1;
                    let estimated_cost = tentative + self.heuristic(neighbor);
                    self.to_see.push(SmallestCostHolder {
                        estimated_cost,
                        sequence: self.sequence,
                        index: neighbor,
                    });
                    self.in_open[neighbor] = true;
                    opened.push(neighbor);
                }
            }
        }
        if !opened.is_empty() {
            self.pending.push_back(Event::OpenAdded(opened));
        }

        self.expansions += 1;
        if maze.is_branch(current) {
            self.pending.push_back(Event::BranchFinalized(vec![current]));
        } else {
            self.pending.push_back(Event::ClosedFinalized(vec![current]));
        }
    }

    fn finish(&mut self, success: bool) {
        debug!(
            "Search finished after {} expansions, success: {}",
            self.expansions, success
        );
        self.state = SearchState::Finished;
        self.pending.push_back(Event::Finished {
            parents: self.parents.clone(),
            goal: self.goal,
            expansions: self.expansions,
            success,
        });
    }

    pub fn state(&self) -> SearchState {
        self.state
    }

    pub fn maze(&self) -> &'a Maze {
        self.maze
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn goal(&self) -> usize {
        self.goal
    }

    /// Number of cells closed so far. The goal itself is never counted.
    pub fn expansions(&self) -> usize {
        self.expansions
    }

    /// Best known number of moves from the start, [None] if not reached yet.
    pub fn cost(&self, cell: usize) -> Option<u32> {
        Some(self.costs[cell]).filter(|&c| c != UNREACHED)
    }

    pub fn parent(&self, cell: usize) -> Option<usize> {
        self.parents[cell]
    }

    /// Discovered but not yet finalized.
    pub fn is_open(&self, cell: usize) -> bool {
        self.in_open[cell] && !self.closed[cell]
    }

    pub fn is_closed(&self, cell: usize) -> bool {
        self.closed[cell]
    }
}

impl Iterator for AstarEvents<'_> {
    type Item = Event;

    fn next(&mut self) -> Option<Event> {
        self.step()
    }
}

impl FusedIterator for AstarEvents<'_> {}
