//! Fuzzes maze generation and search by checking on many seeded random mazes that every maze is
//! a spanning tree and that A* always finds a path as short as the breadth-first ground truth.
use grid_util::point::Point;
use maze_astar::*;
use rand::prelude::*;

fn random_maze(rows: usize, cols: usize, rng: &mut StdRng) -> Maze {
    generate(rows, cols, rng).unwrap().0
}

fn random_point(maze: &Maze, rng: &mut StdRng) -> Point {
    Point::new(
        rng.gen_range(0..maze.cols()) as i32,
        rng.gen_range(0..maze.rows()) as i32,
    )
}

/// Replays a search event by event and checks the invariants that must hold between events.
/// Returns the terminal report.
fn checked_search(maze: &Maze, start: Point, end: Point) -> SearchReport {
    let mut engine = AstarEvents::new(maze, start, end).unwrap();
    let mut finalized: Vec<Option<u32>> = vec![None; maze.len()];
    let mut report = None;
    while let Some(event) = engine.step() {
        match &event {
            Event::ClosedFinalized(cells) | Event::BranchFinalized(cells) => {
                for &cell in cells {
                    assert_eq!(
                        maze.is_branch(cell),
                        matches!(event, Event::BranchFinalized(_))
                    );
                    finalized[cell] = engine.cost(cell);
                }
            }
            Event::Finished { .. } => report = SearchReport::from_event(maze, &event),
            _ => {}
        }
        // Closed cells never improve
        for (cell, cost) in finalized.iter().enumerate() {
            if cost.is_some() {
                assert!(engine.is_closed(cell));
                assert_eq!(engine.cost(cell), *cost);
            }
        }
    }
    report.unwrap()
}

#[test]
fn fuzz_generation() {
    const N_MAZES: usize = 500;
    let mut rng = StdRng::seed_from_u64(0);
    for _ in 0..N_MAZES {
        let rows = rng.gen_range(1..=12);
        let cols = rng.gen_range(1..=12);
        let maze = random_maze(rows, cols, &mut rng);
        assert_eq!(maze.open_edge_count(), rows * cols - 1);
        assert!(maze.is_perfect());
        let dist = maze.distances_from(0);
        assert!(dist.iter().all(|d| d.is_some()));
    }
}

#[test]
fn fuzz_distance() {
    const N_MAZES: usize = 300;
    let mut rng = StdRng::seed_from_u64(1);
    for _ in 0..N_MAZES {
        let rows = rng.gen_range(1..=15);
        let cols = rng.gen_range(1..=15);
        let maze = random_maze(rows, cols, &mut rng);
        let start = random_point(&maze, &mut rng);
        let end = random_point(&maze, &mut rng);
        let report = checked_search(&maze, start, end);
        let truth = maze.distances_from(maze.index(&start).unwrap())[maze.index(&end).unwrap()];
        if !report.success || Some(report.moves as u32) != truth {
            println!("{}", maze.render_with_path(&report.path));
        }
        assert!(report.success);
        assert_eq!(Some(report.moves as u32), truth);
        assert_eq!(report.path.first(), Some(&start));
        assert_eq!(report.path.last(), Some(&end));
        assert!(is_valid_path(&maze, &report.path));
        assert!(report.expansions <= maze.len());
    }
}

#[test]
fn heuristic_is_admissible() {
    let mut rng = StdRng::seed_from_u64(2);
    let maze = random_maze(9, 11, &mut rng);
    for from in 0..maze.len() {
        let dist = maze.distances_from(from);
        let a = maze.point(from);
        for (to, d) in dist.iter().enumerate() {
            let b = maze.point(to);
            let manhattan = ((a.x - b.x).abs() + (a.y - b.y).abs()) as u32;
            assert!(manhattan <= d.unwrap());
        }
    }
}

#[test]
fn event_stream_is_reproducible() {
    for seed in 0..20 {
        let setup = MazeConfig::new(17, 23).with_seed(seed).build().unwrap();
        let first: Vec<Event> = AstarEvents::new(&setup.maze, setup.start, setup.end)
            .unwrap()
            .collect();
        let replay = MazeConfig::new(17, 23).with_seed(seed).build().unwrap();
        assert_eq!(setup.maze.wall_masks(), replay.maze.wall_masks());
        let second: Vec<Event> = AstarEvents::new(&replay.maze, replay.start, replay.end)
            .unwrap()
            .collect();
        assert_eq!(first, second);
    }
}

#[test]
fn shared_maze_across_threads() {
    let setup = MazeConfig::new(30, 30).with_seed(5).build().unwrap();
    let maze = &setup.maze;
    let expected = solve(maze, setup.start, setup.end).unwrap();
    std::thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|_| s.spawn(|| solve(maze, setup.start, setup.end).unwrap()))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}
