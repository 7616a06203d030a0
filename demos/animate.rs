use maze_astar::{AstarEvents, Event, MazeConfig, SearchReport};

// In this example a seeded 12x12 maze is generated and the search is pulled a few events per
// "tick", the way a renderer would pace it. Every tick prints the sizes of the open and closed
// sets, and the maze is printed with the final path once the search finishes.
//
// Usage: cargo run --example animate [size] [seed]

const EVENTS_PER_TICK: usize = 8;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let size: usize = args.next().map(|s| s.parse()).transpose()?.unwrap_or(12);
    let seed: u64 = args.next().map(|s| s.parse()).transpose()?.unwrap_or(7);
    let setup = MazeConfig::new(size, size).with_seed(seed).build()?;
    println!("{}", setup.maze);

    let mut engine = AstarEvents::new(&setup.maze, setup.start, setup.end)?;
    let (mut open, mut closed, mut branches) = (0, 0, 0);
    let mut tick = 0;
    let report = loop {
        let mut finished = None;
        for event in engine.by_ref().take(EVENTS_PER_TICK) {
            match &event {
                Event::OpenAdded(cells) => open += cells.len(),
                Event::ClosedFinalized(cells) => closed += cells.len(),
                Event::BranchFinalized(cells) => branches += cells.len(),
                Event::CurrentExpanding(_) => {}
                Event::Finished { .. } => {
                    finished = SearchReport::from_event(&setup.maze, &event);
                }
            }
        }
        tick += 1;
        println!(
            "tick {:>3}: opened {:>4}, closed {:>4}, branches {:>4}",
            tick, open, closed, branches
        );
        if let Some(report) = finished {
            break report;
        }
    };

    println!("{}", setup.maze.render_with_path(&report.path));
    println!("Steps: {} (expansions: {})", report.moves, report.expansions);
    Ok(())
}
