use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use indoc::indoc;
use owo_colors::OwoColorize;

use maze_stepper::algorithm::Algorithm;
use maze_stepper::grid::Maze;
use maze_stepper::grid::Position;
use maze_stepper::stepper::SearchStepper;
use maze_stepper::stepper::TraceEvent;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Maze file (`0` free, `1` wall, `2` start, `3` goal). A built-in
    /// demo maze is used when omitted.
    #[arg()]
    pub maze: Option<PathBuf>,

    /// Algorithm: 1/bfs, 2/dfs, 3/greedy, 4/astar.
    /// Unknown values fall back to BFS.
    #[arg(short, long, env = "ALGORITHM", default_value = "bfs")]
    pub algorithm: String,

    /// Milliseconds between animation frames.
    #[arg(short, long, default_value_t = 120)]
    pub delay: u64,

    /// Skip the animation and print only the outcome.
    #[arg(short, long)]
    pub quiet: bool,
}

const DEMO_MAZE: &str = indoc! {"
  20001
  11101
  10001
  10111
  30001
"};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let text = match &args.maze {
        Some(path) => std::fs::read_to_string(path)?,
        None => DEMO_MAZE.to_string(),
    };
    let maze = Maze::try_from(text.as_str())?;
    let algorithm = Algorithm::from_choice(&args.algorithm);

    let (rows, cols) = maze.grid().dimensions();
    println!("{algorithm} over a {rows}x{cols} maze");

    let mut stepper = SearchStepper::new(&maze, algorithm);
    if !args.quiet {
        show_frame(&maze, &stepper.initial_event(), args.delay);
    }
    while !stepper.phase().is_terminal() {
        let event = stepper.advance()?;
        if !args.quiet {
            show_frame(&maze, &event, args.delay);
        }
    }

    // The stepper just terminated, so the outcome is always present.
    if let Some(outcome) = stepper.outcome() {
        match &outcome.path {
            Some(path) => println!(
                "Found a path of {} cells after exploring {} nodes",
                path.len(),
                outcome.explored
            ),
            None => println!(
                "No path; explored all {} reachable nodes",
                outcome.explored
            ),
        }
    }

    Ok(())
}

fn show_frame(maze: &Maze, event: &TraceEvent, delay_ms: u64) {
    // Repaint in place
    print!("\x1b[H\x1b[2J");
    println!("{}", render(maze, event));
    std::thread::sleep(Duration::from_millis(delay_ms));
}

/// Paints one trace frame, mirroring the original animation's palette:
/// blue frontier, gray explored, red path, green start, yellow goal and an
/// orange current node.
fn render(maze: &Maze, event: &TraceEvent) -> String {
    use std::fmt::Write;

    let (rows, cols) = maze.grid().dimensions();
    let path: &[Position] = event.path.as_deref().unwrap_or(&[]);

    let mut out = String::new();
    for row in 0..rows {
        for col in 0..cols {
            let pos = Position::new(row, col);
            // Precedence: current, path, frontier, explored, endpoints.
            let cell = if event.current == Some(pos) {
                format!("{}", "██".truecolor(255, 165, 0))
            } else if path.contains(&pos) {
                format!("{}", "██".red())
            } else if event.frontier.contains(&pos) {
                format!("{}", "░░".blue())
            } else if event.explored.contains(&pos) {
                format!("{}", "▒▒".bright_black())
            } else if pos == maze.start() {
                format!("{}", "██".green())
            } else if pos == maze.goal() {
                format!("{}", "██".yellow())
            } else if maze.grid().classify(pos).is_traversable() {
                "  ".to_string()
            } else {
                "██".to_string()
            };
            let _ = write!(out, "{cell}");
        }
        let _ = writeln!(out);
    }
    out
}
