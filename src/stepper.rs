//! The step-by-step search driver.
//!
//! One `SearchStepper` owns one run: frontier, explored set, parent links
//! and (for A*) g-scores. Each `advance()` performs exactly one
//! pop/mark/expand cycle and hands back a [`TraceEvent`] snapshot, so an
//! external driver controls pacing and rendering. The maze itself is only
//! borrowed; several steppers can search the same maze independently.

use rustc_hash::FxHashMap;
use rustc_hash::FxHashSet;
use thiserror::Error;

use crate::algorithm::Algorithm;
use crate::algorithm::Strategy;
use crate::frontier::Frontier;
use crate::frontier::Rank;
use crate::grid::Maze;
use crate::grid::Position;
use crate::heuristic::Heuristic;
use crate::path;
use crate::path::PathError;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Constructed, nothing popped yet.
    Init,
    /// Frontier non-empty, goal not yet popped.
    Exploring,
    /// Goal was popped; terminal.
    Found,
    /// Frontier drained without popping the goal; terminal.
    Exhausted,
}

impl Phase {
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::Found | Phase::Exhausted)
    }
}

/// One step's observable state. Immutable once emitted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TraceEvent {
    /// The node popped this step; `None` for the initial and the
    /// exhausted frame.
    pub current: Option<Position>,
    /// Pending nodes in internal storage order (cosmetic).
    pub frontier: Vec<Position>,
    /// Everything popped and expanded so far.
    pub explored: FxHashSet<Position>,
    /// The solution, present only on the `Found` frame.
    pub path: Option<Vec<Position>>,
}

/// Terminal result of a run.
///
/// `path: None` is the normal no-path outcome, not a fault.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchOutcome {
    pub path: Option<Vec<Position>>,
    pub explored: usize,
}

#[derive(Debug, Error)]
pub enum StepError {
    #[error("advance() called after the search terminated")]
    AlreadyTerminated,
    /// Parent-map corruption surfaced during reconstruction. Unreachable
    /// in a correct stepper.
    #[error(transparent)]
    Path(#[from] PathError),
}

pub struct SearchStepper<'m> {
    maze: &'m Maze,
    strategy: Strategy,
    heuristic: Heuristic,

    frontier: Frontier,
    explored: FxHashSet<Position>,
    /// First-reached parent per node; the start maps to `None`. Write-once,
    /// except that A* may re-parent a node while a cheaper path is found
    /// before the node is popped.
    parents: FxHashMap<Position, Option<Position>>,
    /// Best known edge-count from the start. Only populated when the
    /// strategy is cost-aware.
    g_score: FxHashMap<Position, u32>,

    phase: Phase,
    outcome: Option<SearchOutcome>,
}

impl<'m> SearchStepper<'m> {
    #[must_use]
    pub fn new(maze: &'m Maze, algorithm: Algorithm) -> Self {
        Self::with_strategy(maze, algorithm.strategy(), algorithm.heuristic())
    }

    /// Direct construction from strategy parts; lets callers pair any
    /// ranked strategy with the Euclidean heuristic, which the menu in
    /// [`Algorithm`] does not expose.
    #[must_use]
    pub fn with_strategy(maze: &'m Maze, strategy: Strategy, heuristic: Heuristic) -> Self {
        let start = maze.start();

        let mut stepper = Self {
            maze,
            strategy,
            heuristic,
            frontier: strategy.new_frontier(),
            explored: FxHashSet::default(),
            parents: FxHashMap::default(),
            g_score: FxHashMap::default(),
            phase: Phase::Init,
            outcome: None,
        };

        stepper.parents.insert(start, None);
        if strategy.is_cost_aware() {
            stepper.g_score.insert(start, 0);
        }
        let rank = stepper.rank_of(start, 0);
        stepper.frontier.push(start, rank);

        stepper
    }

    /// The "nothing explored yet" frame, renderable before the first
    /// `advance()`.
    #[must_use]
    pub fn initial_event(&self) -> TraceEvent {
        self.event(None, None)
    }

    /// Runs one pop/mark/expand cycle.
    pub fn advance(&mut self) -> Result<TraceEvent, StepError> {
        if self.phase.is_terminal() {
            return Err(StepError::AlreadyTerminated);
        }

        // Ranked frontiers may hold stale duplicates of an already
        // explored node (A* re-ranks by pushing again). Dropping them here
        // keeps the invariant that no node is ever expanded twice.
        let current = loop {
            match self.frontier.pop() {
                None => {
                    self.phase = Phase::Exhausted;
                    self.outcome = Some(SearchOutcome {
                        path: None,
                        explored: self.explored.len(),
                    });
                    log::debug!(
                        "{} exhausted after exploring {} nodes",
                        self.strategy,
                        self.explored.len()
                    );
                    return Ok(self.event(None, None));
                }
                Some(pos) if self.explored.contains(&pos) => continue,
                Some(pos) => break pos,
            }
        };

        self.explored.insert(current);
        self.phase = Phase::Exploring;

        if current == self.maze.goal() {
            let path = path::reconstruct(&self.parents, self.maze.start(), self.maze.goal())?;
            self.phase = Phase::Found;
            self.outcome = Some(SearchOutcome {
                path: Some(path.clone()),
                explored: self.explored.len(),
            });
            log::debug!(
                "{} found a {}-cell path after exploring {} nodes",
                self.strategy,
                path.len(),
                self.explored.len()
            );
            return Ok(self.event(Some(current), Some(path)));
        }

        if self.strategy.is_cost_aware() {
            self.expand_cost_aware(current);
        } else {
            self.expand(current);
        }

        Ok(self.event(Some(current), None))
    }

    /// BFS/DFS/Greedy: a node is seen once, the first parent sticks.
    fn expand(&mut self, current: Position) {
        for n in self.maze.neighbors(current) {
            if self.parents.contains_key(&n) {
                continue;
            }
            self.parents.insert(n, Some(current));
            let rank = self.rank_of(n, 0);
            self.frontier.push(n, rank);
        }
    }

    /// A*: a strictly cheaper path re-parents a not-yet-popped node and
    /// pushes a fresh, better-ranked entry. The stale entry is discarded
    /// when popped.
    fn expand_cost_aware(&mut self, current: Position) {
        debug_assert!(self.g_score.contains_key(&current));
        let g = self.g_score.get(&current).copied().unwrap_or(0);

        for n in self.maze.neighbors(current) {
            if self.explored.contains(&n) {
                continue;
            }
            let tentative = g + 1;
            if let Some(&known) = self.g_score.get(&n) {
                if tentative >= known {
                    continue;
                }
            }
            self.g_score.insert(n, tentative);
            self.parents.insert(n, Some(current));
            let rank = self.rank_of(n, tentative);
            self.frontier.push(n, rank);
        }
    }

    fn rank_of(&self, pos: Position, g: u32) -> Rank {
        match self.strategy {
            Strategy::Bfs | Strategy::Dfs => Rank::default(),
            Strategy::Greedy => self.heuristic.estimate(pos, self.maze.goal()),
            Strategy::AStar => {
                let h = self.heuristic.estimate(pos, self.maze.goal());
                // Finite + finite never makes a NaN.
                Rank::new(g as f64 + h.into_inner()).unwrap_or(h)
            }
        }
    }

    fn event(&self, current: Option<Position>, path: Option<Vec<Position>>) -> TraceEvent {
        TraceEvent {
            current,
            frontier: self.frontier.positions(),
            explored: self.explored.clone(),
            path,
        }
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }
    /// `Some` once the phase is `Found` or `Exhausted`.
    #[must_use]
    pub fn outcome(&self) -> Option<&SearchOutcome> {
        self.outcome.as_ref()
    }
    #[must_use]
    pub fn explored_count(&self) -> usize {
        self.explored.len()
    }
    #[must_use]
    pub fn maze(&self) -> &Maze {
        self.maze
    }
    #[must_use]
    pub fn strategy(&self) -> Strategy {
        self.strategy
    }
    #[must_use]
    pub fn heuristic(&self) -> Heuristic {
        self.heuristic
    }
}

impl std::fmt::Debug for SearchStepper<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "SearchStepper({}, {:?}, |open|={}, |explored|={})",
            self.strategy,
            self.phase,
            self.frontier.len(),
            self.explored.len()
        )
    }
}

/// Yields one `TraceEvent` per step until the run terminates.
impl Iterator for SearchStepper<'_> {
    type Item = TraceEvent;

    fn next(&mut self) -> Option<Self::Item> {
        self.advance().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use indoc::indoc;

    use crate::grid::Grid;
    use crate::path::is_valid_path;

    fn p(row: u32, col: u32) -> Position {
        Position::new(row, col)
    }

    fn corridor() -> Maze {
        // A single straight free corridor down column 1.
        Maze::try_from(indoc! {"
          121
          101
          131
        "})
        .unwrap()
    }

    fn open_room() -> Maze {
        Maze::try_from(indoc! {"
          200
          000
          003
        "})
        .unwrap()
    }

    /// A maze with a short route and a long detour.
    fn two_routes() -> Maze {
        Maze::try_from(indoc! {"
          2000
          0110
          0110
          0003
        "})
        .unwrap()
    }

    fn run(maze: &Maze, algorithm: Algorithm) -> SearchOutcome {
        let mut stepper = SearchStepper::new(maze, algorithm);
        while !stepper.phase().is_terminal() {
            stepper.advance().unwrap();
        }
        stepper.outcome().unwrap().clone()
    }

    fn trace(maze: &Maze, algorithm: Algorithm) -> Vec<TraceEvent> {
        let stepper = SearchStepper::new(maze, algorithm);
        let mut events = vec![stepper.initial_event()];
        events.extend(stepper);
        events
    }

    #[test]
    fn corridor_scenario() {
        let maze = corridor();
        let expected = vec![p(0, 1), p(1, 1), p(2, 1)];

        for algorithm in [Algorithm::Bfs, Algorithm::AStarManhattan] {
            let outcome = run(&maze, algorithm);
            assert_eq!(outcome.path, Some(expected.clone()), "{algorithm}");
            assert_eq!(outcome.explored, 3, "{algorithm}");
        }
    }

    #[test]
    fn every_algorithm_returns_a_valid_path() {
        for maze in [corridor(), open_room(), two_routes()] {
            for algorithm in Algorithm::ALL {
                let outcome = run(&maze, algorithm);
                let path = outcome.path.expect("maze is solvable");
                assert!(is_valid_path(&maze, &path), "{algorithm} on\n{maze}");
            }
        }
    }

    #[test]
    fn bfs_is_shortest_and_astar_matches() {
        for maze in [corridor(), open_room(), two_routes()] {
            let bfs = run(&maze, Algorithm::Bfs).path.unwrap();
            let astar = run(&maze, Algorithm::AStarManhattan).path.unwrap();
            assert_eq!(bfs.len(), astar.len(), "on\n{maze}");
        }
    }

    #[test]
    fn astar_with_euclidean_is_also_shortest() {
        let maze = two_routes();
        let bfs = run(&maze, Algorithm::Bfs).path.unwrap();

        let mut stepper =
            SearchStepper::with_strategy(&maze, Strategy::AStar, Heuristic::Euclidean);
        while !stepper.phase().is_terminal() {
            stepper.advance().unwrap();
        }
        let astar = stepper.outcome().unwrap().path.clone().unwrap();
        assert_eq!(bfs.len(), astar.len());
    }

    #[test]
    fn initial_event_shows_untouched_state() {
        let maze = open_room();
        let stepper = SearchStepper::new(&maze, Algorithm::GreedyManhattan);

        let event = stepper.initial_event();
        assert_eq!(event.current, None);
        assert_eq!(event.frontier, vec![maze.start()]);
        assert!(event.explored.is_empty());
        assert_eq!(event.path, None);
        assert_eq!(stepper.phase(), Phase::Init);
    }

    #[test]
    fn bfs_trace_on_the_corridor() {
        let maze = corridor();
        let events = trace(&maze, Algorithm::Bfs);

        // Initial frame plus one frame per popped node.
        assert_eq!(events.len(), 4);
        assert_eq!(events[0].current, None);
        assert_eq!(events[1].current, Some(p(0, 1)));
        assert_eq!(events[2].current, Some(p(1, 1)));
        assert_eq!(events[3].current, Some(p(2, 1)));
        assert_eq!(events[3].path, Some(vec![p(0, 1), p(1, 1), p(2, 1)]));
        assert!(events[..3].iter().all(|e| e.path.is_none()));
    }

    #[test]
    fn explored_only_grows_and_nothing_is_re_expanded() {
        let maze = two_routes();
        for algorithm in Algorithm::ALL {
            let events = trace(&maze, algorithm);
            for pair in events.windows(2) {
                assert!(pair[0].explored.is_subset(&pair[1].explored), "{algorithm}");
                if let Some(current) = pair[1].current {
                    assert!(!pair[0].explored.contains(&current), "{algorithm}");
                }
            }
        }
    }

    #[test]
    fn traces_are_deterministic() {
        let maze = two_routes();
        for algorithm in Algorithm::ALL {
            assert_eq!(trace(&maze, algorithm), trace(&maze, algorithm), "{algorithm}");
        }
    }

    #[test]
    fn coincident_start_and_goal_finish_in_one_step() {
        let grid = Grid::try_from("00\n00").unwrap();
        let maze = Maze::with_endpoints(grid, p(0, 0), p(0, 0)).unwrap();

        let mut stepper = SearchStepper::new(&maze, Algorithm::Bfs);
        let event = stepper.advance().unwrap();
        assert_eq!(stepper.phase(), Phase::Found);
        assert_eq!(event.path, Some(vec![p(0, 0)]));
        assert_eq!(stepper.outcome().unwrap().explored, 1);
    }

    #[test]
    fn walled_off_goal_exhausts_the_component() {
        // The goal sits behind walls; the start component has 2 cells.
        let maze = Maze::try_from(indoc! {"
          201
          111
          103
        "})
        .unwrap();

        for algorithm in Algorithm::ALL {
            let mut stepper = SearchStepper::new(&maze, algorithm);
            let mut last = None;
            while !stepper.phase().is_terminal() {
                last = Some(stepper.advance().unwrap());
            }

            assert_eq!(stepper.phase(), Phase::Exhausted, "{algorithm}");
            let outcome = stepper.outcome().unwrap();
            assert_eq!(outcome.path, None, "{algorithm}");
            assert_eq!(outcome.explored, 2, "{algorithm}");

            let last = last.unwrap();
            assert_eq!(last.current, None);
            assert!(last.frontier.is_empty());
        }
    }

    #[test]
    fn advancing_a_terminated_stepper_fails() {
        let maze = corridor();
        let mut stepper = SearchStepper::new(&maze, Algorithm::Bfs);
        while !stepper.phase().is_terminal() {
            stepper.advance().unwrap();
        }
        assert!(matches!(
            stepper.advance(),
            Err(StepError::AlreadyTerminated)
        ));
        // The outcome stays available after the failed call.
        assert!(stepper.outcome().is_some());
    }

    #[test]
    fn iterator_stops_at_termination() {
        let maze = corridor();
        let events: Vec<TraceEvent> = SearchStepper::new(&maze, Algorithm::Dfs).collect();
        assert!(!events.is_empty());
        assert!(events.last().unwrap().path.is_some());
    }

    #[test]
    fn steppers_share_a_maze() {
        let maze = open_room();
        let mut a = SearchStepper::new(&maze, Algorithm::Bfs);
        let mut b = SearchStepper::new(&maze, Algorithm::Dfs);
        a.advance().unwrap();
        b.advance().unwrap();
        assert_eq!(a.explored_count(), 1);
        assert_eq!(b.explored_count(), 1);
    }
}
