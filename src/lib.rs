//! Stepwise search over 2-D grid mazes.
//!
//! Four strategies (BFS, DFS, greedy best-first, A*) share one stepping
//! protocol: a [`stepper::SearchStepper`] advances one pop/mark/expand
//! cycle at a time and emits a [`stepper::TraceEvent`] snapshot per step,
//! so a driver can render the frontier, the explored set and the final
//! path as the search unfolds.

// Maze model
// ----------
pub mod grid;

// Search machinery
// ----------------
pub mod algorithm;
pub mod frontier;
pub mod heuristic;
pub mod path;
pub mod stepper;
