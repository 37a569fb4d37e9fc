use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::grid::Maze;
use crate::grid::Position;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PathError {
    /// Walking parent links from the goal never reached the start.
    ///
    /// This means the parent map is corrupt. A maze without a path never
    /// gets here; that case surfaces as an exhausted search instead.
    #[error("Parent map does not connect {goal} back to {start}")]
    Disconnected { start: Position, goal: Position },
}

/// Walks parent links from `goal` back to `start` and returns the path in
/// start-to-goal order.
///
/// The walk is bounded by `parents.len() + 1` hops so a cyclic parent map
/// fails instead of looping.
pub fn reconstruct(
    parents: &FxHashMap<Position, Option<Position>>,
    start: Position,
    goal: Position,
) -> Result<Vec<Position>, PathError> {
    let mut path = vec![goal];
    let mut current = goal;

    let max_hops = parents.len() + 1;
    for _ in 0..max_hops {
        if current == start {
            path.reverse();
            return Ok(path);
        }
        match parents.get(&current) {
            Some(Some(parent)) => {
                path.push(*parent);
                current = *parent;
            }
            Some(None) | None => break,
        }
    }

    Err(PathError::Disconnected { start, goal })
}

/// Whether `path` is a valid start-to-goal walk over `maze`.
///
/// Every consecutive pair must be a neighbour move, which also rules out
/// walls and diagonal steps.
#[must_use]
pub fn is_valid_path(maze: &Maze, path: &[Position]) -> bool {
    let (Some(first), Some(last)) = (path.first(), path.last()) else {
        return false;
    };
    if *first != maze.start() || *last != maze.goal() {
        return false;
    }
    path.windows(2)
        .all(|w| maze.neighbors(w[0]).contains(&w[1]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(row: u32, col: u32) -> Position {
        Position::new(row, col)
    }

    #[test]
    fn walks_parents_back_to_start() {
        let mut parents = FxHashMap::default();
        parents.insert(p(0, 0), None);
        parents.insert(p(0, 1), Some(p(0, 0)));
        parents.insert(p(0, 2), Some(p(0, 1)));

        let path = reconstruct(&parents, p(0, 0), p(0, 2)).unwrap();
        assert_eq!(path, vec![p(0, 0), p(0, 1), p(0, 2)]);
    }

    #[test]
    fn start_equal_goal_is_a_single_cell() {
        let mut parents = FxHashMap::default();
        parents.insert(p(1, 1), None);

        let path = reconstruct(&parents, p(1, 1), p(1, 1)).unwrap();
        assert_eq!(path, vec![p(1, 1)]);
    }

    #[test]
    fn broken_parent_chain_is_disconnected() {
        let mut parents = FxHashMap::default();
        parents.insert(p(0, 2), Some(p(0, 1)));
        // (0,1) has no entry, the chain dead-ends before the start

        assert_eq!(
            reconstruct(&parents, p(0, 0), p(0, 2)),
            Err(PathError::Disconnected {
                start: p(0, 0),
                goal: p(0, 2),
            })
        );
    }

    #[test]
    fn cyclic_parent_map_terminates() {
        let mut parents = FxHashMap::default();
        parents.insert(p(0, 1), Some(p(0, 2)));
        parents.insert(p(0, 2), Some(p(0, 1)));

        assert!(reconstruct(&parents, p(0, 0), p(0, 2)).is_err());
    }

    #[test]
    fn path_validity() {
        let maze = Maze::try_from("203").unwrap();
        assert!(is_valid_path(
            &maze,
            &[p(0, 0), p(0, 1), p(0, 2)]
        ));
        // Wrong endpoints
        assert!(!is_valid_path(&maze, &[p(0, 1), p(0, 2)]));
        assert!(!is_valid_path(&maze, &[p(0, 0), p(0, 1)]));
        // Teleporting move
        assert!(!is_valid_path(&maze, &[p(0, 0), p(0, 2)]));
        // Empty
        assert!(!is_valid_path(&maze, &[]));
    }
}
