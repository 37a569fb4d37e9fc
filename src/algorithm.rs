use derive_more::Display;

use crate::frontier::Frontier;
use crate::heuristic::Heuristic;

/// How the frontier orders pending nodes and whether path cost is tracked.
#[derive(Copy, Clone, Debug, Display, PartialEq, Eq)]
pub enum Strategy {
    /// FIFO expansion; optimal in edge count.
    #[display("BFS")]
    Bfs,
    /// LIFO expansion; finds whatever depth-first descent reaches first.
    #[display("DFS")]
    Dfs,
    /// Pop smallest h; ignores accumulated cost, not optimal.
    #[display("Greedy")]
    Greedy,
    /// Pop smallest g+h; optimal with an admissible heuristic.
    #[display("A*")]
    AStar,
}

impl Strategy {
    #[must_use]
    pub(crate) fn new_frontier(&self) -> Frontier {
        match self {
            Strategy::Bfs => Frontier::new_fifo(),
            Strategy::Dfs => Frontier::new_lifo(),
            Strategy::Greedy | Strategy::AStar => Frontier::new_ranked(),
        }
    }

    /// Whether g-scores are tracked and cheaper paths may re-parent a
    /// node before it is popped.
    #[must_use]
    pub fn is_cost_aware(&self) -> bool {
        matches!(self, Strategy::AStar)
    }

    #[must_use]
    pub fn is_ranked(&self) -> bool {
        matches!(self, Strategy::Greedy | Strategy::AStar)
    }
}

/// The closed menu of runnable searches.
///
/// Selection resolves to a `(Strategy, Heuristic)` pair once, at stepper
/// construction. Euclidean-keyed variants are reachable through
/// [`crate::stepper::SearchStepper::with_strategy`]; this menu mirrors the
/// prompt-facing choices.
#[derive(Copy, Clone, Debug, Default, Display, PartialEq, Eq)]
pub enum Algorithm {
    #[default]
    #[display("BFS")]
    Bfs,
    #[display("DFS")]
    Dfs,
    #[display("Greedy (Manhattan)")]
    GreedyManhattan,
    #[display("A* (Manhattan)")]
    AStarManhattan,
}

impl Algorithm {
    pub const ALL: [Algorithm; 4] = [
        Algorithm::Bfs,
        Algorithm::Dfs,
        Algorithm::GreedyManhattan,
        Algorithm::AStarManhattan,
    ];

    #[must_use]
    pub fn strategy(&self) -> Strategy {
        match self {
            Algorithm::Bfs => Strategy::Bfs,
            Algorithm::Dfs => Strategy::Dfs,
            Algorithm::GreedyManhattan => Strategy::Greedy,
            Algorithm::AStarManhattan => Strategy::AStar,
        }
    }

    #[must_use]
    pub fn heuristic(&self) -> Heuristic {
        Heuristic::Manhattan
    }

    /// Lenient selection: menu numbers (`1`..`4`) or names, any case.
    /// Unrecognized input falls back to BFS, the documented default.
    #[must_use]
    pub fn from_choice(choice: &str) -> Algorithm {
        match choice.trim().to_ascii_lowercase().as_str() {
            "1" | "bfs" => Algorithm::Bfs,
            "2" | "dfs" => Algorithm::Dfs,
            "3" | "greedy" | "greedy-manhattan" => Algorithm::GreedyManhattan,
            "4" | "astar" | "a*" | "astar-manhattan" => Algorithm::AStarManhattan,
            other => {
                log::warn!("Unknown algorithm '{other}', defaulting to BFS");
                Algorithm::Bfs
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn choices_map_to_the_menu() {
        assert_eq!(Algorithm::from_choice("1"), Algorithm::Bfs);
        assert_eq!(Algorithm::from_choice("2"), Algorithm::Dfs);
        assert_eq!(Algorithm::from_choice("3"), Algorithm::GreedyManhattan);
        assert_eq!(Algorithm::from_choice("4"), Algorithm::AStarManhattan);
        assert_eq!(Algorithm::from_choice("A*"), Algorithm::AStarManhattan);
        assert_eq!(Algorithm::from_choice(" bfs "), Algorithm::Bfs);
    }

    #[test]
    fn unknown_choice_falls_back_to_bfs() {
        assert_eq!(Algorithm::from_choice("5"), Algorithm::Bfs);
        assert_eq!(Algorithm::from_choice("dijkstra"), Algorithm::Bfs);
        assert_eq!(Algorithm::from_choice(""), Algorithm::Bfs);
    }

    #[test]
    fn only_astar_is_cost_aware() {
        assert!(Strategy::AStar.is_cost_aware());
        for s in [Strategy::Bfs, Strategy::Dfs, Strategy::Greedy] {
            assert!(!s.is_cost_aware());
        }
    }
}
