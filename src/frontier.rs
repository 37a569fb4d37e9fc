//! The pending-node container behind every search strategy.
//!
//! The stepping loop is identical across BFS, DFS, Greedy and A*; only the
//! pop order differs. All four live behind one enum so the stepper stays
//! strategy-agnostic.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::collections::VecDeque;

use ordered_float::NotNan;

use crate::grid::Position;

/// Ordering key for the ranked variants. Fifo and Lifo ignore it.
pub type Rank = NotNan<f64>;

/// Min-ordered entry. The derived ordering compares `rank` first and falls
/// back to `seq`, so equal ranks pop in strict insertion order. That
/// tie-break is a documented policy, not an accident of the heap: it is
/// what makes greedy/A* traces reproducible.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct RankedEntry {
    rank: Rank,
    seq: u64,
    pos: Position,
}

#[derive(Clone, Debug, Default)]
pub struct RankedQueue {
    heap: BinaryHeap<Reverse<RankedEntry>>,
    next_seq: u64,
}

impl RankedQueue {
    fn push(&mut self, pos: Position, rank: Rank) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Reverse(RankedEntry { rank, seq, pos }));
    }

    fn pop(&mut self) -> Option<Position> {
        self.heap.pop().map(|Reverse(e)| e.pos)
    }
}

#[derive(Clone, Debug)]
pub enum Frontier {
    /// Pop the earliest push (BFS).
    Fifo(VecDeque<Position>),
    /// Pop the latest push (DFS).
    Lifo(Vec<Position>),
    /// Pop the smallest rank; h for greedy, g+h for A*.
    Ranked(RankedQueue),
}

impl Frontier {
    #[must_use]
    pub fn new_fifo() -> Self {
        Frontier::Fifo(VecDeque::new())
    }
    #[must_use]
    pub fn new_lifo() -> Self {
        Frontier::Lifo(Vec::new())
    }
    #[must_use]
    pub fn new_ranked() -> Self {
        Frontier::Ranked(RankedQueue::default())
    }

    pub fn push(&mut self, pos: Position, rank: Rank) {
        match self {
            Frontier::Fifo(q) => q.push_back(pos),
            Frontier::Lifo(s) => s.push(pos),
            Frontier::Ranked(h) => h.push(pos, rank),
        }
    }

    pub fn pop(&mut self) -> Option<Position> {
        match self {
            Frontier::Fifo(q) => q.pop_front(),
            Frontier::Lifo(s) => s.pop(),
            Frontier::Ranked(h) => h.pop(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Frontier::Fifo(q) => q.len(),
            Frontier::Lifo(s) => s.len(),
            Frontier::Ranked(h) => h.heap.len(),
        }
    }

    /// Snapshot of the pending positions in internal storage order.
    ///
    /// The order is cosmetic (trace rendering); only `pop` carries
    /// semantic ordering.
    #[must_use]
    pub fn positions(&self) -> Vec<Position> {
        match self {
            Frontier::Fifo(q) => q.iter().copied().collect(),
            Frontier::Lifo(s) => s.clone(),
            Frontier::Ranked(h) => h.heap.iter().map(|Reverse(e)| e.pos).collect(),
        }
    }
}
