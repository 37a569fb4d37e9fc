//! Goal-distance estimates for the ranked search strategies.
//!
//! Both are admissible on a 4-connected unit-cost grid: Manhattan is exact
//! in the absence of walls, Euclidean is a looser lower bound.

use derive_more::Display;
use ordered_float::NotNan;

use crate::grid::Position;

/// `|Δrow| + |Δcol|`
#[inline(always)]
pub fn manhattan(a: Position, b: Position) -> u32 {
    a.row.abs_diff(b.row) + a.col.abs_diff(b.col)
}

/// `sqrt(Δrow² + Δcol²)`
#[inline(always)]
pub fn euclidean(a: Position, b: Position) -> f64 {
    let dr = a.row.abs_diff(b.row) as f64;
    let dc = a.col.abs_diff(b.col) as f64;
    (dr * dr + dc * dc).sqrt()
}

#[derive(Copy, Clone, Debug, Display, PartialEq, Eq)]
pub enum Heuristic {
    #[display("Manhattan")]
    Manhattan,
    #[display("Euclidean")]
    Euclidean,
}

impl Heuristic {
    /// The estimate as a totally-ordered frontier rank.
    #[inline(always)]
    pub fn estimate(&self, a: Position, b: Position) -> NotNan<f64> {
        let h = match self {
            Heuristic::Manhattan => manhattan(a, b) as f64,
            Heuristic::Euclidean => euclidean(a, b),
        };
        debug_assert!(h.is_finite());
        NotNan::new(h).unwrap_or_default()
    }
}
