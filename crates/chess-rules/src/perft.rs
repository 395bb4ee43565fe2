//! Perft (performance test) for move generator validation.
//!
//! Perft counts the number of leaf nodes at a given depth, which can be
//! compared against known-correct values to validate the move generator.

use crate::{Board, Move};

/// Calls `visit` with every move played into a node `depth` plies below
/// `board`. Nothing is visited at depth 0.
fn for_each_leaf_move(board: &Board, depth: u32, visit: &mut impl FnMut(&Move)) {
    match depth {
        0 => {}
        1 => board.legal_moves().iter().for_each(|m| visit(m)),
        _ => {
            for m in board.legal_moves() {
                for_each_leaf_move(&board.child(m.candidate()), depth - 1, visit);
            }
        }
    }
}

/// Counts the positions reachable in exactly `depth` plies.
///
/// Depth 0 counts the position itself.
pub fn perft(board: &Board, depth: u32) -> u64 {
    perft_stats(board, depth).nodes
}

/// Splits [`perft`] by root move, sorted by UCI text.
///
/// Comparing the split against a reference engine narrows a wrong total
/// down to the root move whose subtree disagrees.
pub fn perft_divide(board: &Board, depth: u32) -> Vec<(String, u64)> {
    let mut results: Vec<(String, u64)> = board
        .legal_moves()
        .iter()
        .map(|m| {
            let nodes = perft(&board.child(m.candidate()), depth.saturating_sub(1));
            tracing::trace!("{}: {}", m, nodes);
            (m.to_uci(), nodes)
        })
        .collect();
    results.sort_unstable_by(|a, b| a.0.cmp(&b.0));
    results
}

/// Tallies of the moves played into the leaf nodes of a perft search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PerftStats {
    pub nodes: u64,
    pub captures: u64,
    pub en_passant: u64,
    pub castles: u64,
    pub promotions: u64,
    pub checks: u64,
    pub checkmates: u64,
}

impl PerftStats {
    fn record(&mut self, m: &Move) {
        self.nodes += 1;
        self.captures += u64::from(m.is_capture());
        self.en_passant += u64::from(m.is_en_passant());
        self.castles += u64::from(m.is_castle());
        self.promotions += u64::from(m.promotion().is_some());
        self.checks += u64::from(m.gives_check());
        self.checkmates += u64::from(m.is_checkmate());
    }
}

/// Perft that also classifies the final ply's moves.
///
/// At depth 0 the only node is the position itself and nothing is tallied.
pub fn perft_stats(board: &Board, depth: u32) -> PerftStats {
    let mut stats = PerftStats::default();
    if depth == 0 {
        stats.nodes = 1;
    } else {
        for_each_leaf_move(board, depth, &mut |m| stats.record(m));
    }
    stats
}
