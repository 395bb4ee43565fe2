//! Legality filter and check/checkmate classification.
//!
//! Each pseudo-legal candidate is replayed through an [`Overlay`] on the
//! current board: illegal if the mover's king ends up attacked, a check if
//! the opponent's king does. Checks are then classified as mate or not with
//! a single materialized child board, looking exactly one ply ahead.

use crate::castling::CastleSide;
use crate::mov::{Candidate, CandidateList, Move, MoveFlag};
use crate::movegen::{self, KING_OFFSETS};
use crate::threats::{self, is_attacked, step, Overlay, View};
use crate::Board;
use chess_core::{Color, Piece, PieceKind, Square};
use thiserror::Error;

/// The board reached a state its own invariants rule out.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvariantError {
    #[error("{color} king on {square} is in check but no checking piece was found")]
    CheckWithoutCheckers { color: Color, square: Square },
}

/// Describes `candidate` as played on `board`.
///
/// Returns the overlay and the mover's king square after the move.
fn overlay_for(board: &Board, candidate: Candidate) -> (Overlay, usize) {
    let us = board.side_to_move();
    let cells = board.cells();
    let from = candidate.from.mailbox();
    let to = candidate.to.mailbox();
    let piece = cells[from];

    let placed = match candidate.flag.promotion_piece() {
        Some(kind) => Piece::new(kind, us),
        None => piece,
    };
    let mut overlay = Overlay::NONE.vacate(from).place(to, placed);

    if candidate.flag == MoveFlag::EnPassant {
        overlay = overlay.vacate(candidate.en_passant_victim().mailbox());
    }
    if let Some(side) = CastleSide::from_flag(candidate.flag) {
        let rook_from = side.rook_square(us).mailbox();
        overlay = overlay
            .vacate(rook_from)
            .place(side.rook_target(us).mailbox(), cells[rook_from]);
    }

    let king = if piece.kind() == Some(PieceKind::King) {
        to
    } else {
        board.king_square(us).mailbox()
    };
    (overlay, king)
}

/// Returns true if `candidate` does not leave the mover's king attacked.
pub(crate) fn is_legal(board: &Board, candidate: Candidate) -> bool {
    let (overlay, king) = overlay_for(board, candidate);
    let view = View::new(board.cells(), overlay);
    !is_attacked(&view, king, board.side_to_move().opposite())
}

/// Filters and annotates one candidate. Returns `None` for illegal moves.
pub(crate) fn classify(
    board: &Board,
    candidate: Candidate,
) -> Result<Option<Move>, InvariantError> {
    let us = board.side_to_move();
    let them = us.opposite();
    let cells = board.cells();

    let (overlay, king) = overlay_for(board, candidate);
    let view = View::new(cells, overlay);
    if is_attacked(&view, king, them) {
        return Ok(None);
    }

    let check = is_attacked(&view, board.king_square(them).mailbox(), us);
    let checkmate = check && is_mate(&board.child(candidate))?;

    let captured = if candidate.flag == MoveFlag::EnPassant {
        Piece::new(PieceKind::Pawn, them)
    } else {
        cells[candidate.to.mailbox()]
    };

    Ok(Some(Move::new(
        candidate,
        cells[candidate.from.mailbox()],
        captured,
        check,
        checkmate,
    )))
}

/// Generates the strictly legal, classified moves of `board`.
pub(crate) fn generate(board: &Board) -> Result<Vec<Move>, InvariantError> {
    let mut candidates = CandidateList::new();
    movegen::pseudo_legal(board, &mut candidates);

    let mut moves = Vec::with_capacity(candidates.len());
    for &candidate in &candidates {
        if let Some(m) = classify(board, candidate)? {
            moves.push(m);
        }
    }
    Ok(moves)
}

/// Returns true if the side to move on `board` is in check.
pub(crate) fn in_check(board: &Board) -> bool {
    let us = board.side_to_move();
    let view = View::new(board.cells(), Overlay::NONE);
    is_attacked(&view, board.king_square(us).mailbox(), us.opposite())
}

/// Decides whether the side to move, known to be in check, has no escape.
///
/// Escapes are, in order: a king step to a square that is not attacked once
/// the king has left its own square; with a single checker, a legal capture
/// of the checker; with a single sliding checker, a legal interposition.
/// Replies are tested for legality only, never classified, so this never
/// looks further than one ply.
fn is_mate(board: &Board) -> Result<bool, InvariantError> {
    let defender = board.side_to_move();
    let attacker = defender.opposite();
    let cells = board.cells();
    let king = board.king_square(defender);
    let king_index = king.mailbox();

    let checkers = threats::checkers(&View::new(cells, Overlay::NONE), king_index, attacker);
    let checker = match checkers.as_slice() {
        [] => {
            return Err(InvariantError::CheckWithoutCheckers {
                color: defender,
                square: king,
            })
        }
        [single] => Some(*single),
        _ => None,
    };

    let king_piece = cells[king_index];
    for offset in KING_OFFSETS {
        let target = step(king_index, offset);
        let occupant = cells[target];
        if occupant.is_invalid() || occupant.is_color(defender) {
            continue;
        }
        let overlay = Overlay::NONE.vacate(king_index).place(target, king_piece);
        if !is_attacked(&View::new(cells, overlay), target, attacker) {
            return Ok(false);
        }
    }

    // Double check: only the king can move out of it.
    let Some(checker) = checker else {
        return Ok(true);
    };
    let sliding = cells[checker.mailbox()]
        .kind()
        .is_some_and(PieceKind::is_slider);

    let mut replies = CandidateList::new();
    movegen::pseudo_legal(board, &mut replies);
    for &reply in &replies {
        if reply.from == king {
            continue;
        }
        let captures = reply.to == checker
            || (reply.flag == MoveFlag::EnPassant && reply.en_passant_victim() == checker);
        let blocks = sliding && checker.is_between(king, reply.to);
        if (captures || blocks) && is_legal(board, reply) {
            return Ok(false);
        }
    }

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mate_after(fen: &str, uci: &str) -> bool {
        let board = Board::from_fen(fen).unwrap();
        let m = board.find_move(uci).unwrap();
        assert!(m.gives_check(), "{} should give check", uci);
        m.is_checkmate()
    }

    #[test]
    fn pinned_piece_cannot_move() {
        // The e2 knight is pinned by the e8 rook.
        let board = Board::from_fen("4r1k1/8/8/8/8/8/4N3/4K3 w - - 0 1").unwrap();
        let knight = Square::from_algebraic("e2").unwrap();
        assert!(board.legal_moves().iter().all(|m| m.from() != knight));
    }

    #[test]
    fn king_cannot_step_next_to_king() {
        let board = Board::from_fen("8/8/8/4k3/8/4K3/8/8 w - - 0 1").unwrap();
        let targets: Vec<&str> = board
            .legal_moves()
            .iter()
            .map(|m| m.algebraic_to())
            .collect();
        for forbidden in ["d4", "e4", "f4"] {
            assert!(!targets.contains(&forbidden), "{}", forbidden);
        }
        assert_eq!(targets.len(), 5);
    }

    #[test]
    fn en_passant_discovered_check_is_illegal() {
        // Taking on d6 would open the fifth rank to the h5 rook.
        let board = Board::from_fen("8/8/8/K2pP2r/8/8/8/7k w - d6 0 1").unwrap();
        assert!(!board.legal_moves().iter().any(Move::is_en_passant));
    }

    #[test]
    fn castling_rook_gives_check() {
        let board = Board::from_fen("5k2/8/8/8/8/8/8/4K2R w K - 0 1").unwrap();
        let castle = board.find_move("e1g1").unwrap();
        assert!(castle.is_castle());
        assert!(castle.gives_check());
        assert!(!castle.is_checkmate());
    }

    #[test]
    fn scholars_mate() {
        assert!(mate_after(
            "r1bqkbnr/pppp1ppp/2n5/4p3/2B1P3/5Q2/PPPP1PPP/RNB1K1NR w KQkq - 2 3",
            "f3f7"
        ));
    }

    #[test]
    fn fools_mate() {
        assert!(mate_after(
            "rnbqkbnr/pppp1ppp/8/4p3/6P1/5P2/PPPPP2P/RNBQKBNR b KQkq - 0 2",
            "d8h4"
        ));
    }

    #[test]
    fn back_rank_mate() {
        assert!(mate_after("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1", "a1a8"));
    }

    #[test]
    fn block_avoids_mate() {
        // The d6 bishop can interpose on b8 or f8.
        assert!(!mate_after("6k1/5ppp/3b4/8/8/8/8/R5K1 w - - 0 1", "a1a8"));
    }

    #[test]
    fn capture_avoids_mate() {
        // The b6 knight takes the checking rook.
        assert!(!mate_after("6k1/5ppp/1n6/8/8/8/8/R5K1 w - - 0 1", "a1a8"));
    }

    #[test]
    fn pinned_defender_does_not_save() {
        // The b7 bishop could block on c8 but is pinned by the b1 rook.
        assert!(mate_after("1k6/pbp5/8/8/8/8/8/KR4R1 w - - 0 1", "g1g8"));
    }

    #[test]
    fn double_check_only_king_escapes() {
        // Nd6 checks and uncovers the e1 rook; Bxd6 removes only one checker.
        assert!(mate_after("3qkb2/3p1p2/8/8/4N3/8/8/4R1K1 w - - 0 1", "e4d6"));
        // Without the rook the same knight check is answered by Bxd6.
        assert!(!mate_after("3qkb2/3p1p2/8/8/4N3/8/8/6K1 w - - 0 1", "e4d6"));
    }

    #[test]
    fn king_escape_avoids_mate() {
        assert!(!mate_after("6k1/8/8/8/8/8/8/R5K1 w - - 0 1", "a1a8"));
    }

    #[test]
    fn en_passant_capture_of_checker_avoids_mate() {
        // Black's d7-d5 checks the e4 king; exd6 removes the checker.
        let board = Board::from_fen("8/3p4/8/4P3/4K3/8/8/7k b - - 0 1").unwrap();
        let push = board.find_move("d7d5").unwrap();
        assert!(push.gives_check());
        assert!(!push.is_checkmate());
        let child = board.execute(&push).unwrap();
        assert!(child.legal_moves().iter().any(Move::is_en_passant));
    }

    #[test]
    fn check_without_checkers_is_an_invariant_error() {
        let board = Board::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        assert_eq!(
            is_mate(&board),
            Err(InvariantError::CheckWithoutCheckers {
                color: Color::White,
                square: Square::E1,
            })
        );
    }
}
