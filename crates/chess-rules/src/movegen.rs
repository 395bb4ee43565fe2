//! Pseudo-legal move generation.
//!
//! Candidates obey piece geometry only. Whether a candidate leaves the
//! mover's own king attacked is decided afterwards by the legality filter.
//! Offsets are mailbox deltas: stepping off the board always lands on a
//! border cell, so no range checks are needed.

use crate::castling::{castle_available, CastleSide};
use crate::mov::{Candidate, CandidateList, MoveFlag};
use crate::threats::step;
use crate::Board;
use chess_core::{Color, PieceKind, Square};

pub(crate) const KNIGHT_OFFSETS: [i8; 8] = [-21, -19, -12, -8, 8, 12, 19, 21];
pub(crate) const KING_OFFSETS: [i8; 8] = [-11, -10, -9, -1, 1, 9, 10, 11];
pub(crate) const ROOK_DIRECTIONS: [i8; 4] = [-10, -1, 1, 10];
pub(crate) const BISHOP_DIRECTIONS: [i8; 4] = [-11, -9, 9, 11];

/// First and last interior mailbox indices.
const FIRST_SQUARE: usize = 21;
const LAST_SQUARE: usize = 98;

/// Generates every pseudo-legal candidate for the side to move.
pub(crate) fn pseudo_legal(board: &Board, moves: &mut CandidateList) {
    let us = board.side_to_move();
    let cells = board.cells();

    for index in FIRST_SQUARE..=LAST_SQUARE {
        let piece = cells[index];
        if !piece.is_color(us) {
            continue;
        }
        let from = Square::from_mailbox_unchecked(index);
        match piece.kind() {
            Some(PieceKind::Pawn) => generate_pawn_moves(board, from, moves),
            Some(PieceKind::Knight) => generate_step_moves(board, from, &KNIGHT_OFFSETS, moves),
            Some(PieceKind::Bishop) => {
                generate_slider_moves(board, from, &BISHOP_DIRECTIONS, moves)
            }
            Some(PieceKind::Rook) => generate_slider_moves(board, from, &ROOK_DIRECTIONS, moves),
            Some(PieceKind::Queen) => {
                generate_slider_moves(board, from, &ROOK_DIRECTIONS, moves);
                generate_slider_moves(board, from, &BISHOP_DIRECTIONS, moves);
            }
            Some(PieceKind::King) => generate_step_moves(board, from, &KING_OFFSETS, moves),
            None => {}
        }
    }

    generate_castling_moves(board, moves);
}

/// Pushes a pawn move, expanding it into the four promotions on the last rank.
fn push_pawn_move(from: Square, to: Square, us: Color, moves: &mut CandidateList) {
    if to.rank() == us.promotion_rank() {
        for flag in MoveFlag::PROMOTIONS {
            moves.push(Candidate::new(from, to, flag));
        }
    } else {
        moves.push(Candidate::new(from, to, MoveFlag::Normal));
    }
}

fn generate_pawn_moves(board: &Board, from: Square, moves: &mut CandidateList) {
    let us = board.side_to_move();
    let them = us.opposite();
    let cells = board.cells();
    let push = us.pawn_push();

    // Pushes
    let one = from.offset(push);
    if cells[one].is_empty() {
        push_pawn_move(from, Square::from_mailbox_unchecked(one), us, moves);

        let two = step(one, push);
        if from.rank() == us.pawn_rank() && cells[two].is_empty() {
            moves.push(Candidate::new(
                from,
                Square::from_mailbox_unchecked(two),
                MoveFlag::DoublePush,
            ));
        }
    }

    // Captures, including en passant onto the target square
    for side in [-1, 1] {
        let target = from.offset(push + side);
        let piece = cells[target];
        if piece.is_color(them) {
            push_pawn_move(from, Square::from_mailbox_unchecked(target), us, moves);
        } else if let Some(ep) = board.en_passant().filter(|ep| ep.mailbox() == target) {
            let candidate = Candidate::new(from, ep, MoveFlag::EnPassant);
            if cells[candidate.en_passant_victim().mailbox()].is(PieceKind::Pawn, them) {
                moves.push(candidate);
            }
        }
    }
}

/// Knight and king moves: one step per offset onto an empty or enemy square.
fn generate_step_moves(board: &Board, from: Square, offsets: &[i8], moves: &mut CandidateList) {
    let them = board.side_to_move().opposite();
    let cells = board.cells();

    for &offset in offsets {
        let target = from.offset(offset);
        let piece = cells[target];
        if piece.is_empty() || piece.is_color(them) {
            moves.push(Candidate::new(
                from,
                Square::from_mailbox_unchecked(target),
                MoveFlag::Normal,
            ));
        }
    }
}

/// Walks each direction until the first occupied cell, which is included
/// only when it holds an enemy piece.
fn generate_slider_moves(
    board: &Board,
    from: Square,
    directions: &[i8],
    moves: &mut CandidateList,
) {
    let them = board.side_to_move().opposite();
    let cells = board.cells();

    for &direction in directions {
        let mut target = from.offset(direction);
        loop {
            let piece = cells[target];
            if piece.is_empty() {
                moves.push(Candidate::new(
                    from,
                    Square::from_mailbox_unchecked(target),
                    MoveFlag::Normal,
                ));
            } else {
                if piece.is_color(them) {
                    moves.push(Candidate::new(
                        from,
                        Square::from_mailbox_unchecked(target),
                        MoveFlag::Normal,
                    ));
                }
                break;
            }
            target = step(target, direction);
        }
    }
}

fn generate_castling_moves(board: &Board, moves: &mut CandidateList) {
    let us = board.side_to_move();
    let king = board.king_square(us);

    for side in CastleSide::BOTH {
        if castle_available(board, us, side) {
            moves.push(Candidate::new(king, side.king_target(us), side.flag()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidates(fen: &str) -> Vec<Candidate> {
        let board = Board::from_fen(fen).unwrap();
        let mut list = CandidateList::new();
        pseudo_legal(&board, &mut list);
        list.as_slice().to_vec()
    }

    fn uci(candidate: &Candidate) -> String {
        format!("{}{}", candidate.from, candidate.to)
    }

    #[test]
    fn startpos_has_twenty_candidates() {
        let list = candidates(chess_core::FenParser::STARTPOS);
        assert_eq!(list.len(), 20);
        assert_eq!(
            list.iter()
                .filter(|c| c.flag == MoveFlag::DoublePush)
                .count(),
            8
        );
    }

    #[test]
    fn pawn_double_push_needs_both_squares_empty() {
        let list = candidates("4k3/8/8/8/8/4n3/4P3/4K3 w - - 0 1");
        assert!(!list.iter().any(|c| c.from == Square::from_algebraic("e2").unwrap()));

        let list = candidates("4k3/8/8/8/4n3/8/4P3/4K3 w - - 0 1");
        let pawn: Vec<String> = list
            .iter()
            .filter(|c| c.from == Square::from_algebraic("e2").unwrap())
            .map(uci)
            .collect();
        assert_eq!(pawn, vec!["e2e3"]);
    }

    #[test]
    fn pawn_captures_and_en_passant() {
        let list = candidates("6k1/8/8/4pP2/8/8/8/2K5 w - e6 2 2");
        let ep: Vec<&Candidate> = list
            .iter()
            .filter(|c| c.flag == MoveFlag::EnPassant)
            .collect();
        assert_eq!(ep.len(), 1);
        assert_eq!(uci(ep[0]), "f5e6");
    }

    #[test]
    fn en_passant_requires_a_victim() {
        let list = candidates("6k1/8/8/5P2/8/8/8/2K5 w - e6 0 1");
        assert!(!list.iter().any(|c| c.flag == MoveFlag::EnPassant));
    }

    #[test]
    fn promotions_expand_to_four() {
        let list = candidates("3r3k/4P3/8/8/8/8/8/K7 w - - 0 1");
        let promotions: Vec<&Candidate> = list.iter().filter(|c| c.flag.is_promotion()).collect();
        // Push to e8 and capture on d8.
        assert_eq!(promotions.len(), 8);
    }

    #[test]
    fn sliders_stop_at_first_piece() {
        let list = candidates("4k3/8/8/8/8/8/8/R3K1n1 w - - 0 1");
        let rook: Vec<String> = list
            .iter()
            .filter(|c| c.from == Square::A1)
            .map(uci)
            .collect();
        // Three squares along the rank and seven up the file.
        assert_eq!(rook.len(), 10);
        assert!(!rook.contains(&"a1e1".to_string()));
    }

    #[test]
    fn knight_in_corner() {
        let list = candidates("4k3/8/8/8/8/8/8/N3K3 w - - 0 1");
        let knight = list.iter().filter(|c| c.from == Square::A1).count();
        assert_eq!(knight, 2);
    }

    #[test]
    fn kings_skip_friendly_squares() {
        let list = candidates("4k3/8/8/8/8/8/3PPP2/3QK3 w - - 0 1");
        let king: Vec<String> = list
            .iter()
            .filter(|c| c.from == Square::E1)
            .map(uci)
            .collect();
        assert_eq!(king, vec!["e1f1"]);
    }

    #[test]
    fn castling_candidates() {
        let list = candidates("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
        assert!(list
            .iter()
            .any(|c| c.flag == MoveFlag::CastleKingside && c.to == Square::G1));
        assert!(list
            .iter()
            .any(|c| c.flag == MoveFlag::CastleQueenside && c.to == Square::C1));

        let list = candidates("r3k2r/8/8/8/8/8/8/R3K2R w - - 0 1");
        assert!(!list.iter().any(|c| c.flag.is_castling()));
    }
}
