//! Property tests over random playouts from the starting position.

use chess_rules::{Board, DefaultMoveCache, MoveCache};
use proptest::prelude::*;
use std::sync::Arc;

/// Plays from `start`, picking each move by index modulo the number of legal
/// moves, until the choices run out or the game ends. Returns every position
/// visited, `start` included.
fn playout(start: Board, choices: &[u16]) -> Vec<Board> {
    let mut boards = vec![start];
    for &choice in choices {
        let Some(current) = boards.last() else {
            break;
        };
        let moves = current.legal_moves();
        if moves.is_empty() {
            break;
        }
        let m = moves[choice as usize % moves.len()];
        let next = current.execute(&m).unwrap();
        boards.push(next);
    }
    boards
}

fn choices() -> impl Strategy<Value = Vec<u16>> {
    proptest::collection::vec(any::<u16>(), 0..80)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn fen_round_trip_preserves_position(choices in choices()) {
        for board in playout(Board::startpos(), &choices) {
            let fen = board.to_fen();
            let reparsed = Board::from_fen(&fen).unwrap();
            prop_assert_eq!(reparsed.to_fen(), fen);
            prop_assert_eq!(reparsed.side_to_move(), board.side_to_move());
            prop_assert_eq!(reparsed.castling(), board.castling());
            prop_assert_eq!(reparsed.en_passant(), board.en_passant());
            prop_assert_eq!(reparsed.hash(), board.hash());
            prop_assert_eq!(reparsed.legal_moves(), board.legal_moves());
        }
    }

    #[test]
    fn cache_is_transparent(choices in choices()) {
        let cache = Arc::new(DefaultMoveCache::new());
        let plain = playout(Board::startpos(), &choices);
        let cached = playout(Board::startpos().with_cache(Some(cache.clone())), &choices);
        prop_assert_eq!(plain.len(), cached.len());
        for (a, b) in plain.iter().zip(&cached) {
            prop_assert_eq!(a.legal_moves(), b.legal_moves());
            prop_assert_eq!(a.to_fen(), b.to_fen());
        }
        prop_assert!(cache.len() <= cached.len());
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn check_and_mate_flags_match_the_child(choices in proptest::collection::vec(any::<u16>(), 0..40)) {
        for board in playout(Board::startpos(), &choices) {
            for m in board.legal_moves() {
                let child = board.execute(m).unwrap();
                prop_assert_eq!(m.gives_check(), child.in_check(), "{} in {}", m, board.to_fen());
                prop_assert_eq!(
                    m.is_checkmate(),
                    child.in_check() && child.legal_moves().is_empty(),
                    "{} in {}",
                    m,
                    board.to_fen()
                );
                if m.gives_check() && !m.is_checkmate() {
                    prop_assert!(!child.legal_moves().is_empty());
                }
            }
        }
    }

    #[test]
    fn hash_depends_only_on_position(choices in proptest::collection::vec(any::<u16>(), 0..40)) {
        let boards = playout(Board::startpos(), &choices);
        for board in &boards {
            let again = Board::from_fen(&board.to_fen()).unwrap();
            prop_assert_eq!(again.hash(), board.hash());
            prop_assert_eq!(
                board.hash() == Board::startpos().hash(),
                board.to_fen().split(' ').take(4).eq(Board::startpos().to_fen().split(' ').take(4))
            );
        }
    }
}
