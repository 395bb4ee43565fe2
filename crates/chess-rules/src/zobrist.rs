//! Zobrist hashing for position identification.
//!
//! A position's hash XORs random numbers associated with:
//! - Each piece on each square (6 kinds × 2 colors × 64 squares)
//! - Side to move
//! - Each castling right (4 values)
//! - En passant file (8 values)
//!
//! The keys come from a fixed seed, so a hash is stable across runs and can
//! be persisted as the key of a move cache.

use crate::castling::{CastleSide, CastlingRights};
use crate::Board;
use chess_core::{Color, PieceKind, Square};
use std::sync::OnceLock;

/// Zobrist hash keys.
pub struct ZobristKeys {
    /// Keys for pieces: [piece][color][square]
    pub pieces: [[[u64; 64]; 2]; 6],
    /// Key for black to move (XOR when black to move).
    pub black_to_move: u64,
    /// Keys for castling rights, in `KQkq` order.
    pub castling: [u64; 4],
    /// Keys for en passant file.
    pub en_passant: [u64; 8],
}

impl ZobristKeys {
    /// Seed of the xorshift64 generator the keys are drawn from.
    pub const SEED: u64 = 0x9E3779B97F4A7C15;

    /// Generates the key table from [`Self::SEED`].
    pub const fn new() -> Self {
        const fn next_random(state: u64) -> u64 {
            let mut x = state;
            x ^= x << 13;
            x ^= x >> 7;
            x ^= x << 17;
            x
        }

        let mut state = Self::SEED;
        let mut pieces = [[[0u64; 64]; 2]; 6];
        let mut castling = [0u64; 4];
        let mut en_passant = [0u64; 8];

        let mut piece = 0;
        while piece < 6 {
            let mut color = 0;
            while color < 2 {
                let mut square = 0;
                while square < 64 {
                    state = next_random(state);
                    pieces[piece][color][square] = state;
                    square += 1;
                }
                color += 1;
            }
            piece += 1;
        }

        state = next_random(state);
        let black_to_move = state;

        let mut i = 0;
        while i < 4 {
            state = next_random(state);
            castling[i] = state;
            i += 1;
        }

        let mut i = 0;
        while i < 8 {
            state = next_random(state);
            en_passant[i] = state;
            i += 1;
        }

        ZobristKeys {
            pieces,
            black_to_move,
            castling,
            en_passant,
        }
    }

    /// Returns the key for a piece on a square.
    #[inline]
    pub const fn piece_key(&self, kind: PieceKind, color: Color, square: Square) -> u64 {
        self.pieces[kind.index()][color.index()][square.index()]
    }

    /// Returns the key for one castling right.
    #[inline]
    pub const fn castling_key(&self, color: Color, side: CastleSide) -> u64 {
        self.castling[CastlingRights::index(color, side)]
    }

    /// Returns the key for an en passant file (0-7).
    #[inline]
    pub const fn en_passant_key(&self, file: usize) -> u64 {
        self.en_passant[file]
    }

    /// Computes the full hash of a board.
    pub fn hash(&self, board: &Board) -> u64 {
        let mut hash = 0u64;

        for square in Square::all() {
            let piece = board.piece_at(square);
            if let (Some(kind), Some(color)) = (piece.kind(), piece.color()) {
                hash ^= self.piece_key(kind, color, square);
            }
        }

        if board.side_to_move() == Color::Black {
            hash ^= self.black_to_move;
        }

        let rights = board.castling();
        for color in Color::BOTH {
            for side in CastleSide::BOTH {
                if rights.has(color, side) {
                    hash ^= self.castling_key(color, side);
                }
            }
        }

        if let Some(ep) = board.en_passant() {
            hash ^= self.en_passant_key(ep.file().index() as usize);
        }

        hash
    }
}

impl Default for ZobristKeys {
    fn default() -> Self {
        Self::new()
    }
}

static KEYS: OnceLock<ZobristKeys> = OnceLock::new();

/// Returns the process-wide key table, building it on first use.
///
/// Call once during setup to move the construction cost out of the first
/// hash computation; later calls return the same table.
pub fn keys() -> &'static ZobristKeys {
    KEYS.get_or_init(ZobristKeys::new)
}
