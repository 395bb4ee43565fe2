//! Immutable chess position on a 10×12 mailbox.

use crate::cache::MoveCache;
use crate::castling::{CastleSide, CastlingRights};
use crate::legality::{self, InvariantError};
use crate::mov::{Candidate, Move, MoveFlag};
use crate::zobrist;
use chess_core::{
    Color, FenError, FenParser, File, Piece, PieceKind, Rank, Square, MAILBOX_SIZE,
};
use std::fmt;
use std::sync::{Arc, OnceLock};
use thiserror::Error;

/// Errors that can occur when executing a move.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MoveError {
    /// The move is not in this position's legal move list.
    #[error("illegal move {0} in this position")]
    Illegal(String),
    /// No legal move has this UCI text.
    #[error("no legal move matches '{0}'")]
    UnknownMove(String),
    /// The move list could not be computed.
    #[error(transparent)]
    Invariant(#[from] InvariantError),
}

/// Back rank of the starting position, from the a-file to the h-file.
const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// A chess position.
///
/// Boards never change after construction. Executing a move returns a new
/// board, so a board can be shared between threads freely. The hash and the
/// legal move list are computed on first use and kept for the board's
/// lifetime.
#[derive(Clone)]
pub struct Board {
    cells: [Piece; MAILBOX_SIZE],
    side_to_move: Color,
    castling: CastlingRights,
    en_passant: Option<Square>,
    halfmove_clock: u32,
    fullmove_number: u32,
    kings: [Square; 2],
    hash: OnceLock<u64>,
    moves: OnceLock<Result<Arc<[Move]>, InvariantError>>,
    cache: Option<Arc<dyn MoveCache>>,
}

impl Board {
    /// A board with every interior cell empty and every border cell invalid.
    fn empty() -> Self {
        let mut cells = [Piece::INVALID; MAILBOX_SIZE];
        for square in Square::all() {
            cells[square.mailbox()] = Piece::EMPTY;
        }
        Board {
            cells,
            side_to_move: Color::White,
            castling: CastlingRights::NONE,
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
            kings: [Square::E1, Square::E8],
            hash: OnceLock::new(),
            moves: OnceLock::new(),
            cache: None,
        }
    }

    /// Creates the standard starting position.
    pub fn startpos() -> Self {
        let mut board = Board::empty();
        for color in Color::BOTH {
            for (file, kind) in File::ALL.into_iter().zip(BACK_RANK) {
                board.cells[Square::new(file, color.back_rank()).mailbox()] =
                    Piece::new(kind, color);
                board.cells[Square::new(file, color.pawn_rank()).mailbox()] =
                    Piece::new(PieceKind::Pawn, color);
            }
        }
        board.castling = CastlingRights::ALL;
        board
    }

    /// Creates a position from a FEN string.
    ///
    /// Kings and rooks are flagged as moved unless the castling field still
    /// grants them a right: a king counts as unmoved only on its home square
    /// with a right for its color, a rook only on a corner whose right is
    /// present.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let parsed = FenParser::parse(fen)?;
        let mut board = Board::empty();
        let castling = CastlingRights::from_fen_field(&parsed.castling);

        for (rank_idx, rank_str) in parsed.piece_placement.split('/').enumerate() {
            let rank = 7 - rank_idx as u8;
            let mut file = 0u8;

            for c in rank_str.chars() {
                if let Some(digit) = c.to_digit(10) {
                    file += digit as u8;
                } else if let Some(piece) = Piece::from_fen_char(c) {
                    if let (Some(file), Some(rank)) = (File::from_index(file), Rank::from_index(rank))
                    {
                        let square = Square::new(file, rank);
                        board.cells[square.mailbox()] = flag_moved(piece, square, castling);
                        if let (Some(PieceKind::King), Some(color)) = (piece.kind(), piece.color()) {
                            board.kings[color.index()] = square;
                        }
                    }
                    file += 1;
                }
            }
        }

        board.side_to_move = parsed.active_color;
        board.castling = castling;
        board.en_passant = parsed.en_passant;
        board.halfmove_clock = parsed.halfmove_clock;
        board.fullmove_number = parsed.fullmove_number;

        tracing::trace!("Parsed board from FEN: {}", fen);
        Ok(board)
    }

    /// Converts the position to a FEN string.
    pub fn to_fen(&self) -> String {
        let mut fen = String::new();

        for rank in Rank::ALL.into_iter().rev() {
            let mut empty_count = 0;
            for file in File::ALL {
                match self.piece_at(Square::new(file, rank)).to_fen_char() {
                    Some(c) => {
                        if empty_count > 0 {
                            fen.push_str(&empty_count.to_string());
                            empty_count = 0;
                        }
                        fen.push(c);
                    }
                    None => empty_count += 1,
                }
            }
            if empty_count > 0 {
                fen.push_str(&empty_count.to_string());
            }
            if rank != Rank::R1 {
                fen.push('/');
            }
        }

        fen.push(' ');
        fen.push(self.side_to_move.to_fen_char());

        fen.push(' ');
        fen.push_str(&self.castling.to_string());

        fen.push(' ');
        match self.en_passant {
            Some(square) => fen.push_str(square.name()),
            None => fen.push('-'),
        }

        fen.push(' ');
        fen.push_str(&self.halfmove_clock.to_string());
        fen.push(' ');
        fen.push_str(&self.fullmove_number.to_string());

        fen
    }

    /// Returns this board with `cache` installed, replacing any previous
    /// cache. Passing `None` disables caching. Boards derived from this one
    /// inherit the cache.
    pub fn with_cache(mut self, cache: Option<Arc<dyn MoveCache>>) -> Self {
        self.cache = cache;
        self
    }

    /// Returns the installed move cache, if any.
    pub fn cache(&self) -> Option<&Arc<dyn MoveCache>> {
        self.cache.as_ref()
    }

    /// Returns the piece on `square`, or [`Piece::EMPTY`].
    #[inline]
    pub fn piece_at(&self, square: Square) -> Piece {
        self.cells[square.mailbox()]
    }

    #[inline]
    pub(crate) fn cells(&self) -> &[Piece; MAILBOX_SIZE] {
        &self.cells
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline]
    pub fn castling(&self) -> CastlingRights {
        self.castling
    }

    /// Returns the en passant target square, if the last move was a double push.
    #[inline]
    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    #[inline]
    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    #[inline]
    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    /// Returns the square of `color`'s king.
    #[inline]
    pub fn king_square(&self, color: Color) -> Square {
        self.kings[color.index()]
    }

    /// Returns the Zobrist hash of this position.
    pub fn hash(&self) -> u64 {
        *self.hash.get_or_init(|| zobrist::keys().hash(self))
    }

    /// Returns the legal moves of this position.
    ///
    /// # Errors
    ///
    /// Returns [`InvariantError`] if classifying a check hits a state the
    /// position's invariants rule out. The result is memoized either way.
    pub fn try_legal_moves(&self) -> Result<&[Move], InvariantError> {
        self.moves
            .get_or_init(|| self.compute_moves())
            .as_deref()
            .map_err(Clone::clone)
    }

    /// Returns the legal moves of this position.
    ///
    /// # Panics
    ///
    /// Panics with the [`InvariantError`] that [`Self::try_legal_moves`] would
    /// return. Boards built from validated FEN or from legal moves never do.
    pub fn legal_moves(&self) -> &[Move] {
        match self.try_legal_moves() {
            Ok(moves) => moves,
            Err(err) => panic!("{}", err),
        }
    }

    fn compute_moves(&self) -> Result<Arc<[Move]>, InvariantError> {
        let Some(cache) = &self.cache else {
            return Ok(legality::generate(self)?.into());
        };

        let hash = self.hash();
        if let Some(moves) = cache.get(hash) {
            return Ok(moves);
        }

        let moves: Arc<[Move]> = legality::generate(self)?.into();
        if let Err(err) = cache.insert(hash, Arc::clone(&moves)) {
            tracing::trace!("Keeping locally computed moves: {}", err);
        }
        Ok(moves)
    }

    /// Finds the legal move with the given UCI text (e.g., "e2e4", "e7e8q").
    pub fn find_move(&self, uci: &str) -> Result<Move, MoveError> {
        let uci = uci.trim().to_ascii_lowercase();
        self.try_legal_moves()?
            .iter()
            .find(|m| m.to_uci() == uci)
            .copied()
            .ok_or(MoveError::UnknownMove(uci))
    }

    /// Executes a legal move, returning the resulting position.
    ///
    /// # Errors
    ///
    /// Returns [`MoveError::Illegal`] if `m` is not one of this position's
    /// legal moves.
    pub fn execute(&self, m: &Move) -> Result<Board, MoveError> {
        if !self.try_legal_moves()?.contains(m) {
            tracing::debug!("Rejected move {} in {}", m, self.to_fen());
            return Err(MoveError::Illegal(m.to_uci()));
        }
        Ok(self.child(m.candidate()))
    }

    /// Returns true if the side to move is in check.
    pub fn in_check(&self) -> bool {
        legality::in_check(self)
    }

    /// Returns true if the side to move is checkmated.
    pub fn is_checkmate(&self) -> bool {
        self.in_check() && self.legal_moves().is_empty()
    }

    /// Returns true if the side to move has no legal move but is not in check.
    pub fn is_stalemate(&self) -> bool {
        !self.in_check() && self.legal_moves().is_empty()
    }

    /// Builds the position after `candidate`. The candidate must be legal.
    pub(crate) fn child(&self, candidate: Candidate) -> Board {
        let us = self.side_to_move;
        let from = candidate.from.mailbox();
        let to = candidate.to.mailbox();
        let piece = self.cells[from];
        let mut cells = self.cells;

        let captured = if candidate.flag == MoveFlag::EnPassant {
            cells[candidate.en_passant_victim().mailbox()] = Piece::EMPTY;
            Piece::new(PieceKind::Pawn, us.opposite())
        } else {
            cells[to]
        };

        cells[from] = Piece::EMPTY;
        cells[to] = match candidate.flag.promotion_piece() {
            Some(kind) => Piece::new(kind, us).moved(),
            None => piece.moved(),
        };

        if let Some(side) = CastleSide::from_flag(candidate.flag) {
            let rook_from = side.rook_square(us).mailbox();
            cells[side.rook_target(us).mailbox()] = cells[rook_from].moved();
            cells[rook_from] = Piece::EMPTY;
        }

        let is_pawn = piece.kind() == Some(PieceKind::Pawn);
        let en_passant = if candidate.flag == MoveFlag::DoublePush {
            Square::from_mailbox(candidate.from.offset(us.pawn_push()))
        } else {
            None
        };

        let mut castling = self.castling;
        let mut kings = self.kings;
        if piece.kind() == Some(PieceKind::King) {
            castling.remove_color(us);
            kings[us.index()] = candidate.to;
        }
        for color in Color::BOTH {
            for side in CastleSide::BOTH {
                let corner = side.rook_square(color);
                if candidate.from == corner || candidate.to == corner {
                    castling.remove(color, side);
                }
            }
        }

        Board {
            cells,
            side_to_move: us.opposite(),
            castling,
            en_passant,
            halfmove_clock: if is_pawn || captured.is_piece() {
                0
            } else {
                self.halfmove_clock.saturating_add(1)
            },
            fullmove_number: match us {
                Color::White => self.fullmove_number,
                Color::Black => self.fullmove_number.saturating_add(1),
            },
            kings,
            hash: OnceLock::new(),
            moves: OnceLock::new(),
            cache: self.cache.clone(),
        }
    }
}

/// Sets the moved bit of kings and rooks that hold no castling right.
fn flag_moved(piece: Piece, square: Square, castling: CastlingRights) -> Piece {
    let (Some(kind), Some(color)) = (piece.kind(), piece.color()) else {
        return piece;
    };
    let unmoved = match kind {
        PieceKind::King => {
            square == Square::new(File::E, color.back_rank()) && castling.any(color)
        }
        PieceKind::Rook => CastleSide::BOTH
            .into_iter()
            .any(|side| square == side.rook_square(color) && castling.has(color, side)),
        _ => true,
    };
    if unmoved {
        piece
    } else {
        piece.moved()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::startpos()
    }
}

impl PartialEq for Board {
    fn eq(&self, other: &Self) -> bool {
        self.cells == other.cells
            && self.side_to_move == other.side_to_move
            && self.castling == other.castling
            && self.en_passant == other.en_passant
            && self.halfmove_clock == other.halfmove_clock
            && self.fullmove_number == other.fullmove_number
    }
}

impl Eq for Board {}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Board")
            .field("fen", &self.to_fen())
            .field("cached", &self.cache.is_some())
            .finish()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in Rank::ALL.into_iter().rev() {
            for file in File::ALL {
                let c = self.piece_at(Square::new(file, rank)).to_fen_char().unwrap_or('.');
                write!(f, "{}", c)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
