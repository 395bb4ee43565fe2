//! Move representation.
//!
//! A [`Candidate`] is a pseudo-legal movement produced by the generator.
//! A [`Move`] is a candidate that survived the legality filter, annotated
//! with the moving and captured pieces and its check/mate classification.
//! Moves are never constructed outside this crate.

use chess_core::{Color, Piece, PieceKind, Square};
use std::fmt;

/// Flags for special move types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MoveFlag {
    /// Normal move (no special action).
    Normal = 0,
    /// Pawn double push from starting rank.
    DoublePush = 1,
    /// Kingside castling (O-O).
    CastleKingside = 2,
    /// Queenside castling (O-O-O).
    CastleQueenside = 3,
    /// En passant capture.
    EnPassant = 4,
    /// Pawn promotion to knight.
    PromoteKnight = 5,
    /// Pawn promotion to bishop.
    PromoteBishop = 6,
    /// Pawn promotion to rook.
    PromoteRook = 7,
    /// Pawn promotion to queen.
    PromoteQueen = 8,
}

impl MoveFlag {
    /// Promotion flags in the order the generator emits them.
    pub(crate) const PROMOTIONS: [MoveFlag; 4] = [
        MoveFlag::PromoteQueen,
        MoveFlag::PromoteRook,
        MoveFlag::PromoteBishop,
        MoveFlag::PromoteKnight,
    ];

    /// Returns the promotion piece if this is a promotion move.
    #[inline]
    pub const fn promotion_piece(self) -> Option<PieceKind> {
        match self {
            MoveFlag::PromoteKnight => Some(PieceKind::Knight),
            MoveFlag::PromoteBishop => Some(PieceKind::Bishop),
            MoveFlag::PromoteRook => Some(PieceKind::Rook),
            MoveFlag::PromoteQueen => Some(PieceKind::Queen),
            _ => None,
        }
    }

    /// Returns true if this is a promotion move.
    #[inline]
    pub const fn is_promotion(self) -> bool {
        self.promotion_piece().is_some()
    }

    /// Returns true if this is a castling move.
    #[inline]
    pub const fn is_castling(self) -> bool {
        matches!(self, MoveFlag::CastleKingside | MoveFlag::CastleQueenside)
    }
}

/// A pseudo-legal movement: geometry only, not yet checked for self-check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct Candidate {
    pub from: Square,
    pub to: Square,
    pub flag: MoveFlag,
}

impl Candidate {
    const NULL: Candidate = Candidate {
        from: Square::A1,
        to: Square::A1,
        flag: MoveFlag::Normal,
    };

    #[inline]
    pub const fn new(from: Square, to: Square, flag: MoveFlag) -> Self {
        Candidate { from, to, flag }
    }

    /// Square of the pawn removed by an en passant capture.
    #[inline]
    pub const fn en_passant_victim(self) -> Square {
        Square::new(self.to.file(), self.from.rank())
    }
}

/// A list of candidates with a fixed maximum capacity.
///
/// Chess positions have at most 218 legal moves, and pseudo-legal counts stay
/// well below the capacity, so generation never touches the heap.
#[derive(Clone)]
pub(crate) struct CandidateList {
    moves: [Candidate; Self::MAX_MOVES],
    len: usize,
}

impl CandidateList {
    pub const MAX_MOVES: usize = 256;

    #[inline]
    pub const fn new() -> Self {
        CandidateList {
            moves: [Candidate::NULL; Self::MAX_MOVES],
            len: 0,
        }
    }

    #[inline]
    pub fn push(&mut self, candidate: Candidate) {
        debug_assert!(self.len < Self::MAX_MOVES);
        self.moves[self.len] = candidate;
        self.len += 1;
    }

    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn as_slice(&self) -> &[Candidate] {
        &self.moves[..self.len]
    }
}

impl<'a> IntoIterator for &'a CandidateList {
    type Item = &'a Candidate;
    type IntoIter = std::slice::Iter<'a, Candidate>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl fmt::Debug for CandidateList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

/// A strictly legal move.
///
/// The moving and captured pieces are stored without their "has moved" bit,
/// so identical positions reached by different move orders produce identical
/// move lists.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    from: Square,
    to: Square,
    flag: MoveFlag,
    piece: Piece,
    captured: Piece,
    check: bool,
    checkmate: bool,
}

impl Move {
    pub(crate) fn new(
        candidate: Candidate,
        piece: Piece,
        captured: Piece,
        check: bool,
        checkmate: bool,
    ) -> Self {
        Move {
            from: candidate.from,
            to: candidate.to,
            flag: candidate.flag,
            piece: piece.unmoved(),
            captured: captured.unmoved(),
            check,
            checkmate,
        }
    }

    pub(crate) const fn candidate(&self) -> Candidate {
        Candidate::new(self.from, self.to, self.flag)
    }

    /// Returns the source square.
    #[inline]
    pub const fn from(&self) -> Square {
        self.from
    }

    /// Returns the destination square.
    #[inline]
    pub const fn to(&self) -> Square {
        self.to
    }

    /// Returns the move flag.
    #[inline]
    pub const fn flag(&self) -> MoveFlag {
        self.flag
    }

    /// Returns the moving piece as it stood before the move.
    #[inline]
    pub const fn piece(&self) -> Piece {
        self.piece
    }

    /// Returns the color of the side making the move.
    #[inline]
    pub fn color(&self) -> Option<Color> {
        self.piece.color()
    }

    /// Returns the captured piece, if any.
    ///
    /// For en passant this is the pawn removed from beside the destination.
    #[inline]
    pub const fn captured(&self) -> Option<Piece> {
        if self.captured.is_piece() {
            Some(self.captured)
        } else {
            None
        }
    }

    #[inline]
    pub const fn is_capture(&self) -> bool {
        self.captured.is_piece()
    }

    #[inline]
    pub const fn is_en_passant(&self) -> bool {
        matches!(self.flag, MoveFlag::EnPassant)
    }

    #[inline]
    pub const fn is_castle(&self) -> bool {
        self.flag.is_castling()
    }

    #[inline]
    pub const fn promotion(&self) -> Option<PieceKind> {
        self.flag.promotion_piece()
    }

    /// Returns true if the move attacks the opponent's king.
    #[inline]
    pub const fn gives_check(&self) -> bool {
        self.check
    }

    /// Returns true if the move leaves the opponent without a legal reply
    /// while in check.
    #[inline]
    pub const fn is_checkmate(&self) -> bool {
        self.checkmate
    }

    /// Returns the origin square in algebraic notation (e.g., "e2").
    #[inline]
    pub const fn algebraic_from(&self) -> &'static str {
        self.from.name()
    }

    /// Returns the destination square in algebraic notation (e.g., "e4").
    #[inline]
    pub const fn algebraic_to(&self) -> &'static str {
        self.to.name()
    }

    /// Returns the UCI notation for this move (e.g., "e2e4", "e7e8q").
    pub fn to_uci(&self) -> String {
        match self.promotion() {
            Some(kind) => format!(
                "{}{}{}",
                self.from,
                self.to,
                kind.to_fen_char(Color::Black)
            ),
            None => format!("{}{}", self.from, self.to),
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_uci())
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({}", self.to_uci())?;
        if self.flag != MoveFlag::Normal {
            write!(f, ", {:?}", self.flag)?;
        }
        if let Some(captured) = self.captured() {
            write!(f, ", x{:?}", captured)?;
        }
        if self.checkmate {
            write!(f, ", #")?;
        } else if self.check {
            write!(f, ", +")?;
        }
        write!(f, ")")
    }
}
