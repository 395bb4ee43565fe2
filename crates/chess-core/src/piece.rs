//! Chess piece representation.
//!
//! [`PieceKind`] names the six piece types. [`Piece`] is the value stored in
//! each board cell: a packed byte combining kind, color and a "has moved"
//! bit, with two sentinels ([`Piece::EMPTY`] and [`Piece::INVALID`]) that
//! never collide with a real piece.

use crate::Color;
use std::fmt;

/// The six types of chess pieces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PieceKind {
    Pawn = 0,
    Knight = 1,
    Bishop = 2,
    Rook = 3,
    Queen = 4,
    King = 5,
}

impl PieceKind {
    /// All piece types in order.
    pub const ALL: [PieceKind; 6] = [
        PieceKind::Pawn,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
    ];

    /// Returns the index of this piece type (0-5).
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Returns the FEN character for this piece with the given color.
    pub const fn to_fen_char(self, color: Color) -> char {
        let c = match self {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        };
        match color {
            Color::White => c.to_ascii_uppercase(),
            Color::Black => c,
        }
    }

    /// Parses a FEN character into a piece type and color.
    pub const fn from_fen_char(c: char) -> Option<(PieceKind, Color)> {
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        let kind = match c.to_ascii_lowercase() {
            'p' => PieceKind::Pawn,
            'n' => PieceKind::Knight,
            'b' => PieceKind::Bishop,
            'r' => PieceKind::Rook,
            'q' => PieceKind::Queen,
            'k' => PieceKind::King,
            _ => return None,
        };
        Some((kind, color))
    }

    /// Returns true if this piece is a sliding piece (bishop, rook, or queen).
    #[inline]
    pub const fn is_slider(self) -> bool {
        matches!(self, PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen)
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PieceKind::Pawn => "Pawn",
            PieceKind::Knight => "Knight",
            PieceKind::Bishop => "Bishop",
            PieceKind::Rook => "Rook",
            PieceKind::Queen => "Queen",
            PieceKind::King => "King",
        };
        write!(f, "{}", name)
    }
}

/// Contents of one board cell.
///
/// Layout: bits 0-2 hold the kind (0 = none, 1-6 = pawn..king), bit 3 is
/// set once the piece has moved, bit 7 is set for black.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece(u8);

impl Piece {
    const KIND_MASK: u8 = 0b0000_0111;
    const MOVED: u8 = 0b0000_1000;
    const BLACK: u8 = 0b1000_0000;

    /// An empty interior square.
    pub const EMPTY: Piece = Piece(0);

    /// A border cell of the mailbox.
    pub const INVALID: Piece = Piece(0xFF);

    /// Creates an unmoved piece.
    #[inline]
    pub const fn new(kind: PieceKind, color: Color) -> Self {
        let color_bit = match color {
            Color::White => 0,
            Color::Black => Self::BLACK,
        };
        Piece((kind as u8 + 1) | color_bit)
    }

    /// Returns the piece type, or `None` for either sentinel.
    #[inline]
    pub const fn kind(self) -> Option<PieceKind> {
        if self.is_invalid() {
            return None;
        }
        match self.0 & Self::KIND_MASK {
            1 => Some(PieceKind::Pawn),
            2 => Some(PieceKind::Knight),
            3 => Some(PieceKind::Bishop),
            4 => Some(PieceKind::Rook),
            5 => Some(PieceKind::Queen),
            6 => Some(PieceKind::King),
            _ => None,
        }
    }

    /// Returns the piece color, or `None` for either sentinel.
    #[inline]
    pub const fn color(self) -> Option<Color> {
        if self.is_empty() || self.is_invalid() {
            None
        } else if self.0 & Self::BLACK != 0 {
            Some(Color::Black)
        } else {
            Some(Color::White)
        }
    }

    /// Returns true if the piece has moved since the position was set up.
    #[inline]
    pub const fn has_moved(self) -> bool {
        !self.is_invalid() && self.0 & Self::MOVED != 0
    }

    /// Returns this piece with the moved bit set. Sentinels are unchanged.
    #[inline]
    pub const fn moved(self) -> Self {
        if self.is_empty() || self.is_invalid() {
            self
        } else {
            Piece(self.0 | Self::MOVED)
        }
    }

    /// Returns this piece with the moved bit cleared. Sentinels are unchanged.
    #[inline]
    pub const fn unmoved(self) -> Self {
        if self.is_invalid() {
            self
        } else {
            Piece(self.0 & !Self::MOVED)
        }
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == Self::EMPTY.0
    }

    #[inline]
    pub const fn is_invalid(self) -> bool {
        self.0 == Self::INVALID.0
    }

    /// Returns true if this is a real piece (neither sentinel).
    #[inline]
    pub const fn is_piece(self) -> bool {
        !self.is_empty() && !self.is_invalid()
    }

    /// Returns true if this is a piece of the given kind and color, moved or not.
    #[inline]
    pub const fn is(self, kind: PieceKind, color: Color) -> bool {
        self.unmoved().0 == Piece::new(kind, color).0
    }

    /// Returns true if this is a piece of the given color.
    #[inline]
    pub fn is_color(self, color: Color) -> bool {
        self.color() == Some(color)
    }

    /// Returns the FEN character, or `None` for either sentinel.
    pub fn to_fen_char(self) -> Option<char> {
        Some(self.kind()?.to_fen_char(self.color()?))
    }

    /// Parses an unmoved piece from its FEN character.
    pub const fn from_fen_char(c: char) -> Option<Self> {
        match PieceKind::from_fen_char(c) {
            Some((kind, color)) => Some(Piece::new(kind, color)),
            None => None,
        }
    }
}

impl Default for Piece {
    fn default() -> Self {
        Piece::EMPTY
    }
}

impl fmt::Debug for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_invalid() {
            return write!(f, "Piece(invalid)");
        }
        match self.to_fen_char() {
            Some(c) if self.has_moved() => write!(f, "Piece({}*)", c),
            Some(c) => write!(f, "Piece({})", c),
            None => write!(f, "Piece(empty)"),
        }
    }
}
