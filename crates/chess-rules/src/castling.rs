//! Castling rights and the castling availability rule.

use crate::mov::MoveFlag;
use crate::threats::{is_attacked, step, Overlay, View};
use crate::Board;
use chess_core::{Color, File, PieceKind, Square};
use std::fmt;

/// The two directions a king can castle in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CastleSide {
    Kingside,
    Queenside,
}

impl CastleSide {
    pub const BOTH: [CastleSide; 2] = [CastleSide::Kingside, CastleSide::Queenside];

    /// The corner the castling rook starts on.
    #[inline]
    pub const fn rook_square(self, color: Color) -> Square {
        match self {
            CastleSide::Kingside => Square::new(File::H, color.back_rank()),
            CastleSide::Queenside => Square::new(File::A, color.back_rank()),
        }
    }

    /// The square the king lands on.
    #[inline]
    pub const fn king_target(self, color: Color) -> Square {
        match self {
            CastleSide::Kingside => Square::new(File::G, color.back_rank()),
            CastleSide::Queenside => Square::new(File::C, color.back_rank()),
        }
    }

    /// The square the rook lands on: the one the king crosses.
    #[inline]
    pub const fn rook_target(self, color: Color) -> Square {
        match self {
            CastleSide::Kingside => Square::new(File::F, color.back_rank()),
            CastleSide::Queenside => Square::new(File::D, color.back_rank()),
        }
    }

    #[inline]
    pub const fn flag(self) -> MoveFlag {
        match self {
            CastleSide::Kingside => MoveFlag::CastleKingside,
            CastleSide::Queenside => MoveFlag::CastleQueenside,
        }
    }

    #[inline]
    pub const fn from_flag(flag: MoveFlag) -> Option<Self> {
        match flag {
            MoveFlag::CastleKingside => Some(CastleSide::Kingside),
            MoveFlag::CastleQueenside => Some(CastleSide::Queenside),
            _ => None,
        }
    }
}

/// Castling rights flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CastlingRights(u8);

impl CastlingRights {
    pub const NONE: CastlingRights = CastlingRights(0);
    pub const WHITE_KINGSIDE: u8 = 0b0001;
    pub const WHITE_QUEENSIDE: u8 = 0b0010;
    pub const BLACK_KINGSIDE: u8 = 0b0100;
    pub const BLACK_QUEENSIDE: u8 = 0b1000;
    pub const ALL: CastlingRights = CastlingRights(0b1111);

    /// Creates new castling rights from flags.
    #[inline]
    pub const fn new(flags: u8) -> Self {
        CastlingRights(flags & 0b1111)
    }

    /// Bit position (0-3) of one right, in FEN order `KQkq`.
    #[inline]
    pub const fn index(color: Color, side: CastleSide) -> usize {
        color.index() * 2
            + match side {
                CastleSide::Kingside => 0,
                CastleSide::Queenside => 1,
            }
    }

    /// Returns true if `color` may still castle towards `side`.
    #[inline]
    pub const fn has(self, color: Color, side: CastleSide) -> bool {
        self.0 & (1 << Self::index(color, side)) != 0
    }

    /// Returns true if the given side can castle kingside.
    #[inline]
    pub const fn can_castle_kingside(self, color: Color) -> bool {
        self.has(color, CastleSide::Kingside)
    }

    /// Returns true if the given side can castle queenside.
    #[inline]
    pub const fn can_castle_queenside(self, color: Color) -> bool {
        self.has(color, CastleSide::Queenside)
    }

    /// Returns true if `color` holds either right.
    #[inline]
    pub const fn any(self, color: Color) -> bool {
        self.can_castle_kingside(color) || self.can_castle_queenside(color)
    }

    /// Removes one right.
    #[inline]
    pub fn remove(&mut self, color: Color, side: CastleSide) {
        self.0 &= !(1 << Self::index(color, side));
    }

    /// Removes castling rights for a color.
    #[inline]
    pub fn remove_color(&mut self, color: Color) {
        self.remove(color, CastleSide::Kingside);
        self.remove(color, CastleSide::Queenside);
    }

    /// Parses the FEN castling field. The field has already been validated
    /// to contain only `KQkq` or `-`.
    pub fn from_fen_field(field: &str) -> Self {
        let mut flags = 0u8;
        for c in field.chars() {
            match c {
                'K' => flags |= Self::WHITE_KINGSIDE,
                'Q' => flags |= Self::WHITE_QUEENSIDE,
                'k' => flags |= Self::BLACK_KINGSIDE,
                'q' => flags |= Self::BLACK_QUEENSIDE,
                _ => {}
            }
        }
        CastlingRights::new(flags)
    }

    /// Returns the raw flags.
    #[inline]
    pub const fn raw(self) -> u8 {
        self.0
    }
}

impl fmt::Display for CastlingRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == 0 {
            return write!(f, "-");
        }
        for (color, side, c) in [
            (Color::White, CastleSide::Kingside, 'K'),
            (Color::White, CastleSide::Queenside, 'Q'),
            (Color::Black, CastleSide::Kingside, 'k'),
            (Color::Black, CastleSide::Queenside, 'q'),
        ] {
            if self.has(color, side) {
                write!(f, "{}", c)?;
            }
        }
        Ok(())
    }
}

#[inline]
fn toward(from: Square, to: Square) -> i8 {
    if to.file() > from.file() {
        1
    } else {
        -1
    }
}

/// Returns true if `color` may castle towards `side` on `board`.
///
/// Requires, in order: the right is held; reading the back rank from the
/// corner, the first friendly rook before the king is unmoved and the king
/// is unmoved; every square between them is empty; and no square from the
/// king's square through its destination is attacked. Squares only the rook
/// crosses are not tested for attacks.
pub(crate) fn castle_available(board: &Board, color: Color, side: CastleSide) -> bool {
    if !board.castling().has(color, side) {
        return false;
    }

    let cells = board.cells();
    let king = board.king_square(color);
    if king.rank() != color.back_rank() || cells[king.mailbox()].has_moved() {
        return false;
    }

    let corner = side.rook_square(color);
    let inward = toward(corner, king);
    let mut rook = corner.mailbox();
    loop {
        if rook == king.mailbox() || cells[rook].is_invalid() {
            return false;
        }
        if cells[rook].is(PieceKind::Rook, color) {
            break;
        }
        rook = step(rook, inward);
    }
    if cells[rook].has_moved() {
        return false;
    }

    let mut between = step(rook, inward);
    while between != king.mailbox() {
        if !cells[between].is_empty() {
            return false;
        }
        between = step(between, inward);
    }

    let them = color.opposite();
    let view = View::new(cells, Overlay::NONE);
    let target = side.king_target(color);
    let outward = toward(king, target);
    let mut square = king.mailbox();
    loop {
        if is_attacked(&view, square, them) {
            return false;
        }
        if square == target.mailbox() {
            return true;
        }
        square = step(square, outward);
    }
}
