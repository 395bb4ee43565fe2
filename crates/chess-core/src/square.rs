//! Board coordinates on a padded 10x12 mailbox.
//!
//! The 8x8 playing area sits inside a border one file wide on each side and
//! two ranks deep at the top and bottom:
//!
//! ```text
//!   a1 = 21, b1 = 22, ..., h1 = 28
//!   a2 = 31, ...,          h8 = 98
//! ```
//!
//! Every knight, king or sliding step taken from an interior square lands
//! inside the 120-cell array, so running off the board is detected by the
//! border cell's sentinel rather than by range checks.

use std::fmt;

/// Number of cells in the padded board array.
pub const MAILBOX_SIZE: usize = 120;

/// A file (column) on the chess board, from A to H.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum File {
    A = 0,
    B = 1,
    C = 2,
    D = 3,
    E = 4,
    F = 5,
    G = 6,
    H = 7,
}

impl File {
    /// All files in order.
    pub const ALL: [File; 8] = [
        File::A,
        File::B,
        File::C,
        File::D,
        File::E,
        File::F,
        File::G,
        File::H,
    ];

    /// Creates a file from index (0-7).
    #[inline]
    pub const fn from_index(index: u8) -> Option<Self> {
        if index < 8 {
            Some(Self::ALL[index as usize])
        } else {
            None
        }
    }

    /// Creates a file from a character ('a'-'h' or 'A'-'H').
    #[inline]
    pub const fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'a'..='h' => Self::from_index(c.to_ascii_lowercase() as u8 - b'a'),
            _ => None,
        }
    }

    /// Returns the index (0-7).
    #[inline]
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Returns the character representation.
    #[inline]
    pub const fn to_char(self) -> char {
        (b'a' + self as u8) as char
    }
}

impl fmt::Display for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// A rank (row) on the chess board, from 1 to 8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Rank {
    R1 = 0,
    R2 = 1,
    R3 = 2,
    R4 = 3,
    R5 = 4,
    R6 = 5,
    R7 = 6,
    R8 = 7,
}

impl Rank {
    /// All ranks in order.
    pub const ALL: [Rank; 8] = [
        Rank::R1,
        Rank::R2,
        Rank::R3,
        Rank::R4,
        Rank::R5,
        Rank::R6,
        Rank::R7,
        Rank::R8,
    ];

    /// Creates a rank from index (0-7).
    #[inline]
    pub const fn from_index(index: u8) -> Option<Self> {
        if index < 8 {
            Some(Self::ALL[index as usize])
        } else {
            None
        }
    }

    /// Creates a rank from a character ('1'-'8').
    #[inline]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            '1'..='8' => Self::from_index(c as u8 - b'1'),
            _ => None,
        }
    }

    /// Returns the index (0-7).
    #[inline]
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Returns the character representation.
    #[inline]
    pub const fn to_char(self) -> char {
        (b'1' + self as u8) as char
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

// Indexed by the dense square index (a1 = 0, h8 = 63).
#[rustfmt::skip]
const NAMES: [&str; 64] = [
    "a1", "b1", "c1", "d1", "e1", "f1", "g1", "h1",
    "a2", "b2", "c2", "d2", "e2", "f2", "g2", "h2",
    "a3", "b3", "c3", "d3", "e3", "f3", "g3", "h3",
    "a4", "b4", "c4", "d4", "e4", "f4", "g4", "h4",
    "a5", "b5", "c5", "d5", "e5", "f5", "g5", "h5",
    "a6", "b6", "c6", "d6", "e6", "f6", "g6", "h6",
    "a7", "b7", "c7", "d7", "e7", "f7", "g7", "h7",
    "a8", "b8", "c8", "d8", "e8", "f8", "g8", "h8",
];

/// A playable square, stored as its index into the 120-cell mailbox.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square(u8);

impl Square {
    /// Creates a square from file and rank.
    #[inline]
    pub const fn new(file: File, rank: Rank) -> Self {
        Square(21 + rank.index() * 10 + file.index())
    }

    /// Creates a square from its dense index (0-63, a1 = 0, h8 = 63).
    #[inline]
    pub const fn from_index(index: u8) -> Option<Self> {
        if index < 64 {
            Some(Square(21 + (index / 8) * 10 + index % 8))
        } else {
            None
        }
    }

    /// Creates a square from a mailbox index, rejecting border cells.
    #[inline]
    pub const fn from_mailbox(index: usize) -> Option<Self> {
        let column = index % 10;
        if index >= 21 && index <= 98 && column >= 1 && column <= 8 {
            Some(Square(index as u8))
        } else {
            None
        }
    }

    /// Creates a square from a mailbox index already known to be interior.
    ///
    /// Callers establish this by testing the board cell against the border
    /// sentinel first.
    #[inline]
    pub const fn from_mailbox_unchecked(index: usize) -> Self {
        debug_assert!(Self::from_mailbox(index).is_some());
        Square(index as u8)
    }

    /// Parses a square from algebraic notation (e.g., "e4").
    pub const fn from_algebraic(s: &str) -> Option<Self> {
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return None;
        }
        let file = match File::from_char(bytes[0] as char) {
            Some(f) => f,
            None => return None,
        };
        let rank = match Rank::from_char(bytes[1] as char) {
            Some(r) => r,
            None => return None,
        };
        Some(Square::new(file, rank))
    }

    /// Iterates over all 64 squares from a1 to h8.
    pub fn all() -> impl Iterator<Item = Square> {
        (0..64u8).filter_map(Square::from_index)
    }

    /// Returns the mailbox index (21-98).
    #[inline]
    pub const fn mailbox(self) -> usize {
        self.0 as usize
    }

    /// Returns the dense index (0-63).
    #[inline]
    pub const fn index(self) -> usize {
        self.rank().index() as usize * 8 + self.file().index() as usize
    }

    /// Returns the mailbox index reached by adding `delta`.
    ///
    /// The result may be a border cell.
    #[inline]
    pub const fn offset(self, delta: i8) -> usize {
        (self.0 as i16 + delta as i16) as usize
    }

    /// Returns the file of this square.
    #[inline]
    pub const fn file(self) -> File {
        match File::from_index(self.0 % 10 - 1) {
            Some(f) => f,
            None => unreachable!(),
        }
    }

    /// Returns the rank of this square.
    #[inline]
    pub const fn rank(self) -> Rank {
        match Rank::from_index(self.0 / 10 - 2) {
            Some(r) => r,
            None => unreachable!(),
        }
    }

    /// Returns the algebraic name of this square (e.g., "e4").
    #[inline]
    pub const fn name(self) -> &'static str {
        NAMES[self.index()]
    }

    /// Returns the algebraic notation for this square.
    pub fn to_algebraic(self) -> String {
        self.name().to_string()
    }

    /// Returns true if `square` lies strictly between `self` and `other` on a
    /// shared rank, file or diagonal.
    ///
    /// Squares that do not share a line have nothing between them.
    pub fn is_between(self, other: Square, square: Square) -> bool {
        let df = other.file().index() as i8 - self.file().index() as i8;
        let dr = other.rank().index() as i8 - self.rank().index() as i8;
        if (df == 0 && dr == 0) || (df != 0 && dr != 0 && df.abs() != dr.abs()) {
            return false;
        }

        let step = df.signum() + 10 * dr.signum();
        let mut current = self.offset(step);
        while current != other.mailbox() {
            if current == square.mailbox() {
                return true;
            }
            current = (current as i16 + step as i16) as usize;
        }
        false
    }

    // Common squares
    pub const A1: Square = Square(21);
    pub const B1: Square = Square(22);
    pub const C1: Square = Square(23);
    pub const D1: Square = Square(24);
    pub const E1: Square = Square(25);
    pub const F1: Square = Square(26);
    pub const G1: Square = Square(27);
    pub const H1: Square = Square(28);
    pub const A8: Square = Square(91);
    pub const B8: Square = Square(92);
    pub const C8: Square = Square(93);
    pub const D8: Square = Square(94);
    pub const E8: Square = Square(95);
    pub const F8: Square = Square(96);
    pub const G8: Square = Square(97);
    pub const H8: Square = Square(98);
}

impl fmt::Debug for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Square({})", self.name())
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(name: &str) -> Square {
        Square::from_algebraic(name).unwrap()
    }

    #[test]
    fn square_new() {
        let e4 = Square::new(File::E, Rank::R4);
        assert_eq!(e4.file(), File::E);
        assert_eq!(e4.rank(), Rank::R4);
        assert_eq!(e4.mailbox(), 55);
        assert_eq!(e4.index(), 28);
    }

    #[test]
    fn corner_mailbox_indices() {
        assert_eq!(Square::A1.mailbox(), 21);
        assert_eq!(Square::H1.mailbox(), 28);
        assert_eq!(Square::A8.mailbox(), 91);
        assert_eq!(Square::H8.mailbox(), 98);
    }

    #[test]
    fn square_from_algebraic() {
        assert_eq!(Square::from_algebraic("a1"), Some(Square::A1));
        assert_eq!(
            Square::from_algebraic("e4"),
            Some(Square::new(File::E, Rank::R4))
        );
        assert_eq!(Square::from_algebraic("h8"), Some(Square::H8));
        assert_eq!(Square::from_algebraic("i1"), None);
        assert_eq!(Square::from_algebraic("a9"), None);
        assert_eq!(Square::from_algebraic(""), None);
    }

    #[test]
    fn square_names() {
        assert_eq!(Square::A1.to_algebraic(), "a1");
        assert_eq!(Square::H8.name(), "h8");
        assert_eq!(Square::new(File::E, Rank::R4).to_string(), "e4");
        for square in Square::all() {
            assert_eq!(Square::from_algebraic(square.name()), Some(square));
        }
    }

    #[test]
    fn mailbox_border_is_rejected() {
        assert_eq!(Square::from_mailbox(20), None);
        assert_eq!(Square::from_mailbox(29), None);
        assert_eq!(Square::from_mailbox(30), None);
        assert_eq!(Square::from_mailbox(99), None);
        assert_eq!(Square::from_mailbox(5), None);
        assert_eq!(Square::from_mailbox(21), Some(Square::A1));
        assert_eq!(Square::all().count(), 64);
    }

    #[test]
    fn dense_index_roundtrip() {
        for index in 0..64u8 {
            let square = Square::from_index(index).unwrap();
            assert_eq!(square.index(), index as usize);
        }
        assert_eq!(Square::from_index(64), None);
    }

    #[test]
    fn between_on_lines() {
        assert!(Square::A1.is_between(Square::H1, Square::D1));
        assert!(!Square::A1.is_between(Square::D1, Square::H1));
        assert!(!Square::G1.is_between(Square::D1, Square::A1));
        assert!(!Square::A1.is_between(Square::H1, sq("d2")));
        assert!(Square::A1.is_between(sq("a6"), sq("a3")));
        assert!(sq("a6").is_between(Square::A8, sq("a7")));
        assert!(Square::A1.is_between(sq("d4"), sq("c3")));
        assert!(!Square::A1.is_between(sq("d4"), sq("d3")));
        assert!(!Square::B1.is_between(sq("e4"), sq("a2")));
    }

    #[test]
    fn between_is_symmetric_and_exclusive() {
        assert!(Square::H1.is_between(Square::A1, Square::D1));
        assert!(!Square::A1.is_between(Square::H1, Square::A1));
        assert!(!Square::A1.is_between(Square::H1, Square::H1));
        // Not on a shared line.
        assert!(!Square::A1.is_between(sq("b3"), sq("a2")));
    }

    mod properties {
        use crate::Square;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn dense_and_mailbox_indices_agree(index in 0u8..64) {
                let square = Square::from_index(index).unwrap();
                prop_assert_eq!(square.index(), index as usize);
                prop_assert_eq!(Square::from_mailbox(square.mailbox()), Some(square));
                prop_assert_eq!(Square::from_algebraic(square.name()), Some(square));
            }

            #[test]
            fn border_cells_are_not_squares(index in 0usize..120) {
                let column = index % 10;
                let interior = (21..=98).contains(&index) && (1..=8).contains(&column);
                prop_assert_eq!(Square::from_mailbox(index).is_some(), interior);
            }

            #[test]
            fn between_is_symmetric(a in 0u8..64, b in 0u8..64, c in 0u8..64) {
                let (a, b, c) = (
                    Square::from_index(a).unwrap(),
                    Square::from_index(b).unwrap(),
                    Square::from_index(c).unwrap(),
                );
                prop_assert_eq!(a.is_between(b, c), b.is_between(a, c));
                prop_assert!(!a.is_between(b, a));
            }
        }
    }
}
