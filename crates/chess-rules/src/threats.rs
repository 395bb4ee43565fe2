//! Attack detection on the mailbox.
//!
//! Every detector answers "is this square attacked by that color" by reading
//! the board through an [`Overlay`]: a handful of hypothetical cell edits that
//! describe a move as if it had been played. This lets the legality filter
//! test a candidate against the current cells without building a new board.

use crate::movegen::{BISHOP_DIRECTIONS, KING_OFFSETS, KNIGHT_OFFSETS, ROOK_DIRECTIONS};
use chess_core::{Color, Piece, PieceKind, Square, MAILBOX_SIZE};

/// Maximum number of edits: origin and destination of the moving piece, plus
/// either the en passant victim or the castling rook's origin and destination.
const MAX_EDITS: usize = 4;

/// Hypothetical edits layered over the board cells.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Overlay {
    edits: [(usize, Piece); MAX_EDITS],
    len: usize,
}

impl Overlay {
    /// No edits: reads go straight to the board.
    pub const NONE: Overlay = Overlay {
        edits: [(0, Piece::EMPTY); MAX_EDITS],
        len: 0,
    };

    /// Returns the overlay with `square` emptied.
    #[inline]
    pub fn vacate(self, square: usize) -> Self {
        self.place(square, Piece::EMPTY)
    }

    /// Returns the overlay with `piece` standing on `square`.
    #[inline]
    pub fn place(mut self, square: usize, piece: Piece) -> Self {
        debug_assert!(self.len < MAX_EDITS);
        self.edits[self.len] = (square, piece);
        self.len += 1;
        self
    }
}

/// Board cells seen through an overlay.
#[derive(Clone, Copy)]
pub(crate) struct View<'a> {
    cells: &'a [Piece; MAILBOX_SIZE],
    overlay: Overlay,
}

impl<'a> View<'a> {
    #[inline]
    pub fn new(cells: &'a [Piece; MAILBOX_SIZE], overlay: Overlay) -> Self {
        View { cells, overlay }
    }

    /// Returns the cell contents after the overlay is applied. Later edits win.
    #[inline]
    pub fn at(&self, square: usize) -> Piece {
        self.overlay.edits[..self.overlay.len]
            .iter()
            .rev()
            .find(|(edited, _)| *edited == square)
            .map_or(self.cells[square], |&(_, piece)| piece)
    }
}

#[inline]
pub(crate) fn step(square: usize, offset: i8) -> usize {
    (square as isize + offset as isize) as usize
}

/// Walks `direction` from `square` and returns the first non-empty cell
/// together with its index. The walk always ends on a piece or the border.
#[inline]
fn first_occupied(view: &View<'_>, square: usize, direction: i8) -> (usize, Piece) {
    let mut current = step(square, direction);
    loop {
        let piece = view.at(current);
        if !piece.is_empty() {
            return (current, piece);
        }
        current = step(current, direction);
    }
}

fn slider_on(
    view: &View<'_>,
    square: usize,
    by: Color,
    mut visit: impl FnMut(usize) -> bool,
) -> bool {
    for direction in ROOK_DIRECTIONS {
        let (at, piece) = first_occupied(view, square, direction);
        if (piece.is(PieceKind::Rook, by) || piece.is(PieceKind::Queen, by)) && visit(at) {
            return true;
        }
    }
    for direction in BISHOP_DIRECTIONS {
        let (at, piece) = first_occupied(view, square, direction);
        if (piece.is(PieceKind::Bishop, by) || piece.is(PieceKind::Queen, by)) && visit(at) {
            return true;
        }
    }
    false
}

fn stepper_on(
    view: &View<'_>,
    square: usize,
    offsets: &[i8],
    kind: PieceKind,
    by: Color,
    mut visit: impl FnMut(usize) -> bool,
) -> bool {
    for &offset in offsets {
        let at = step(square, offset);
        if view.at(at).is(kind, by) && visit(at) {
            return true;
        }
    }
    false
}

/// Squares from which a pawn of color `by` attacks `square`.
#[inline]
fn pawn_sources(by: Color) -> [i8; 2] {
    let back = -by.pawn_push();
    [back - 1, back + 1]
}

/// Rook, bishop or queen of color `by` with a clear line to `square`.
pub(crate) fn sliding_threat(view: &View<'_>, square: usize, by: Color) -> bool {
    slider_on(view, square, by, |_| true)
}

/// Knight of color `by` a knight's jump from `square`.
pub(crate) fn knight_threat(view: &View<'_>, square: usize, by: Color) -> bool {
    stepper_on(view, square, &KNIGHT_OFFSETS, PieceKind::Knight, by, |_| true)
}

/// Pawn of color `by` diagonally behind `square` from its own point of view.
pub(crate) fn pawn_threat(view: &View<'_>, square: usize, by: Color) -> bool {
    stepper_on(view, square, &pawn_sources(by), PieceKind::Pawn, by, |_| true)
}

/// King of color `by` adjacent to `square`.
pub(crate) fn king_threat(view: &View<'_>, square: usize, by: Color) -> bool {
    stepper_on(view, square, &KING_OFFSETS, PieceKind::King, by, |_| true)
}

/// Returns true if any piece of color `by` attacks `square`.
pub(crate) fn is_attacked(view: &View<'_>, square: usize, by: Color) -> bool {
    sliding_threat(view, square, by)
        || knight_threat(view, square, by)
        || pawn_threat(view, square, by)
        || king_threat(view, square, by)
}

/// Returns the squares of every piece of color `by` attacking `square`.
pub(crate) fn checkers(view: &View<'_>, square: usize, by: Color) -> Vec<Square> {
    let mut found = Vec::new();
    let mut record = |at: usize| {
        found.push(Square::from_mailbox_unchecked(at));
        false
    };
    slider_on(view, square, by, &mut record);
    stepper_on(view, square, &KNIGHT_OFFSETS, PieceKind::Knight, by, &mut record);
    stepper_on(view, square, &pawn_sources(by), PieceKind::Pawn, by, &mut record);
    stepper_on(view, square, &KING_OFFSETS, PieceKind::King, by, &mut record);
    found
}
